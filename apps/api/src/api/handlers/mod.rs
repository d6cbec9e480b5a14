// HTTP handlers
// Request/response DTOs live next to the handlers that use them

pub mod health;
pub mod pull_requests;
pub mod stats;
pub mod users;
