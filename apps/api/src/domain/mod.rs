// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod errors;
pub mod pull_request;
pub mod repositories;
pub mod services;
pub mod team;
pub mod user;
