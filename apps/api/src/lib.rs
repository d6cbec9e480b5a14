//! Review Assigner API Library
//!
//! This library provides the core functionality for the review assigner:
//! the pull request aggregate, reviewer selection and assignment, the
//! repository adapters and the HTTP layer.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
