// Pull request domain module
// Contains the pull request aggregate root, its value objects and errors

#![allow(clippy::module_inception)]

pub mod errors;
pub mod pull_request;
pub mod value_objects;

pub use errors::PullRequestError;
pub use pull_request::PullRequest;
pub use value_objects::{PullRequestId, PullRequestStatus, Reviewer, MAX_REVIEWERS};
