// Domain services
// Reviewer selection, assignment orchestration and review statistics

pub mod errors;
pub mod reviewer_assignment;
pub mod reviewer_selection;
pub mod statistics;

pub use errors::{AssignmentError, AssignmentResult};
pub use reviewer_assignment::ReviewerAssignmentService;
pub use reviewer_selection::{select_one_replacement, select_reviewers, NoCandidate};
pub use statistics::{AssignmentCounts, PullRequestStats, ReviewerStats};
