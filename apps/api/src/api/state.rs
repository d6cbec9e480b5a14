use std::sync::Arc;

use crate::domain::services::ReviewerAssignmentService;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub assignments: Arc<ReviewerAssignmentService>,
}

impl AppState {
    pub fn new(assignments: ReviewerAssignmentService) -> Self {
        Self {
            assignments: Arc::new(assignments),
        }
    }
}
