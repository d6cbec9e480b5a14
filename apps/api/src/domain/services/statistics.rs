// Review statistics
// Pure aggregation over stored pull requests

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::pull_request::{PullRequest, PullRequestStatus};
use crate::domain::user::UserId;

/// Assignment counters for a single reviewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentCounts {
    pub total_assignments: usize,
    pub open_assignments: usize,
    pub merged_assignments: usize,
}

impl AssignmentCounts {
    fn record(&mut self, status: PullRequestStatus) {
        self.total_assignments += 1;
        match status {
            PullRequestStatus::Open => self.open_assignments += 1,
            PullRequestStatus::Merged => self.merged_assignments += 1,
        }
    }
}

/// Per-reviewer statistics with the reviewer's display name resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerStats {
    pub user_id: UserId,
    pub username: String,
    #[serde(flatten)]
    pub counts: AssignmentCounts,
}

/// Totals across all pull requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestStats {
    pub total_pull_requests: usize,
    pub open_pull_requests: usize,
    pub merged_pull_requests: usize,
    pub total_reviewers: usize,
    pub avg_reviewers_per_pr: f64,
}

/// Counts assignments per reviewer, keyed and ordered by user id
pub fn assignment_counts(prs: &[PullRequest]) -> BTreeMap<UserId, AssignmentCounts> {
    let mut counts: BTreeMap<UserId, AssignmentCounts> = BTreeMap::new();
    for pr in prs {
        for reviewer in pr.reviewers() {
            counts
                .entry(reviewer.user_id.clone())
                .or_default()
                .record(pr.status());
        }
    }
    counts
}

/// Counts the assignments of one reviewer
pub fn counts_for(prs: &[PullRequest], user_id: &UserId) -> AssignmentCounts {
    let mut counts = AssignmentCounts::default();
    for pr in prs.iter().filter(|pr| pr.has_reviewer(user_id)) {
        counts.record(pr.status());
    }
    counts
}

/// Computes totals across all pull requests
pub fn pull_request_stats(prs: &[PullRequest]) -> PullRequestStats {
    let merged = prs.iter().filter(|pr| pr.is_merged()).count();
    let total_reviewers: usize = prs.iter().map(|pr| pr.reviewers().len()).sum();
    let avg_reviewers_per_pr = if prs.is_empty() {
        0.0
    } else {
        total_reviewers as f64 / prs.len() as f64
    };

    PullRequestStats {
        total_pull_requests: prs.len(),
        open_pull_requests: prs.len() - merged,
        merged_pull_requests: merged,
        total_reviewers,
        avg_reviewers_per_pr,
    }
}
