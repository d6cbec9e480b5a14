use std::sync::Arc;

use tracing::{debug, info, warn};

use super::errors::{AssignmentError, AssignmentResult};
use super::reviewer_selection::{select_one_replacement, select_reviewers};
use super::statistics::{
    assignment_counts, counts_for, pull_request_stats, PullRequestStats, ReviewerStats,
};
use crate::domain::pull_request::{PullRequest, PullRequestId, MAX_REVIEWERS};
use crate::domain::repositories::{PullRequestRepository, TeamRepository, UserRepository};
use crate::domain::user::{User, UserId};

/// Orchestrates reviewer assignment for pull requests
///
/// Each operation loads the aggregate, mutates a private copy in memory and
/// persists it with a single repository call. Dropping a returned future
/// before it completes therefore leaves the store either untouched or fully
/// written. The service holds no mutable state of its own and can be shared
/// across tasks behind an `Arc`.
pub struct ReviewerAssignmentService {
    pull_requests: Arc<dyn PullRequestRepository>,
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl ReviewerAssignmentService {
    pub fn new(
        pull_requests: Arc<dyn PullRequestRepository>,
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            pull_requests,
            users,
            teams,
        }
    }

    /// Stores a new pull request with reviewers drawn from the author's team
    ///
    /// Up to [`MAX_REVIEWERS`] active teammates are picked. A team too small
    /// to fill every slot is not an error; the pull request is stored with
    /// whoever was available, possibly nobody.
    ///
    /// # Errors
    /// - `PullRequestAlreadyExists` - The id is taken
    /// - `AuthorNotFound` - The author does not exist
    /// - `TeamNotFound` - The author has no team
    pub async fn create_and_assign(&self, mut pr: PullRequest) -> AssignmentResult<PullRequest> {
        if self.pull_requests.find_by_id(pr.id()).await?.is_some() {
            return Err(AssignmentError::PullRequestAlreadyExists(pr.id().clone()));
        }

        let author = self
            .users
            .find_by_id(pr.author_id())
            .await?
            .ok_or_else(|| AssignmentError::AuthorNotFound(pr.author_id().clone()))?;

        let candidates = self.active_teammates(author.id()).await?;

        let current = pr.reviewer_ids();
        let open_slots = MAX_REVIEWERS.saturating_sub(current.len());
        let selected = select_reviewers(&candidates, author.id(), &current, open_slots);
        debug!(
            pull_request_id = %pr.id(),
            pool = candidates.len(),
            selected = selected.len(),
            "Selected reviewers"
        );

        for reviewer_id in selected {
            pr.assign_reviewer(reviewer_id)?;
        }

        self.pull_requests.create(&pr).await?;

        info!(
            pull_request_id = %pr.id(),
            author_id = %pr.author_id(),
            reviewers = ?pr.reviewer_ids(),
            "Pull request created"
        );
        Ok(pr)
    }

    /// Replaces one reviewer with another active teammate of the author
    ///
    /// The replacement is chosen before the aggregate is touched, so a failed
    /// selection leaves the stored pull request unchanged. The new reviewer
    /// takes the old reviewer's position in the roster.
    ///
    /// # Returns
    /// * `Ok((new_reviewer_id, pr))` - The replacement and the updated pull request
    ///
    /// # Errors
    /// - `PullRequestNotFound`, `PullRequestAlreadyMerged`
    /// - `UserNotReviewer` - `old_reviewer_id` is not on the roster
    /// - `TeamNotFound` - The author has no team
    /// - `NoCandidate` - Nobody else in the team is eligible
    pub async fn reassign_reviewer(
        &self,
        pull_request_id: &PullRequestId,
        old_reviewer_id: &UserId,
    ) -> AssignmentResult<(UserId, PullRequest)> {
        let mut pr = self.load(pull_request_id).await?;

        if pr.is_merged() {
            return Err(AssignmentError::PullRequestAlreadyMerged(pr.id().clone()));
        }
        if !pr.has_reviewer(old_reviewer_id) {
            return Err(AssignmentError::UserNotReviewer {
                pull_request_id: pr.id().clone(),
                user_id: old_reviewer_id.clone(),
            });
        }

        let candidates = self.active_teammates(pr.author_id()).await?;

        let mut exclude = pr.reviewer_ids();
        exclude.push(pr.author_id().clone());
        exclude.push(old_reviewer_id.clone());

        let new_reviewer_id = select_one_replacement(&candidates, pr.author_id(), &exclude)?;

        pr.reassign_reviewer(old_reviewer_id, new_reviewer_id.clone())?;

        self.pull_requests.update(&pr).await?;

        info!(
            pull_request_id = %pr.id(),
            old_reviewer_id = %old_reviewer_id,
            new_reviewer_id = %new_reviewer_id,
            "Reviewer reassigned"
        );
        Ok((new_reviewer_id, pr))
    }

    /// Merges a pull request
    ///
    /// Merging is idempotent. When the write fails because another caller
    /// merged first, the stored pull request is returned as the result. Any
    /// other write failure is reported as `Transient`.
    pub async fn merge(&self, pull_request_id: &PullRequestId) -> AssignmentResult<PullRequest> {
        let mut pr = self.load(pull_request_id).await?;

        if pr.is_merged() {
            return Ok(pr);
        }

        pr.merge();

        match self.pull_requests.update(&pr).await {
            Ok(()) => {
                info!(pull_request_id = %pr.id(), "Pull request merged");
                Ok(pr)
            }
            Err(err) => {
                warn!(
                    pull_request_id = %pull_request_id,
                    error = %err,
                    "Merge write failed, re-reading pull request"
                );
                match self.pull_requests.find_by_id(pull_request_id).await {
                    Ok(Some(latest)) if latest.is_merged() => Ok(latest),
                    _ => Err(AssignmentError::Transient {
                        pull_request_id: pull_request_id.clone(),
                        source: err,
                    }),
                }
            }
        }
    }

    /// Loads a pull request by id
    pub async fn get_pull_request(
        &self,
        pull_request_id: &PullRequestId,
    ) -> AssignmentResult<PullRequest> {
        self.load(pull_request_id).await
    }

    /// Lists the pull requests a user is reviewing
    pub async fn reviews_for(&self, user_id: &UserId) -> AssignmentResult<Vec<PullRequest>> {
        self.find_user(user_id).await?;
        Ok(self.pull_requests.find_by_reviewer(user_id).await?)
    }

    /// Assignment statistics for every reviewer that still exists
    pub async fn reviewer_statistics(&self) -> AssignmentResult<Vec<ReviewerStats>> {
        let prs = self.pull_requests.find_all().await?;

        let mut stats = Vec::new();
        for (user_id, counts) in assignment_counts(&prs) {
            match self.users.find_by_id(&user_id).await? {
                Some(user) => stats.push(ReviewerStats {
                    user_id,
                    username: user.username().to_string(),
                    counts,
                }),
                None => debug!(user_id = %user_id, "Skipping stats for unknown reviewer"),
            }
        }
        Ok(stats)
    }

    /// Assignment statistics for a single reviewer
    pub async fn reviewer_statistics_for(&self, user_id: &UserId) -> AssignmentResult<ReviewerStats> {
        let user = self.find_user(user_id).await?;
        let prs = self.pull_requests.find_by_reviewer(user_id).await?;

        Ok(ReviewerStats {
            user_id: user.id().clone(),
            username: user.username().to_string(),
            counts: counts_for(&prs, user_id),
        })
    }

    /// Totals across all pull requests
    pub async fn pull_request_statistics(&self) -> AssignmentResult<PullRequestStats> {
        let prs = self.pull_requests.find_all().await?;
        Ok(pull_request_stats(&prs))
    }

    async fn load(&self, pull_request_id: &PullRequestId) -> AssignmentResult<PullRequest> {
        self.pull_requests
            .find_by_id(pull_request_id)
            .await?
            .ok_or_else(|| AssignmentError::PullRequestNotFound(pull_request_id.clone()))
    }

    async fn find_user(&self, user_id: &UserId) -> AssignmentResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AssignmentError::UserNotFound(user_id.clone()))
    }

    async fn active_teammates(&self, author_id: &UserId) -> AssignmentResult<Vec<User>> {
        let team = self
            .teams
            .find_by_user_id(author_id)
            .await?
            .ok_or_else(|| AssignmentError::TeamNotFound(author_id.clone()))?;

        Ok(self.teams.find_active_members_by_team_id(team.id()).await?)
    }
}
