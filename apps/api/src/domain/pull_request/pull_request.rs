use chrono::{DateTime, Duration, SubsecRound, Utc};

use super::errors::PullRequestError;
use super::value_objects::{PullRequestId, PullRequestStatus, Reviewer, MAX_REVIEWERS};
use crate::domain::user::UserId;

/// Pull request aggregate root
///
/// Owns the review-status lifecycle and the reviewer roster of a single
/// pull request. Every mutator validates the roster as a unit, so a value
/// of this type is always in a consistent state.
///
/// # Invariants
/// - ID, title and author cannot be empty
/// - The author is never a reviewer
/// - At most [`MAX_REVIEWERS`] reviewers, no duplicates
/// - Once merged, status and reviewers never change
/// - Timestamps issued by the aggregate strictly increase
///
/// # Example
/// ```
/// use review_assigner_api::domain::pull_request::{PullRequest, PullRequestId, PullRequestStatus};
/// use review_assigner_api::domain::user::UserId;
///
/// let mut pr = PullRequest::new(
///     PullRequestId::from("pr-1"),
///     "Add search",
///     UserId::from("u1"),
///     vec![],
/// ).expect("valid pull request");
///
/// pr.assign_reviewer(UserId::from("u2")).expect("eligible reviewer");
/// pr.merge();
///
/// assert_eq!(pr.status(), PullRequestStatus::Merged);
/// assert!(pr.assign_reviewer(UserId::from("u3")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    id: PullRequestId,
    title: String,
    author_id: UserId,
    status: PullRequestStatus,
    reviewers: Vec<Reviewer>,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Creates a new open pull request
    ///
    /// # Arguments
    /// * `id` - Globally unique identifier (cannot be empty)
    /// * `title` - Human readable title (cannot be empty)
    /// * `author_id` - The author (cannot be empty)
    /// * `reviewers` - Initial roster, usually empty
    ///
    /// # Returns
    /// * `Ok(PullRequest)` - Open pull request
    /// * `Err(PullRequestError)` - Validation error; the initial roster must
    ///   not contain the author, duplicates, or more than [`MAX_REVIEWERS`] ids
    pub fn new(
        id: PullRequestId,
        title: impl Into<String>,
        author_id: UserId,
        reviewers: Vec<UserId>,
    ) -> Result<Self, PullRequestError> {
        let title = title.into();

        if id.is_empty() {
            return Err(PullRequestError::MissingId);
        }
        if title.is_empty() {
            return Err(PullRequestError::MissingTitle);
        }
        if author_id.is_empty() {
            return Err(PullRequestError::MissingAuthor);
        }
        if reviewers.len() > MAX_REVIEWERS {
            return Err(PullRequestError::InvalidRoster(format!(
                "at most {} reviewers allowed, got {}",
                MAX_REVIEWERS,
                reviewers.len()
            )));
        }

        let created_at = now();
        let mut pr = Self {
            id,
            title,
            author_id,
            status: PullRequestStatus::Open,
            reviewers: Vec::with_capacity(reviewers.len()),
            created_at,
            merged_at: None,
        };

        for user_id in reviewers {
            if user_id == pr.author_id {
                return Err(PullRequestError::InvalidRoster(format!(
                    "author {} cannot review their own pull request",
                    user_id
                )));
            }
            if pr.has_reviewer(&user_id) {
                return Err(PullRequestError::InvalidRoster(format!(
                    "reviewer {} listed twice",
                    user_id
                )));
            }
            pr.reviewers.push(Reviewer {
                user_id,
                assigned_at: created_at,
            });
        }

        Ok(pr)
    }

    /// Appends a reviewer to the roster
    ///
    /// # Errors
    /// Checked in order:
    /// - `AlreadyMerged` - The pull request is merged
    /// - `AuthorIsReviewer` - `user_id` is the author
    /// - `TooManyReviewers` - The roster is full
    /// - `AlreadyAssigned` - `user_id` is already on the roster
    pub fn assign_reviewer(&mut self, user_id: UserId) -> Result<(), PullRequestError> {
        if self.is_merged() {
            return Err(PullRequestError::AlreadyMerged);
        }
        if user_id == self.author_id {
            return Err(PullRequestError::AuthorIsReviewer(user_id));
        }
        if self.has_enough_reviewers() {
            return Err(PullRequestError::TooManyReviewers);
        }
        if self.has_reviewer(&user_id) {
            return Err(PullRequestError::AlreadyAssigned(user_id));
        }

        let assigned_at = self.next_timestamp();
        self.reviewers.push(Reviewer {
            user_id,
            assigned_at,
        });
        Ok(())
    }

    /// Removes a reviewer; removing someone who is not on the roster is a no-op
    pub fn unassign_reviewer(&mut self, user_id: &UserId) -> Result<(), PullRequestError> {
        if self.is_merged() {
            return Err(PullRequestError::AlreadyMerged);
        }

        self.reviewers.retain(|r| &r.user_id != user_id);
        Ok(())
    }

    /// Replaces `old_user_id` with `new_user_id` in the same roster position
    ///
    /// # Errors
    /// - `AlreadyMerged` - The pull request is merged
    /// - `ReviewerNotAssigned` - `old_user_id` is not on the roster
    /// - `AuthorIsReviewer` - `new_user_id` is the author
    /// - `AlreadyAssigned` - `new_user_id` already holds a slot
    pub fn reassign_reviewer(
        &mut self,
        old_user_id: &UserId,
        new_user_id: UserId,
    ) -> Result<(), PullRequestError> {
        if self.is_merged() {
            return Err(PullRequestError::AlreadyMerged);
        }

        let idx = self
            .reviewers
            .iter()
            .position(|r| &r.user_id == old_user_id)
            .ok_or_else(|| PullRequestError::ReviewerNotAssigned(old_user_id.clone()))?;

        if new_user_id == self.author_id {
            return Err(PullRequestError::AuthorIsReviewer(new_user_id));
        }
        if self.has_reviewer(&new_user_id) {
            return Err(PullRequestError::AlreadyAssigned(new_user_id));
        }

        let assigned_at = self.next_timestamp();
        self.reviewers[idx] = Reviewer {
            user_id: new_user_id,
            assigned_at,
        };
        Ok(())
    }

    /// Marks the pull request as merged
    ///
    /// Idempotent: merging a merged pull request keeps the original
    /// `merged_at`.
    pub fn merge(&mut self) {
        if !self.status.can_transition_to(PullRequestStatus::Merged) {
            return;
        }

        self.merged_at = Some(self.next_timestamp());
        self.status = PullRequestStatus::Merged;
    }

    pub fn has_reviewer(&self, user_id: &UserId) -> bool {
        self.reviewers.iter().any(|r| &r.user_id == user_id)
    }

    pub fn has_enough_reviewers(&self) -> bool {
        self.reviewers.len() >= MAX_REVIEWERS
    }

    /// Returns the reviewer ids in roster order as an independent copy
    pub fn reviewer_ids(&self) -> Vec<UserId> {
        self.reviewers.iter().map(|r| r.user_id.clone()).collect()
    }

    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    /// Returns a timestamp later than every timestamp the aggregate holds
    ///
    /// Truncated to microseconds so values survive a PostgreSQL round trip.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let latest = self
            .reviewers
            .iter()
            .map(|r| r.assigned_at)
            .chain(self.merged_at)
            .fold(self.created_at, |acc, t| acc.max(t));

        let candidate = now();
        if candidate > latest {
            candidate
        } else {
            latest + Duration::microseconds(1)
        }
    }

    // ===== Getters =====

    pub fn id(&self) -> &PullRequestId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn status(&self) -> PullRequestStatus {
        self.status
    }

    pub fn reviewers(&self) -> &[Reviewer] {
        &self.reviewers
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Reconstructs a PullRequest from persistence layer data
    ///
    /// This method bypasses validation since the data was validated before
    /// it was stored.
    ///
    /// # Note
    /// Only to be used by repository implementations for data reconstruction.
    pub fn from_persistence(
        id: PullRequestId,
        title: String,
        author_id: UserId,
        status: PullRequestStatus,
        reviewers: Vec<Reviewer>,
        created_at: DateTime<Utc>,
        merged_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            author_id,
            status,
            reviewers,
            created_at,
            merged_at,
        }
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
