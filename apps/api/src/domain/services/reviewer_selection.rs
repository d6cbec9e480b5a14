// Reviewer selection
// Uniform choice of eligible teammates, driven by the OS CSPRNG so that
// allocations can be neither predicted nor replayed

use std::collections::HashSet;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::domain::user::{User, UserId};

/// Returned when the candidate pool is empty after exclusions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no active replacement candidate in team")]
pub struct NoCandidate;

/// Picks up to `count` distinct reviewers uniformly at random
///
/// Candidates are filtered to active users that are neither the author nor
/// in `exclude_ids`, permuted with Fisher-Yates over [`OsRng`], and the first
/// `min(count, pool size)` ids are returned in permuted order.
///
/// # Example
/// ```
/// use review_assigner_api::domain::services::select_reviewers;
/// use review_assigner_api::domain::user::{User, UserId};
///
/// let pool = vec![
///     User::new(UserId::from("u1"), "author", true, None).unwrap(),
///     User::new(UserId::from("u2"), "bob", true, None).unwrap(),
///     User::new(UserId::from("u3"), "carol", false, None).unwrap(),
/// ];
///
/// let picked = select_reviewers(&pool, &UserId::from("u1"), &[], 2);
/// assert_eq!(picked, vec![UserId::from("u2")]);
/// ```
pub fn select_reviewers(
    candidates: &[User],
    author_id: &UserId,
    exclude_ids: &[UserId],
    count: usize,
) -> Vec<UserId> {
    select_reviewers_with(&mut OsRng, candidates, author_id, exclude_ids, count)
}

/// Picks a single replacement reviewer
///
/// # Returns
/// * `Err(NoCandidate)` - If nobody is eligible after exclusions
pub fn select_one_replacement(
    candidates: &[User],
    author_id: &UserId,
    exclude_ids: &[UserId],
) -> Result<UserId, NoCandidate> {
    select_reviewers(candidates, author_id, exclude_ids, 1)
        .into_iter()
        .next()
        .ok_or(NoCandidate)
}

fn select_reviewers_with<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[User],
    author_id: &UserId,
    exclude_ids: &[UserId],
    count: usize,
) -> Vec<UserId> {
    let mut excluded: HashSet<&UserId> = exclude_ids.iter().collect();
    excluded.insert(author_id);

    let mut pool: Vec<UserId> = Vec::with_capacity(candidates.len());
    for user in candidates {
        // insert() doubles as the dedup for repeated candidates
        if user.is_active() && excluded.insert(user.id()) {
            pool.push(user.id().clone());
        }
    }

    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
