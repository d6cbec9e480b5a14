use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use super::map_sqlx_error;
use crate::domain::pull_request::{PullRequest, PullRequestId, PullRequestStatus, Reviewer};
use crate::domain::repositories::{PullRequestRepository, RepositoryError};
use crate::domain::user::UserId;

/// PostgreSQL implementation of PullRequestRepository
///
/// A pull request is one row in `pull_requests` plus one row per reviewer
/// in `pr_reviewers`; the `position` column preserves roster order. Every
/// multi-row write runs in a single transaction, and every read takes both
/// tables from one snapshot.
pub struct PostgresPullRequestRepository {
    pool: PgPool,
}

impl PostgresPullRequestRepository {
    /// Creates a new PostgresPullRequestRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_reviewers(
        tx: &mut Transaction<'_, Postgres>,
        pr: &PullRequest,
    ) -> Result<(), RepositoryError> {
        for (position, reviewer) in pr.reviewers().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO pr_reviewers (pull_request_id, user_id, position, assigned_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(pr.id().as_str())
            .bind(reviewer.user_id.as_str())
            .bind(position as i16)
            .bind(reviewer.assigned_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to insert reviewer", e))?;
        }
        Ok(())
    }

    /// Opens a read-only transaction whose statements all see one snapshot
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to set isolation level", e))?;

        Ok(tx)
    }

    /// Loads reviewers for the given pull requests, grouped by pull request
    /// and ordered by roster position
    async fn reviewers_for(
        conn: &mut PgConnection,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<Reviewer>>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewerRow>(
            r#"
            SELECT pull_request_id, user_id, assigned_at
            FROM pr_reviewers
            WHERE pull_request_id = ANY($1)
            ORDER BY pull_request_id, position
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("Failed to load reviewers", e))?;

        let mut grouped: HashMap<String, Vec<Reviewer>> = HashMap::new();
        for row in rows {
            grouped.entry(row.pull_request_id).or_default().push(Reviewer {
                user_id: UserId::from(row.user_id),
                assigned_at: row.assigned_at,
            });
        }
        Ok(grouped)
    }

    async fn hydrate(
        conn: &mut PgConnection,
        rows: Vec<PullRequestRow>,
    ) -> Result<Vec<PullRequest>, RepositoryError> {
        let ids: Vec<String> = rows.iter().map(|r| r.pull_request_id.clone()).collect();
        let mut reviewers = Self::reviewers_for(conn, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let roster = reviewers.remove(&row.pull_request_id).unwrap_or_default();
                row.into_pull_request(roster)
            })
            .collect())
    }
}

#[derive(sqlx::FromRow)]
struct PullRequestRow {
    pull_request_id: String,
    pull_request_name: String,
    author_id: String,
    status: PullRequestStatus,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl PullRequestRow {
    fn into_pull_request(self, reviewers: Vec<Reviewer>) -> PullRequest {
        PullRequest::from_persistence(
            PullRequestId::from(self.pull_request_id),
            self.pull_request_name,
            UserId::from(self.author_id),
            self.status,
            reviewers,
            self.created_at,
            self.merged_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct ReviewerRow {
    pull_request_id: String,
    user_id: String,
    assigned_at: DateTime<Utc>,
}

#[async_trait]
impl PullRequestRepository for PostgresPullRequestRepository {
    async fn create(&self, pr: &PullRequest) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO pull_requests (
                pull_request_id, pull_request_name, author_id, status, created_at, merged_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(pr.id().as_str())
        .bind(pr.title())
        .bind(pr.author_id().as_str())
        .bind(pr.status())
        .bind(pr.created_at())
        .bind(pr.merged_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to create pull request", e))?;

        Self::insert_reviewers(&mut tx, pr).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit pull request", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, RepositoryError> {
        let mut tx = self.begin_snapshot().await?;

        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            SELECT
                pull_request_id, pull_request_name, author_id,
                status, created_at, merged_at
            FROM pull_requests
            WHERE pull_request_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to find pull request by id", e))?;

        let pr = match row {
            Some(row) => Self::hydrate(&mut *tx, vec![row]).await?.pop(),
            None => None,
        };

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to end read transaction", e))?;

        Ok(pr)
    }

    async fn update(&self, pr: &PullRequest) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        // Row lock serializes concurrent writers to the same pull request
        let current = sqlx::query_scalar::<_, PullRequestStatus>(
            r#"
            SELECT status FROM pull_requests WHERE pull_request_id = $1 FOR UPDATE
            "#,
        )
        .bind(pr.id().as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to lock pull request", e))?;

        match current {
            None => {
                return Err(RepositoryError::NotFound(format!("pull request {}", pr.id())));
            }
            Some(PullRequestStatus::Merged) => {
                return Err(RepositoryError::Conflict(format!(
                    "pull request {} is already merged",
                    pr.id()
                )));
            }
            Some(PullRequestStatus::Open) => {}
        }

        sqlx::query(
            r#"
            UPDATE pull_requests
            SET status = $2, merged_at = $3
            WHERE pull_request_id = $1
            "#,
        )
        .bind(pr.id().as_str())
        .bind(pr.status())
        .bind(pr.merged_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to update pull request", e))?;

        sqlx::query("DELETE FROM pr_reviewers WHERE pull_request_id = $1")
            .bind(pr.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to clear reviewers", e))?;

        Self::insert_reviewers(&mut tx, pr).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit pull request update", e))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<PullRequest>, RepositoryError> {
        let mut tx = self.begin_snapshot().await?;

        let rows = sqlx::query_as::<_, PullRequestRow>(
            r#"
            SELECT
                pull_request_id, pull_request_name, author_id,
                status, created_at, merged_at
            FROM pull_requests
            ORDER BY pull_request_id
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to list pull requests", e))?;

        let prs = Self::hydrate(&mut *tx, rows).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to end read transaction", e))?;

        Ok(prs)
    }

    async fn find_by_reviewer(&self, user_id: &UserId) -> Result<Vec<PullRequest>, RepositoryError> {
        let mut tx = self.begin_snapshot().await?;

        let rows = sqlx::query_as::<_, PullRequestRow>(
            r#"
            SELECT
                pr.pull_request_id, pr.pull_request_name, pr.author_id,
                pr.status, pr.created_at, pr.merged_at
            FROM pull_requests pr
            JOIN pr_reviewers r ON r.pull_request_id = pr.pull_request_id
            WHERE r.user_id = $1
            ORDER BY pr.pull_request_id
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to find pull requests by reviewer", e))?;

        let prs = Self::hydrate(&mut *tx, rows).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to end read transaction", e))?;

        Ok(prs)
    }
}
