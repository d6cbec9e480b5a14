//! In-memory implementation of the repository traits.
//!
//! Drives the service and HTTP tests without a database. All state is held
//! in memory and lost on drop.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::pull_request::{PullRequest, PullRequestId};
use crate::domain::repositories::{
    PullRequestRepository, RepositoryError, TeamRepository, UserRepository,
};
use crate::domain::team::{Team, TeamId};
use crate::domain::user::{User, UserId};

/// In-memory store for pull requests, users and teams.
///
/// Each map sits behind its own `RwLock`; every trait call takes a lock
/// once, so each call is atomic with respect to the others.
pub struct InMemoryStore {
    pull_requests: RwLock<HashMap<PullRequestId, PullRequest>>,
    users: RwLock<HashMap<UserId, User>>,
    teams: RwLock<HashMap<TeamId, Team>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            pull_requests: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            teams: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a team, enrolling users already affiliated with it
    pub async fn add_team(&self, mut team: Team) {
        {
            let users = self.users.read().await;
            let mut affiliated: Vec<&User> = users
                .values()
                .filter(|user| user.team_id() == Some(team.id()))
                .collect();
            affiliated.sort_by(|a, b| a.id().cmp(b.id()));
            for user in affiliated {
                team.enroll(user.id().clone());
            }
        }

        let mut teams = self.teams.write().await;
        teams.insert(team.id(), team);
    }

    /// Insert or replace a user, keeping team rosters in sync with its
    /// team affiliation.
    pub async fn add_user(&self, user: User) {
        let mut teams = self.teams.write().await;
        for team in teams.values_mut() {
            if Some(team.id()) != user.team_id() {
                team.remove_member(user.id());
            }
        }
        if let Some(team) = user.team_id().and_then(|id| teams.get_mut(&id)) {
            team.enroll(user.id().clone());
        }
        drop(teams);

        let mut users = self.users.write().await;
        users.insert(user.id().clone(), user);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryStore {
    async fn create(&self, pr: &PullRequest) -> Result<(), RepositoryError> {
        let mut prs = self.pull_requests.write().await;
        if prs.contains_key(pr.id()) {
            return Err(RepositoryError::Conflict(format!(
                "pull request {} already exists",
                pr.id()
            )));
        }
        prs.insert(pr.id().clone(), pr.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, RepositoryError> {
        let prs = self.pull_requests.read().await;
        Ok(prs.get(id).cloned())
    }

    async fn update(&self, pr: &PullRequest) -> Result<(), RepositoryError> {
        let mut prs = self.pull_requests.write().await;
        let stored = prs
            .get_mut(pr.id())
            .ok_or_else(|| RepositoryError::NotFound(format!("pull request {}", pr.id())))?;

        if stored.is_merged() {
            return Err(RepositoryError::Conflict(format!(
                "pull request {} is already merged",
                pr.id()
            )));
        }

        *stored = pr.clone();
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<PullRequest>, RepositoryError> {
        let prs = self.pull_requests.read().await;
        let mut all: Vec<PullRequest> = prs.values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(all)
    }

    async fn find_by_reviewer(&self, user_id: &UserId) -> Result<Vec<PullRequest>, RepositoryError> {
        let prs = self.pull_requests.read().await;
        let mut reviewing: Vec<PullRequest> = prs
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .cloned()
            .collect();
        reviewing.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(reviewing)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Team>, RepositoryError> {
        let team_id = {
            let users = self.users.read().await;
            users.get(user_id).and_then(|user| user.team_id())
        };

        let Some(team_id) = team_id else {
            return Ok(None);
        };

        let teams = self.teams.read().await;
        Ok(teams.get(&team_id).cloned())
    }

    async fn find_active_members_by_team_id(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().await;
        let mut members: Vec<User> = users
            .values()
            .filter(|user| user.team_id() == Some(team_id) && user.is_active())
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, active: bool, team: Option<i32>) -> User {
        User::new(UserId::from(id), id, active, team.map(TeamId::new)).unwrap()
    }

    fn pr(id: &str, reviewers: &[&str]) -> PullRequest {
        PullRequest::new(
            PullRequestId::from(id),
            "title",
            UserId::from("author"),
            reviewers.iter().map(|r| UserId::from(*r)).collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_rejects_duplicate_ids() {
        let store = InMemoryStore::new();
        store.create(&pr("p1", &[])).await.unwrap();

        let result = store.create(&pr("p1", &["u2"])).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        let stored = PullRequestRepository::find_by_id(&store, &PullRequestId::from("p1"))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.reviewer_ids().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_roster() {
        let store = InMemoryStore::new();
        let mut original = pr("p1", &["u2"]);
        store.create(&original).await.unwrap();

        original
            .reassign_reviewer(&UserId::from("u2"), UserId::from("u3"))
            .unwrap();
        store.update(&original).await.unwrap();

        let stored = PullRequestRepository::find_by_id(&store, &PullRequestId::from("p1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.reviewer_ids(), vec![UserId::from("u3")]);
    }

    #[tokio::test]
    async fn update_of_merged_row_conflicts() {
        let store = InMemoryStore::new();
        let mut merged = pr("p1", &[]);
        store.create(&merged).await.unwrap();
        merged.merge();
        store.update(&merged).await.unwrap();

        let result = store.update(&merged).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let store = InMemoryStore::new();

        let result = store.update(&pr("missing", &[])).await;

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_by_reviewer_filters_and_sorts() {
        let store = InMemoryStore::new();
        store.create(&pr("p2", &["u2"])).await.unwrap();
        store.create(&pr("p1", &["u2", "u3"])).await.unwrap();
        store.create(&pr("p3", &["u3"])).await.unwrap();

        let reviewing = store.find_by_reviewer(&UserId::from("u2")).await.unwrap();

        let ids: Vec<&str> = reviewing.iter().map(|pr| pr.id().as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn team_lookup_follows_user_affiliation() {
        let store = InMemoryStore::new();
        store.add_team(Team::new(TeamId::new(1), "core").unwrap()).await;
        store.add_user(user("u1", true, Some(1))).await;
        store.add_user(user("u2", false, Some(1))).await;
        store.add_user(user("u3", true, None)).await;

        let team = store.find_by_user_id(&UserId::from("u1")).await.unwrap().unwrap();
        assert_eq!(team.name(), "core");
        assert_eq!(team.members(), vec![UserId::from("u1"), UserId::from("u2")]);

        assert!(store.find_by_user_id(&UserId::from("u3")).await.unwrap().is_none());
        assert!(store.find_by_user_id(&UserId::from("nobody")).await.unwrap().is_none());

        let active = store
            .find_active_members_by_team_id(TeamId::new(1))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id().as_str(), "u1");
    }

    #[tokio::test]
    async fn moving_a_user_updates_rosters() {
        let store = InMemoryStore::new();
        store.add_team(Team::new(TeamId::new(1), "core").unwrap()).await;
        store.add_team(Team::new(TeamId::new(2), "web").unwrap()).await;
        store.add_user(user("u1", true, Some(1))).await;

        store.add_user(user("u1", true, Some(2))).await;

        let team = store.find_by_user_id(&UserId::from("u1")).await.unwrap().unwrap();
        assert_eq!(team.id(), TeamId::new(2));
        assert!(store
            .find_active_members_by_team_id(TeamId::new(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn re_adding_a_user_or_team_keeps_one_roster_entry() {
        let store = InMemoryStore::new();
        store.add_user(user("u1", true, Some(1))).await;
        store.add_team(Team::new(TeamId::new(1), "core").unwrap()).await;
        store.add_user(user("u1", false, Some(1))).await;
        store.add_team(Team::new(TeamId::new(1), "core").unwrap()).await;

        let team = store.find_by_user_id(&UserId::from("u1")).await.unwrap().unwrap();
        assert_eq!(team.members(), vec![UserId::from("u1")]);
    }
}
