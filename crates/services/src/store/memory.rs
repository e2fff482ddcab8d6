//! In-process implementation of [`ReviewStore`].
//!
//! All state sits behind one mutex, so each trait method is trivially
//! atomic. Nothing survives a restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use bson::DateTime;
use parking_lot::Mutex;
use roster_db::models::{PrStatus, PullRequest, Team, TeamMember, User};

use super::ReviewStore;
use crate::dao::{DaoError, DaoResult};

#[derive(Default)]
struct Inner {
    teams: BTreeMap<String, Team>,
    users: BTreeMap<String, User>,
    /// Insertion order, used to break `created_at` ties.
    pull_requests: Vec<PullRequest>,
    pr_index: HashMap<String, usize>,
}

impl Inner {
    fn ensure_team(&mut self, team_name: &str, now: DateTime) -> DaoResult<()> {
        if self.teams.contains_key(team_name) {
            return Err(DaoError::DuplicateKey(format!("team {team_name}")));
        }
        self.teams
            .insert(team_name.to_string(), Team::new(team_name, now));
        Ok(())
    }

    fn upsert_member(&mut self, team_name: &str, member: &TeamMember, now: DateTime) {
        match self.users.get_mut(&member.user_id) {
            Some(user) => {
                user.username = member.username.clone();
                user.team_name = team_name.to_string();
                user.is_active = member.is_active;
                user.updated_at = now;
            }
            None => {
                self.users.insert(
                    member.user_id.clone(),
                    User::from_member(team_name, member, now),
                );
            }
        }
    }

    fn pull_request_mut(&mut self, pr_id: &str) -> Option<&mut PullRequest> {
        let idx = *self.pr_index.get(pr_id)?;
        self.pull_requests.get_mut(idx)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn create_team(
        &self,
        team_name: &str,
        members: &[TeamMember],
        now: DateTime,
    ) -> DaoResult<()> {
        let mut inner = self.inner.lock();
        inner.ensure_team(team_name, now)?;
        for member in members {
            inner.upsert_member(team_name, member, now);
        }
        Ok(())
    }

    async fn team_members(&self, team_name: &str) -> DaoResult<Vec<User>> {
        let inner = self.inner.lock();
        Ok(inner
            .users
            .values()
            .filter(|u| u.team_name == team_name)
            .cloned()
            .collect())
    }

    async fn find_user(&self, user_id: &str) -> DaoResult<Option<User>> {
        Ok(self.inner.lock().users.get(user_id).cloned())
    }

    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
        now: DateTime,
    ) -> DaoResult<Option<User>> {
        let mut inner = self.inner.lock();
        Ok(inner.users.get_mut(user_id).map(|user| {
            user.is_active = is_active;
            user.updated_at = now;
            user.clone()
        }))
    }

    async fn insert_pull_request(&self, pr: &PullRequest) -> DaoResult<()> {
        let mut inner = self.inner.lock();
        if inner.pr_index.contains_key(&pr.id) {
            return Err(DaoError::DuplicateKey(format!("pull request {}", pr.id)));
        }
        let idx = inner.pull_requests.len();
        inner.pull_requests.push(pr.clone());
        inner.pr_index.insert(pr.id.clone(), idx);
        Ok(())
    }

    async fn find_pull_request(&self, pr_id: &str) -> DaoResult<Option<PullRequest>> {
        let inner = self.inner.lock();
        Ok(inner
            .pr_index
            .get(pr_id)
            .and_then(|&idx| inner.pull_requests.get(idx))
            .cloned())
    }

    async fn mark_merged(&self, pr_id: &str, merged_at: DateTime) -> DaoResult<bool> {
        let mut inner = self.inner.lock();
        match inner.pull_request_mut(pr_id) {
            Some(pr) if pr.status == PrStatus::Open => {
                pr.status = PrStatus::Merged;
                pr.merged_at = Some(merged_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn swap_reviewers(
        &self,
        pr_id: &str,
        expected: &[String],
        updated: &[String],
    ) -> DaoResult<bool> {
        let mut inner = self.inner.lock();
        match inner.pull_request_mut(pr_id) {
            Some(pr) if pr.status == PrStatus::Open && pr.reviewers == expected => {
                pr.reviewers = updated.to_vec();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn pull_requests_for_reviewer(&self, user_id: &str) -> DaoResult<Vec<PullRequest>> {
        let inner = self.inner.lock();
        let mut found: Vec<PullRequest> = inner
            .pull_requests
            .iter()
            .rev()
            .filter(|pr| pr.has_reviewer(user_id))
            .cloned()
            .collect();
        // Stable sort keeps later insertions first among equal timestamps.
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}
