use async_trait::async_trait;
use bson::DateTime;
use mongodb::{Client, Database};
use roster_db::models::{PullRequest, TeamMember, User};

use super::ReviewStore;
use crate::dao::{DaoResult, pull_request::PullRequestDao, team::TeamDao, user::UserDao};

/// [`ReviewStore`] over MongoDB. Team creation needs a replica set
/// (multi-document transactions); everything else is single-document.
pub struct MongoStore {
    teams: TeamDao,
    users: UserDao,
    pull_requests: PullRequestDao,
}

impl MongoStore {
    pub fn new(client: &Client, db: &Database) -> Self {
        Self {
            teams: TeamDao::new(client, db),
            users: UserDao::new(db),
            pull_requests: PullRequestDao::new(db),
        }
    }
}

#[async_trait]
impl ReviewStore for MongoStore {
    async fn create_team(
        &self,
        team_name: &str,
        members: &[TeamMember],
        now: DateTime,
    ) -> DaoResult<()> {
        self.teams.create_with_members(team_name, members, now).await
    }

    async fn team_members(&self, team_name: &str) -> DaoResult<Vec<User>> {
        self.teams.find_members(team_name).await
    }

    async fn find_user(&self, user_id: &str) -> DaoResult<Option<User>> {
        self.users.find_by_id(user_id).await
    }

    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
        now: DateTime,
    ) -> DaoResult<Option<User>> {
        self.users.set_active(user_id, is_active, now).await
    }

    async fn insert_pull_request(&self, pr: &PullRequest) -> DaoResult<()> {
        self.pull_requests.insert(pr).await
    }

    async fn find_pull_request(&self, pr_id: &str) -> DaoResult<Option<PullRequest>> {
        self.pull_requests.find_by_id(pr_id).await
    }

    async fn mark_merged(&self, pr_id: &str, merged_at: DateTime) -> DaoResult<bool> {
        self.pull_requests.mark_merged(pr_id, merged_at).await
    }

    async fn swap_reviewers(
        &self,
        pr_id: &str,
        expected: &[String],
        updated: &[String],
    ) -> DaoResult<bool> {
        self.pull_requests.swap_reviewers(pr_id, expected, updated).await
    }

    async fn pull_requests_for_reviewer(&self, user_id: &str) -> DaoResult<Vec<PullRequest>> {
        self.pull_requests.find_by_reviewer(user_id).await
    }
}
