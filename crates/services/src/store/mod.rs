//! Storage seam for the assignment engine.
//!
//! Every method is one atomic unit against the backing store. The engine
//! composes them and relies on the conditional writes (`mark_merged`,
//! `swap_reviewers`) to detect concurrent changes instead of holding locks
//! across a whole operation.

mod memory;
mod mongo;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::DateTime;
use roster_db::models::{PullRequest, TeamMember, User};

use crate::dao::DaoResult;

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Create the team and upsert every member under it, stamping writes
    /// with `now`.
    ///
    /// Fails with `DaoError::DuplicateKey` if the team exists, in which
    /// case no member is written.
    async fn create_team(
        &self,
        team_name: &str,
        members: &[TeamMember],
        now: DateTime,
    ) -> DaoResult<()>;

    /// Users whose current affiliation is `team_name`, in a stable order.
    async fn team_members(&self, team_name: &str) -> DaoResult<Vec<User>>;

    async fn find_user(&self, user_id: &str) -> DaoResult<Option<User>>;

    /// Returns the updated user, or `None` if the id is unknown.
    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
        now: DateTime,
    ) -> DaoResult<Option<User>>;

    /// Persist a PR together with its reviewers. A taken id fails with
    /// `DaoError::DuplicateKey`.
    async fn insert_pull_request(&self, pr: &PullRequest) -> DaoResult<()>;

    async fn find_pull_request(&self, pr_id: &str) -> DaoResult<Option<PullRequest>>;

    /// OPEN -> MERGED. Returns false if the PR is missing or not open.
    async fn mark_merged(&self, pr_id: &str, merged_at: DateTime) -> DaoResult<bool>;

    /// Compare-and-set on the reviewer relation: succeeds only while the PR
    /// is open and its reviewer list still equals `expected`.
    async fn swap_reviewers(
        &self,
        pr_id: &str,
        expected: &[String],
        updated: &[String],
    ) -> DaoResult<bool>;

    /// PRs where `user_id` is currently a reviewer, most recent first.
    async fn pull_requests_for_reviewer(&self, user_id: &str) -> DaoResult<Vec<PullRequest>>;
}
