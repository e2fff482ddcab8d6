use bson::{doc, DateTime};
use mongodb::Database;
use roster_db::models::{PrStatus, PullRequest};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct PullRequestDao {
    pub base: BaseDao<PullRequest>,
}

impl PullRequestDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, PullRequest::COLLECTION),
        }
    }

    /// A taken id surfaces as `DaoError::DuplicateKey`.
    pub async fn insert(&self, pr: &PullRequest) -> DaoResult<()> {
        self.base.insert_one(pr).await
    }

    pub async fn find_by_id(&self, pr_id: &str) -> DaoResult<Option<PullRequest>> {
        match self.base.find_by_id(pr_id).await {
            Ok(pr) => Ok(Some(pr)),
            Err(DaoError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Moves an open PR to MERGED. Returns false when the PR is missing or
    /// was already merged.
    pub async fn mark_merged(&self, pr_id: &str, merged_at: DateTime) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": pr_id, "status": PrStatus::Open.as_str() },
                doc! { "$set": {
                    "status": PrStatus::Merged.as_str(),
                    "merged_at": merged_at,
                } },
            )
            .await
    }

    /// Replaces the reviewer list only if the PR is still open and its
    /// reviewers are exactly `expected`.
    pub async fn swap_reviewers(
        &self,
        pr_id: &str,
        expected: &[String],
        updated: &[String],
    ) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! {
                    "_id": pr_id,
                    "status": PrStatus::Open.as_str(),
                    "reviewers": expected.to_vec(),
                },
                doc! { "$set": { "reviewers": updated.to_vec() } },
            )
            .await
    }

    pub async fn find_by_reviewer(&self, user_id: &str) -> DaoResult<Vec<PullRequest>> {
        self.base
            .find_many(
                doc! { "reviewers": user_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }
}
