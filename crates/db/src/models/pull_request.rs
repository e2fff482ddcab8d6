use bson::DateTime;
use serde::{Deserialize, Serialize};

/// Upper bound on live reviewers per pull request.
pub const MAX_REVIEWERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }
}

/// A pull request together with its reviewer relation. Reviewers are
/// embedded so the PR and its assignments are always written in one
/// document operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
    /// Ordered by assignment time.
    #[serde(default)]
    pub reviewers: Vec<String>,
    pub created_at: DateTime,
    pub merged_at: Option<DateTime>,
}

impl PullRequest {
    pub const COLLECTION: &'static str = "pull_requests";

    pub fn open(
        id: String,
        name: String,
        author_id: String,
        reviewers: Vec<String>,
        created_at: DateTime,
    ) -> Self {
        Self {
            id,
            name,
            author_id,
            status: PrStatus::Open,
            reviewers,
            created_at,
            merged_at: None,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.status == PrStatus::Merged
    }

    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.reviewers.iter().any(|r| r == user_id)
    }
}

/// Listing view of a pull request, without reviewers or timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
}

impl From<&PullRequest> for PullRequestSummary {
    fn from(pr: &PullRequest) -> Self {
        Self {
            id: pr.id.clone(),
            name: pr.name.clone(),
            author_id: pr.author_id.clone(),
            status: pr.status,
        }
    }
}
