use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use roster_db::models::{PrStatus, PullRequest, PullRequestSummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::ValidatedJson, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePullRequestRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "pull_request_id is required"))]
    pub pull_request_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "pull_request_name is required"))]
    pub pull_request_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "author_id is required"))]
    pub author_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MergeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "pull_request_id is required"))]
    pub pull_request_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReassignRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "pull_request_id is required"))]
    pub pull_request_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "old_user_id is required"))]
    pub old_user_id: String,
}

#[derive(Debug, Serialize)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PullRequestShortResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
}

#[derive(Debug, Serialize)]
pub struct PrEnvelope {
    pub pr: PullRequestResponse,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: String,
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreatePullRequestRequest>,
) -> Result<(StatusCode, Json<PrEnvelope>), ApiError> {
    let pr = state
        .assignments
        .create(&body.pull_request_id, &body.pull_request_name, &body.author_id)
        .await?;

    Ok((StatusCode::CREATED, Json(PrEnvelope { pr: to_response(pr) })))
}

pub async fn merge(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<MergeRequest>,
) -> Result<Json<PrEnvelope>, ApiError> {
    let pr = state.assignments.merge(&body.pull_request_id).await?;
    Ok(Json(PrEnvelope { pr: to_response(pr) }))
}

pub async fn reassign(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ReassignRequest>,
) -> Result<Json<ReassignResponse>, ApiError> {
    let outcome = state
        .assignments
        .reassign(&body.pull_request_id, &body.old_user_id)
        .await?;

    Ok(Json(ReassignResponse {
        pr: to_response(outcome.pull_request),
        replaced_by: outcome.replaced_by,
    }))
}

pub fn to_response(pr: PullRequest) -> PullRequestResponse {
    PullRequestResponse {
        pull_request_id: pr.id,
        pull_request_name: pr.name,
        author_id: pr.author_id,
        status: pr.status,
        assigned_reviewers: pr.reviewers,
        created_at: Some(pr.created_at.to_chrono()),
        merged_at: pr.merged_at.map(|t| t.to_chrono()),
    }
}

pub fn to_short_response(pr: PullRequestSummary) -> PullRequestShortResponse {
    PullRequestShortResponse {
        pull_request_id: pr.id,
        pull_request_name: pr.name,
        author_id: pr.author_id,
        status: pr.status,
    }
}
