use axum::{Json, extract::State};
use roster_db::models::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pull_request::{PullRequestShortResponse, to_short_response};
use crate::{
    error::ApiError,
    extractors::{ValidatedJson, ValidatedQuery},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct SetActiveRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct ReviewQueueResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortResponse>,
}

pub async fn set_is_active(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SetActiveRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state
        .assignments
        .set_active(&body.user_id, body.is_active)
        .await?;
    Ok(Json(UserEnvelope {
        user: to_response(user),
    }))
}

pub async fn get_review(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ReviewQuery>,
) -> Result<Json<ReviewQueueResponse>, ApiError> {
    let prs = state.assignments.review_queue(&query.user_id).await?;
    Ok(Json(ReviewQueueResponse {
        user_id: query.user_id,
        pull_requests: prs.into_iter().map(to_short_response).collect(),
    }))
}

fn to_response(user: User) -> UserResponse {
    UserResponse {
        user_id: user.user_id,
        username: user.username,
        team_name: user.team_name,
        is_active: user.is_active,
    }
}
