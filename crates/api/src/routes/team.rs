use axum::{Json, extract::State, http::StatusCode};
use roster_db::models::{TeamMember, TeamRoster};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{ValidatedJson, ValidatedQuery},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct AddTeamRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "team_name is required"))]
    pub team_name: String,
    #[serde(default)]
    #[validate(nested)]
    pub members: Vec<MemberRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MemberRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TeamQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "team_name is required"))]
    pub team_name: String,
}

#[derive(Debug, Serialize)]
pub struct AddTeamResponse {
    pub team: TeamRoster,
}

pub async fn add(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<AddTeamRequest>,
) -> Result<(StatusCode, Json<AddTeamResponse>), ApiError> {
    let members: Vec<TeamMember> = body
        .members
        .into_iter()
        .map(|m| TeamMember {
            user_id: m.user_id,
            username: m.username,
            is_active: m.is_active,
        })
        .collect();

    let team = state.assignments.add_team(&body.team_name, &members).await?;

    Ok((StatusCode::CREATED, Json(AddTeamResponse { team })))
}

pub async fn get(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<TeamQuery>,
) -> Result<Json<TeamRoster>, ApiError> {
    let team = state.assignments.get_team(&query.team_name).await?;
    Ok(Json(team))
}
