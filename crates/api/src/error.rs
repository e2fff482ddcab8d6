use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_services::AssignmentError;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    /// Body or query could not be decoded.
    InvalidInput(String),
    /// A required field is absent or empty.
    MissingParam(String),
    Assignment(AssignmentError),
}

#[derive(Serialize)]
struct ErrorDetails {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

/// HTTP status for each domain error kind.
pub fn status_for(err: &AssignmentError) -> StatusCode {
    match err {
        AssignmentError::NotFound(..) => StatusCode::NOT_FOUND,
        AssignmentError::TeamExists(_) => StatusCode::BAD_REQUEST,
        AssignmentError::PrExists(_)
        | AssignmentError::PrMerged(_)
        | AssignmentError::NotAssigned { .. }
        | AssignmentError::NoCandidate(_)
        | AssignmentError::Conflict(_) => StatusCode::CONFLICT,
        AssignmentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::MissingParam(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Assignment(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    error!(error = %err, "Internal error");
                    (status, err.code(), "internal server error".to_string())
                } else {
                    warn!(code = err.code(), error = %err, "Request rejected");
                    (status, err.code(), err.to_string())
                }
            }
        };

        let body = ErrorResponse {
            error: ErrorDetails { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AssignmentError> for ApiError {
    fn from(err: AssignmentError) -> Self {
        ApiError::Assignment(err)
    }
}
