pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.settings.app.cors_origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let team_routes = Router::new()
        .route("/add", post(routes::team::add))
        .route("/get", get(routes::team::get));

    let user_routes = Router::new()
        .route("/setIsActive", post(routes::user::set_is_active))
        .route("/getReview", get(routes::user::get_review));

    let pull_request_routes = Router::new()
        .route("/create", post(routes::pull_request::create))
        .route("/merge", post(routes::pull_request::merge))
        .route("/reassign", post(routes::pull_request::reassign));

    Router::new()
        .nest("/team", team_routes)
        .nest("/users", user_routes)
        .nest("/pullRequest", pull_request_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() {
        return AllowOrigin::from(Any);
    }
    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(values)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
