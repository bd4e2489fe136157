pub mod auth;
pub mod cards;
pub mod users;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bson::oid::ObjectId;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Photo Cards API",
        "version": version,
        "endpoints": {
            "signup": "POST /signup (public)",
            "signin": "POST /signin (public)",
            "users": "/users, /users/me, /users/:userId (protected)",
            "cards": "/cards, /cards/:cardId, /cards/:cardId/likes (protected)",
        }
    }))
}

/// GET /health - liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now })),
        ),
        Err(e) => {
            tracing::error!("store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now })),
            )
        }
    }
}

/// Parse a path identifier, classifying malformed shapes as a bad request.
pub(crate) fn parse_object_id(raw: &str, resource: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::bad_request(format!("invalid {} id", resource)))
}
