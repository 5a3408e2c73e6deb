// GET /health - reachability of the identity store and the search index

use axum::{extract::State, http::StatusCode};

use crate::middleware::ApiMessage;
use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> ApiMessage {
    let database = match state.identity.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!("Health check: identity store unreachable: {}", e);
            e.to_string()
        }
    };
    let search = match state.index.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!("Health check: search index unreachable: {}", e);
            e.to_string()
        }
    };

    let healthy = database == "ok" && search == "ok";
    let (status, message) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    ApiMessage::with_status(status, message)
        .field("timestamp", chrono::Utc::now().to_rfc3339())
        .field("database", database)
        .field("search", search)
}
