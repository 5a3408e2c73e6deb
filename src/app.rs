use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, method_not_allowed};
use crate::middleware::basic_auth_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/health", get(handlers::health_get))
        // Basic auth on everything under /v1
        .merge(v1_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn v1_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/v1/add/user",
            post(handlers::user_add).fallback(|| async { method_not_allowed("POST") }),
        )
        .route(
            "/v1/remove/user",
            delete(handlers::user_remove).fallback(|| async { method_not_allowed("DELETE") }),
        )
        .route(
            "/v1/add/movie",
            post(handlers::movie_add).fallback(|| async { method_not_allowed("POST") }),
        )
        .route(
            "/v1/remove/movie",
            delete(handlers::movie_remove).fallback(|| async { method_not_allowed("DELETE") }),
        )
        .route(
            "/v1/update/movie",
            put(handlers::movie_update).fallback(|| async { method_not_allowed("PUT") }),
        )
        .route(
            "/v1/get/movie",
            get(handlers::movie_get).fallback(|| async { method_not_allowed("GET") }),
        )
        .route_layer(from_fn_with_state(state, basic_auth_middleware))
}
