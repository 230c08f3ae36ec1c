pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match API
        .route("/api/v1/match", post(handlers::handle_match))
        .route(
            "/api/v1/weights/normalize",
            post(handlers::handle_normalize_weights),
        )
        .route(
            "/api/v1/weights/presets",
            get(handlers::handle_weight_presets),
        )
        .with_state(state)
}
