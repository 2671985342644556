//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, patch, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (intentionally unauthenticated for probes)
        .route("/v1/health", get(handlers::health_check))
        // Model management
        .route(
            "/v1/models",
            post(handlers::create_model).get(handlers::list_models),
        )
        .route("/v1/models/{model}", get(handlers::get_model))
        // Tree navigation and editing
        .route("/v1/models/{model}/tree", get(handlers::get_tree))
        .route("/v1/models/{model}/presses", post(handlers::create_press))
        .route("/v1/models/{model}/assemblies", post(handlers::create_assembly))
        .route("/v1/models/{model}/parts", post(handlers::create_part))
        .route("/v1/models/{model}/tree/move", patch(handlers::move_child))
        .route(
            "/v1/nodes/{node_id}",
            put(handlers::rename_node).delete(handlers::delete_node),
        )
        // Checklist views (served through the cache)
        .route(
            "/v1/models/{model}/parts/{part_id}/checklist",
            get(handlers::get_checklist).post(handlers::create_entry),
        )
        .route(
            "/v1/models/{model}/parts/{part_id}/checklist/{entry_id}",
            put(handlers::update_entry).delete(handlers::delete_entry),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
