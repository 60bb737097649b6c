//! API Routes
//!
//! Configures the Axum router with all shortener endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, health_handler, rename_handler, resolve_handler, resolve_owner_handler,
    save_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /save` - Store a short link
/// - `GET /:alias` - Resolve an alias and redirect
/// - `GET /u/:owner/:alias` - Resolve in an explicit owner namespace
/// - `PUT /rename` - Move a link to a new alias
/// - `DELETE /:alias` - Delete a link
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/save", post(save_handler))
        .route("/rename", put(rename_handler))
        .route("/health", get(health_handler))
        .route("/u/:owner/:alias", get(resolve_owner_handler))
        .route("/:alias", get(resolve_handler).delete(delete_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
