//! API Routes
//!
//! Configures the Axum router for the profile endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_handler, delete_handler, get_handler, health_handler, list_handler, stats_handler,
    update_handler, AppState,
};

/// Creates the router, mounting the profile routes under the store's base path.
///
/// The `/update` and `/delete` suffixes back the links attached to each
/// profile; they accept the same verbs as the bare `{base}/:id` route.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let base = state.profiles.base_path().trim_end_matches('/').to_string();
    let collection = if base.is_empty() { "/".to_string() } else { base.clone() };

    Router::new()
        .route(&collection, get(list_handler).post(create_handler))
        .route(
            &format!("{}/:id", base),
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route(
            &format!("{}/:id/update", base),
            put(update_handler).post(update_handler),
        )
        .route(
            &format!("{}/:id/delete", base),
            post(delete_handler).delete(delete_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
