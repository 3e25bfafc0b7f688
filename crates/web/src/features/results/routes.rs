use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{enter_results, list_results, recompute_scores};
use crate::middleware::auth::{JwtKeys, require_auth};

/// Mounted under `/api/race-events`
pub fn routes(keys: JwtKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:race_event_id/results", put(enter_results))
        .route_layer(middleware::from_fn_with_state(keys, require_auth));

    Router::new()
        .route("/:race_event_id/results", get(list_results))
        .merge(protected)
}

/// Mounted under `/api/admin`
pub fn admin_routes(keys: JwtKeys) -> Router<Database> {
    Router::new()
        .route("/race-events/:race_event_id/recompute", post(recompute_scores))
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}
