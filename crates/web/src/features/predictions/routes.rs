use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{list_all_predictions, list_own_predictions, submit_predictions};
use crate::middleware::auth::{JwtKeys, require_auth};

pub fn routes(keys: JwtKeys) -> Router<Database> {
    Router::new()
        .route(
            "/:race_event_id",
            get(list_own_predictions).post(submit_predictions),
        )
        .route("/:race_event_id/all", get(list_all_predictions))
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}
