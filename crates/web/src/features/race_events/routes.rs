use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{create_race_event, get_race_event, list_race_events, update_race_event};
use crate::middleware::auth::{JwtKeys, require_auth};

pub fn routes(keys: JwtKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_race_event))
        .route("/:race_event_id", put(update_race_event))
        .route_layer(middleware::from_fn_with_state(keys, require_auth));

    Router::new()
        .route("/", get(list_race_events))
        .route("/:race_event_id", get(get_race_event))
        .merge(protected)
}
