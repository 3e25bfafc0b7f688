use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{get_event_standings, get_league_standings};
use crate::middleware::auth::{JwtKeys, require_auth};

/// Mounted under `/api/leagues`
pub fn routes(keys: JwtKeys) -> Router<Database> {
    Router::new()
        .route("/:league_id/standings", get(get_league_standings))
        .route("/:league_id/standings/:race_event_id", get(get_event_standings))
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}
