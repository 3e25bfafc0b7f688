use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{get_scoring_rules, reset_scoring_rules, update_scoring_rules};
use crate::middleware::auth::{JwtKeys, require_auth};

/// Mounted under `/api/leagues`
pub fn routes(keys: JwtKeys) -> Router<Database> {
    Router::new()
        .route(
            "/:league_id/scoring",
            get(get_scoring_rules)
                .put(update_scoring_rules)
                .delete(reset_scoring_rules),
        )
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}
