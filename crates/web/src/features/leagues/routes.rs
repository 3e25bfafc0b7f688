use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    create_league, get_league, join_league, list_admin_leagues, list_my_leagues, preview_invite,
    refresh_invite_code,
};
use crate::middleware::auth::{JwtKeys, require_auth};

pub fn routes(keys: JwtKeys) -> Router<Database> {
    Router::new()
        .route("/", get(list_my_leagues).post(create_league))
        .route("/admin", get(list_admin_leagues))
        .route("/join/:invite_code", get(preview_invite).post(join_league))
        .route("/:league_id", get(get_league))
        .route("/:league_id/invite/refresh", post(refresh_invite_code))
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}
