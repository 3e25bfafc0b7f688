pub mod leagues;
pub mod predictions;
pub mod race_events;
pub mod results;
pub mod scoring;
pub mod standings;

use axum::Router;
use storage::Database;

use crate::middleware::auth::JwtKeys;

pub fn api_router(keys: JwtKeys) -> Router<Database> {
    Router::new()
        .nest(
            "/api/race-events",
            race_events::routes::routes(keys.clone()).merge(results::routes::routes(keys.clone())),
        )
        .nest("/api/predictions", predictions::routes::routes(keys.clone()))
        .nest(
            "/api/leagues",
            leagues::routes::routes(keys.clone())
                .merge(scoring::routes::routes(keys.clone()))
                .merge(standings::routes::routes(keys.clone())),
        )
        .nest("/api/admin", results::routes::admin_routes(keys))
}
