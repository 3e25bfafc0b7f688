use axum::{
    Extension, Json,
    extract::{Path, State},
};
use storage::{
    Database,
    dto::standings::{EventStandingEntry, LeagueStandingEntry},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/standings",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Season totals, best first; equal totals share a position", body = Vec<LeagueStandingEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this league"),
        (status = 404, description = "League not found")
    ),
    tag = "standings"
)]
pub async fn get_league_standings(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(league_id): Path<Uuid>,
) -> Result<Json<Vec<LeagueStandingEntry>>, WebError> {
    let standings = services::league_standings(db.pool(), &user, league_id).await?;

    Ok(Json(standings))
}

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/standings/{race_event_id}",
    params(
        ("league_id" = Uuid, Path, description = "League id"),
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event scores with per-key breakdown", body = Vec<EventStandingEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this league"),
        (status = 404, description = "League or race event not found")
    ),
    tag = "standings"
)]
pub async fn get_event_standings(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path((league_id, race_event_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<EventStandingEntry>>, WebError> {
    let standings = services::event_standings(db.pool(), &user, league_id, race_event_id).await?;

    Ok(Json(standings))
}
