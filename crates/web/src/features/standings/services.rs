use sqlx::PgPool;
use storage::{
    dto::standings::{EventStandingEntry, LeagueStandingEntry},
    error::Result,
    repository::race_event::RaceEventRepository,
    services::standings,
};
use uuid::Uuid;

use crate::features::leagues::services::find_league_for_member;
use crate::middleware::auth::AuthUser;

/// Season standings of a league
pub async fn league_standings(
    pool: &PgPool,
    user: &AuthUser,
    league_id: Uuid,
) -> Result<Vec<LeagueStandingEntry>> {
    find_league_for_member(pool, league_id, user).await?;
    standings::league_standings(pool, league_id).await
}

/// Standings of a league for a single race event
pub async fn event_standings(
    pool: &PgPool,
    user: &AuthUser,
    league_id: Uuid,
    race_event_id: Uuid,
) -> Result<Vec<EventStandingEntry>> {
    find_league_for_member(pool, league_id, user).await?;
    RaceEventRepository::new(pool).find_by_id(race_event_id).await?;

    standings::event_standings(pool, league_id, race_event_id).await
}
