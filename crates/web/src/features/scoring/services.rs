use std::collections::BTreeMap;

use sqlx::PgPool;
use storage::{
    dto::scoring::ScoringRulesResponse,
    error::Result,
    models::{ScoreKey, resolve_rules},
    repository::{league::LeagueRepository, scoring_rules::ScoringRulesRepository},
};
use uuid::Uuid;

use crate::features::leagues::services::{ensure_league_admin, find_league_for_member};
use crate::middleware::auth::AuthUser;

/// Effective point table of a league
pub async fn get_rules(
    pool: &PgPool,
    user: &AuthUser,
    league_id: Uuid,
) -> Result<ScoringRulesResponse> {
    find_league_for_member(pool, league_id, user).await?;

    let rules = ScoringRulesRepository::new(pool)
        .find_for_league(league_id)
        .await?;

    Ok(ScoringRulesResponse::from_rules(league_id, rules.as_ref()))
}

/// Apply per-key changes on top of the effective table and store the result
/// as the league's explicit ruleset
pub async fn update_rules(
    pool: &PgPool,
    user: &AuthUser,
    league_id: Uuid,
    points: &BTreeMap<ScoreKey, i32>,
) -> Result<ScoringRulesResponse> {
    let league = LeagueRepository::new(pool).find_by_id(league_id).await?;
    ensure_league_admin(&league, user)?;

    let repo = ScoringRulesRepository::new(pool);
    let current = repo.find_for_league(league_id).await?;
    let table = resolve_rules(current.as_ref()).with_overrides(points);

    let saved = repo.save_overrides(league_id, &table).await?;

    tracing::info!(
        "League {} ruleset updated ({} keys changed)",
        league_id,
        points.len()
    );

    Ok(ScoringRulesResponse::from_rules(league_id, Some(&saved)))
}

/// Return a league to the baseline table
pub async fn reset_rules(
    pool: &PgPool,
    user: &AuthUser,
    league_id: Uuid,
) -> Result<ScoringRulesResponse> {
    let league = LeagueRepository::new(pool).find_by_id(league_id).await?;
    ensure_league_admin(&league, user)?;

    let saved = ScoringRulesRepository::new(pool)
        .reset_to_defaults(league_id)
        .await?;

    Ok(ScoringRulesResponse::from_rules(league_id, Some(&saved)))
}
