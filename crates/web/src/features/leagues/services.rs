use std::collections::HashMap;

use sqlx::PgPool;
use storage::{
    dto::{
        league::{AdministeredLeagueResponse, LeagueDetailResponse, LeaguePreview, LeagueSummary},
        scoring::ScoringRulesResponse,
    },
    error::{Result, StorageError},
    models::League,
    repository::{
        league::LeagueRepository, scoring_rules::ScoringRulesRepository, user::UserRepository,
    },
};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

pub fn ensure_league_admin(league: &League, user: &AuthUser) -> Result<()> {
    if league.admin_id == user.user_id {
        Ok(())
    } else {
        Err(StorageError::Forbidden(
            "Only the league administrator can do this".to_string(),
        ))
    }
}

/// Load a league the caller belongs to.
pub async fn find_league_for_member(
    pool: &PgPool,
    league_id: Uuid,
    user: &AuthUser,
) -> Result<League> {
    let repo = LeagueRepository::new(pool);
    let league = repo.find_by_id(league_id).await?;

    if league.admin_id == user.user_id || repo.is_member(league_id, user.user_id).await? {
        Ok(league)
    } else {
        Err(StorageError::Forbidden(
            "Not a member of this league".to_string(),
        ))
    }
}

/// Create a league owned by the caller
pub async fn create_league(pool: &PgPool, user: &AuthUser, name: &str) -> Result<League> {
    UserRepository::new(pool)
        .upsert(user.user_id, &user.username, &user.role)
        .await?;

    let repo = LeagueRepository::new(pool);
    let league = repo.create(name, user.user_id).await?;

    tracing::info!("User {} created league {}", user.user_id, league.league_id);

    Ok(league)
}

/// Leagues the caller belongs to
pub async fn list_my_leagues(pool: &PgPool, user: &AuthUser) -> Result<Vec<LeagueSummary>> {
    let repo = LeagueRepository::new(pool);
    repo.list_for_user(user.user_id).await
}

/// League detail with members and effective point table
pub async fn get_league(
    pool: &PgPool,
    user: &AuthUser,
    league_id: Uuid,
) -> Result<LeagueDetailResponse> {
    let league = find_league_for_member(pool, league_id, user).await?;

    let members = LeagueRepository::new(pool).list_members(league_id).await?;
    let rules = ScoringRulesRepository::new(pool)
        .find_for_league(league_id)
        .await?;
    let scoring = ScoringRulesResponse::from_rules(league_id, rules.as_ref());

    Ok(LeagueDetailResponse::new(
        league,
        members,
        scoring,
        user.user_id,
    ))
}

/// Public face of an invite code, shown before joining
pub async fn preview_invite(pool: &PgPool, invite_code: Uuid) -> Result<LeaguePreview> {
    LeagueRepository::new(pool)
        .preview_by_invite_code(invite_code)
        .await
}

/// Leagues the caller administers, with their point tables
pub async fn list_admin_leagues(
    pool: &PgPool,
    user: &AuthUser,
) -> Result<Vec<AdministeredLeagueResponse>> {
    let leagues = LeagueRepository::new(pool)
        .list_administered(user.user_id)
        .await?;

    let ids: Vec<Uuid> = leagues.iter().map(|league| league.league_id).collect();
    let mut rules: HashMap<Uuid, _> = ScoringRulesRepository::new(pool)
        .find_for_leagues(&ids)
        .await?
        .into_iter()
        .map(|rules| (rules.league_id, rules))
        .collect();

    Ok(leagues
        .into_iter()
        .map(|league| {
            let stored = rules.remove(&league.league_id);
            let scoring = ScoringRulesResponse::from_rules(league.league_id, stored.as_ref());
            AdministeredLeagueResponse::new(league, scoring)
        })
        .collect())
}

/// Join the league behind an invite code
pub async fn join_league(pool: &PgPool, user: &AuthUser, invite_code: Uuid) -> Result<League> {
    let repo = LeagueRepository::new(pool);
    let league = repo.find_by_invite_code(invite_code).await?;

    UserRepository::new(pool)
        .upsert(user.user_id, &user.username, &user.role)
        .await?;
    repo.add_member(league.league_id, user.user_id).await?;

    tracing::info!("User {} joined league {}", user.user_id, league.league_id);

    Ok(league)
}

/// Issue a fresh invite code; the old one stops working
pub async fn refresh_invite_code(pool: &PgPool, user: &AuthUser, league_id: Uuid) -> Result<Uuid> {
    let repo = LeagueRepository::new(pool);
    let league = repo.find_by_id(league_id).await?;
    ensure_league_admin(&league, user)?;

    repo.refresh_invite_code(league_id).await
}
