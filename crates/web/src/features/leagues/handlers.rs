use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::league::{
        AdministeredLeagueResponse, CreateLeagueRequest, InviteCodeResponse, JoinLeagueResponse,
        LeagueDetailResponse, LeaguePreview, LeagueResponse, LeagueSummary,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/leagues",
    request_body = CreateLeagueRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "League created with the caller as administrator", body = LeagueResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator role required")
    ),
    tag = "leagues"
)]
pub async fn create_league(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateLeagueRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    user.require_admin()?;
    let Json(req) = payload?;

    req.validate()?;

    let league = services::create_league(db.pool(), &user, req.name.trim()).await?;

    Ok((StatusCode::CREATED, Json(LeagueResponse::from(league))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leagues",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Leagues the caller belongs to", body = Vec<LeagueSummary>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "leagues"
)]
pub async fn list_my_leagues(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<LeagueSummary>>, WebError> {
    let leagues = services::list_my_leagues(db.pool(), &user).await?;

    Ok(Json(leagues))
}

#[utoipa::path(
    get,
    path = "/api/leagues/admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Leagues administered by the caller", body = Vec<AdministeredLeagueResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator role required")
    ),
    tag = "leagues"
)]
pub async fn list_admin_leagues(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AdministeredLeagueResponse>>, WebError> {
    user.require_admin()?;

    let leagues = services::list_admin_leagues(db.pool(), &user).await?;

    Ok(Json(leagues))
}

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "League with members and point table", body = LeagueDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this league"),
        (status = 404, description = "League not found")
    ),
    tag = "leagues"
)]
pub async fn get_league(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(league_id): Path<Uuid>,
) -> Result<Json<LeagueDetailResponse>, WebError> {
    let league = services::get_league(db.pool(), &user, league_id).await?;

    Ok(Json(league))
}

#[utoipa::path(
    get,
    path = "/api/leagues/join/{invite_code}",
    params(
        ("invite_code" = Uuid, Path, description = "Invite code shared by the league administrator")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "League behind the invite code", body = LeaguePreview),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown invite code")
    ),
    tag = "leagues"
)]
pub async fn preview_invite(
    State(db): State<Database>,
    Path(invite_code): Path<Uuid>,
) -> Result<Json<LeaguePreview>, WebError> {
    let preview = services::preview_invite(db.pool(), invite_code).await?;

    Ok(Json(preview))
}

#[utoipa::path(
    post,
    path = "/api/leagues/join/{invite_code}",
    params(
        ("invite_code" = Uuid, Path, description = "Invite code shared by the league administrator")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Joined the league", body = JoinLeagueResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown invite code"),
        (status = 409, description = "Already a member")
    ),
    tag = "leagues"
)]
pub async fn join_league(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(invite_code): Path<Uuid>,
) -> Result<Response, WebError> {
    let league = services::join_league(db.pool(), &user, invite_code).await?;

    Ok(Json(JoinLeagueResponse {
        league_id: league.league_id,
        name: league.name,
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/leagues/{league_id}/invite/refresh",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "New invite code", body = InviteCodeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the league administrator can do this"),
        (status = 404, description = "League not found")
    ),
    tag = "leagues"
)]
pub async fn refresh_invite_code(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(league_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let invite_code = services::refresh_invite_code(db.pool(), &user, league_id).await?;

    Ok(Json(InviteCodeResponse { invite_code }).into_response())
}
