use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use storage::{
    Database,
    dto::scoring::{ScoringRulesResponse, UpdateScoringRulesRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/scoring",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Effective point table", body = ScoringRulesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this league"),
        (status = 404, description = "League not found")
    ),
    tag = "scoring"
)]
pub async fn get_scoring_rules(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(league_id): Path<Uuid>,
) -> Result<Json<ScoringRulesResponse>, WebError> {
    let rules = services::get_rules(db.pool(), &user, league_id).await?;

    Ok(Json(rules))
}

#[utoipa::path(
    put,
    path = "/api/leagues/{league_id}/scoring",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    request_body = UpdateScoringRulesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ruleset saved", body = ScoringRulesResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the league administrator can do this"),
        (status = 404, description = "League not found")
    ),
    tag = "scoring"
)]
pub async fn update_scoring_rules(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(league_id): Path<Uuid>,
    payload: Result<Json<UpdateScoringRulesRequest>, JsonRejection>,
) -> Result<Json<ScoringRulesResponse>, WebError> {
    let Json(req) = payload?;

    req.validate()?;

    let rules = services::update_rules(db.pool(), &user, league_id, &req.points).await?;

    Ok(Json(rules))
}

#[utoipa::path(
    delete,
    path = "/api/leagues/{league_id}/scoring",
    params(
        ("league_id" = Uuid, Path, description = "League id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ruleset reset to the baseline", body = ScoringRulesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the league administrator can do this"),
        (status = 404, description = "League not found")
    ),
    tag = "scoring"
)]
pub async fn reset_scoring_rules(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(league_id): Path<Uuid>,
) -> Result<Json<ScoringRulesResponse>, WebError> {
    let rules = services::reset_rules(db.pool(), &user, league_id).await?;

    Ok(Json(rules))
}
