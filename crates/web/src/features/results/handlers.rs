use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        entry::{EnterResultsRequest, ResultResponse},
        scoring::RecomputeSummary,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/race-events/{race_event_id}/results",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    responses(
        (status = 200, description = "Official results entered so far", body = Vec<ResultResponse>),
        (status = 404, description = "Race event not found")
    ),
    tag = "results"
)]
pub async fn list_results(
    State(db): State<Database>,
    Path(race_event_id): Path<Uuid>,
) -> Result<Json<Vec<ResultResponse>>, WebError> {
    let results = services::list_results(db.pool(), race_event_id).await?;

    Ok(Json(results.into_iter().map(ResultResponse::from).collect()))
}

#[utoipa::path(
    put,
    path = "/api/race-events/{race_event_id}/results",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    request_body = EnterResultsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Results stored and scores recomputed", body = RecomputeSummary),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Race event not found"),
        (status = 500, description = "Score recomputation failed; nothing was stored")
    ),
    tag = "results"
)]
pub async fn enter_results(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(race_event_id): Path<Uuid>,
    payload: Result<Json<EnterResultsRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    user.require_admin()?;
    let Json(req) = payload?;

    req.validate()?;

    let summary = services::enter_results(db.pool(), race_event_id, &req).await?;

    Ok(Json(summary).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/race-events/{race_event_id}/recompute",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Scores recomputed from stored results", body = RecomputeSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Race event not found")
    ),
    tag = "admin"
)]
pub async fn recompute_scores(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(race_event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    user.require_admin()?;

    let summary = services::recompute(db.pool(), race_event_id).await?;

    Ok(Json(summary).into_response())
}
