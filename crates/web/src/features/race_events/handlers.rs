use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::race_event::{CreateRaceEventRequest, RaceEventResponse, UpdateRaceEventRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/race-events",
    responses(
        (status = 200, description = "All race events, newest season first", body = Vec<RaceEventResponse>)
    ),
    tag = "race-events"
)]
pub async fn list_race_events(
    State(db): State<Database>,
) -> Result<Json<Vec<RaceEventResponse>>, WebError> {
    let events = services::list_race_events(db.pool()).await?;

    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/race-events/{race_event_id}",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    responses(
        (status = 200, description = "Race event with its prediction window", body = RaceEventResponse),
        (status = 404, description = "Race event not found")
    ),
    tag = "race-events"
)]
pub async fn get_race_event(
    State(db): State<Database>,
    Path(race_event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_race_event(db.pool(), race_event_id).await?;

    Ok(Json(event).into_response())
}

#[utoipa::path(
    post,
    path = "/api/race-events",
    request_body = CreateRaceEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Race event created successfully", body = RaceEventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator role required"),
        (status = 409, description = "Round already exists for this season")
    ),
    tag = "race-events"
)]
pub async fn create_race_event(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateRaceEventRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    user.require_admin()?;
    let Json(req) = payload?;

    req.validate()?;

    req.validate_schedule()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let event = services::create_race_event(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(RaceEventResponse::from(event))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/race-events/{race_event_id}",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    request_body = UpdateRaceEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Race event updated successfully", body = RaceEventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Race event not found")
    ),
    tag = "race-events"
)]
pub async fn update_race_event(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(race_event_id): Path<Uuid>,
    payload: Result<Json<UpdateRaceEventRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    user.require_admin()?;
    let Json(update_req) = payload?;

    update_req.validate()?;

    let existing = services::find_race_event(db.pool(), race_event_id).await?;
    update_req
        .validate_schedule_against(&existing)
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    services::update_race_event(db.pool(), &existing, &update_req).await?;
    let updated = services::get_race_event(db.pool(), race_event_id).await?;

    Ok(Json(updated).into_response())
}
