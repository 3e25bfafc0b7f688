use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::entry::{PredictionResponse, SubmitPredictionsRequest},
    models::UserPrediction,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/predictions/{race_event_id}",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's predictions", body = Vec<PredictionResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Race event not found")
    ),
    tag = "predictions"
)]
pub async fn list_own_predictions(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(race_event_id): Path<Uuid>,
) -> Result<Json<Vec<PredictionResponse>>, WebError> {
    let predictions = services::list_own_predictions(db.pool(), &user, race_event_id).await?;

    Ok(Json(
        predictions
            .into_iter()
            .map(PredictionResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/predictions/{race_event_id}",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    request_body = SubmitPredictionsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Predictions saved", body = Vec<PredictionResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Predictions are closed for this race event"),
        (status = 404, description = "Race event not found")
    ),
    tag = "predictions"
)]
pub async fn submit_predictions(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(race_event_id): Path<Uuid>,
    payload: Result<Json<SubmitPredictionsRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;

    req.validate()?;

    let saved = services::submit_predictions(db.pool(), &user, race_event_id, &req).await?;

    let response: Vec<PredictionResponse> =
        saved.into_iter().map(PredictionResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/predictions/{race_event_id}/all",
    params(
        ("race_event_id" = Uuid, Path, description = "Race event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Every player's predictions", body = Vec<UserPrediction>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Hidden until the prediction deadline"),
        (status = 404, description = "Race event not found")
    ),
    tag = "predictions"
)]
pub async fn list_all_predictions(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(race_event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let predictions = services::list_all_predictions(db.pool(), &user, race_event_id).await?;

    Ok(Json(predictions).into_response())
}
