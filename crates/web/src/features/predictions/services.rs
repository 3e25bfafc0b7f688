use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::entry::SubmitPredictionsRequest,
    error::{Result, StorageError},
    models::{PredictionEntry, RaceEvent, UserPrediction},
    repository::{
        prediction::PredictionRepository, race_event::RaceEventRepository, user::UserRepository,
    },
};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

/// Everyone's predictions stay hidden until the deadline, except from
/// administrators.
pub fn ensure_all_visible(event: &RaceEvent, user: &AuthUser, now: DateTime<Utc>) -> Result<()> {
    if user.is_admin() || event.predictions_closed_at(now) {
        Ok(())
    } else {
        Err(StorageError::Forbidden(
            "Predictions of other players are hidden until the deadline".to_string(),
        ))
    }
}

/// The caller's own predictions for a race event
pub async fn list_own_predictions(
    pool: &PgPool,
    user: &AuthUser,
    race_event_id: Uuid,
) -> Result<Vec<PredictionEntry>> {
    RaceEventRepository::new(pool).find_by_id(race_event_id).await?;

    let repo = PredictionRepository::new(pool);
    repo.list_for_user(user.user_id, race_event_id).await
}

/// Save the caller's predictions while the event is still open
pub async fn submit_predictions(
    pool: &PgPool,
    user: &AuthUser,
    race_event_id: Uuid,
    request: &SubmitPredictionsRequest,
) -> Result<Vec<PredictionEntry>> {
    let event = RaceEventRepository::new(pool).find_by_id(race_event_id).await?;
    event.ensure_predictions_open(Utc::now())?;

    UserRepository::new(pool)
        .upsert(user.user_id, &user.username, &user.role)
        .await?;

    let repo = PredictionRepository::new(pool);
    let saved = repo
        .save_many(user.user_id, race_event_id, &request.predictions)
        .await?;

    tracing::debug!(
        "Saved {} predictions of user {} for race event {}",
        saved.len(),
        user.user_id,
        race_event_id
    );

    Ok(saved)
}

/// Every user's predictions for a race event
pub async fn list_all_predictions(
    pool: &PgPool,
    user: &AuthUser,
    race_event_id: Uuid,
) -> Result<Vec<UserPrediction>> {
    let event = RaceEventRepository::new(pool).find_by_id(race_event_id).await?;
    ensure_all_visible(&event, user, Utc::now())?;

    let repo = PredictionRepository::new(pool);
    repo.list_for_event_with_users(race_event_id).await
}
