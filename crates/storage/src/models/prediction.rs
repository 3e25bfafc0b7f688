use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::OutcomeCategory;

/// A user's guess for one category of one race event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PredictionEntry {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub race_event_id: Uuid,
    #[sqlx(try_from = "String")]
    pub category: OutcomeCategory,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// A prediction joined with its author's username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserPrediction {
    pub user_id: Uuid,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub category: OutcomeCategory,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
