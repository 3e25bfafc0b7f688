use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::OutcomeCategory;

/// The official outcome of one category of a race event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResultEntry {
    pub result_id: Uuid,
    pub race_event_id: Uuid,
    #[sqlx(try_from = "String")]
    pub category: OutcomeCategory,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
