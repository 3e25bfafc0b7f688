use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

/// Predictions lock this many minutes before qualifying starts.
pub const PREDICTION_LOCK_MINUTES: i64 = 10;

/// A race weekend, unique per (year, round).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RaceEvent {
    pub race_event_id: Uuid,
    pub year: i32,
    pub round: i32,
    pub name: String,
    pub country: String,
    pub circuit: String,
    pub qualifying_start: DateTime<Utc>,
    pub race_start: DateTime<Utc>,
    pub has_sprint: bool,
    pub is_result_entered: bool,
    pub created_at: DateTime<Utc>,
}

impl RaceEvent {
    /// The instant after which predictions can no longer be created or changed.
    pub fn prediction_deadline(&self) -> DateTime<Utc> {
        self.qualifying_start - TimeDelta::minutes(PREDICTION_LOCK_MINUTES)
    }

    pub fn predictions_closed_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.prediction_deadline()
    }

    pub fn ensure_predictions_open(&self, now: DateTime<Utc>) -> Result<()> {
        if self.predictions_closed_at(now) {
            return Err(StorageError::PredictionsClosed {
                deadline: self.prediction_deadline(),
            });
        }
        Ok(())
    }
}

/// Predictions for a round open at midnight (UTC) on the day after the
/// previous round's race.
pub fn predictions_open_from(previous_race_start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    previous_race_start
        .date_naive()
        .succ_opt()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
}
