use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::RaceEvent;

/// Request payload for creating a race event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRaceEventRequest {
    #[validate(range(min = 1950, max = 2100, message = "Year must be between 1950 and 2100"))]
    pub year: i32,

    #[validate(range(min = 1, max = 40, message = "Round must be between 1 and 40"))]
    pub round: i32,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub country: String,

    #[validate(length(min = 1, max = 255))]
    pub circuit: String,

    pub qualifying_start: DateTime<Utc>,

    pub race_start: DateTime<Utc>,

    #[serde(default)]
    pub has_sprint: bool,
}

impl CreateRaceEventRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_schedule(&self) -> Result<(), &'static str> {
        validate_schedule(self.qualifying_start, self.race_start)
    }
}

/// Request payload for updating a race event. Year and round are immutable.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRaceEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub country: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub circuit: Option<String>,

    pub qualifying_start: Option<DateTime<Utc>>,

    pub race_start: Option<DateTime<Utc>>,

    pub has_sprint: Option<bool>,
}

impl UpdateRaceEventRequest {
    /// Checks the schedule that would result from applying this update.
    pub fn validate_schedule_against(&self, existing: &RaceEvent) -> Result<(), &'static str> {
        validate_schedule(
            self.qualifying_start.unwrap_or(existing.qualifying_start),
            self.race_start.unwrap_or(existing.race_start),
        )
    }
}

fn validate_schedule(
    qualifying_start: DateTime<Utc>,
    race_start: DateTime<Utc>,
) -> Result<(), &'static str> {
    if qualifying_start >= race_start {
        return Err("Qualifying must start before the race");
    }
    Ok(())
}

/// Race event with its prediction window
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceEventResponse {
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
    pub prediction_deadline: DateTime<Utc>,
    /// When predictions open; absent for the first round of a season.
    pub open_from: Option<DateTime<Utc>>,
}

impl RaceEventResponse {
    pub fn new(event: RaceEvent, open_from: Option<DateTime<Utc>>) -> Self {
        Self {
            prediction_deadline: event.prediction_deadline(),
            race_event_id: event.race_event_id,
            year: event.year,
            round: event.round,
            name: event.name,
            country: event.country,
            circuit: event.circuit,
            qualifying_start: event.qualifying_start,
            race_start: event.race_start,
            has_sprint: event.has_sprint,
            is_result_entered: event.is_result_entered,
            open_from,
        }
    }
}

impl From<RaceEvent> for RaceEventResponse {
    fn from(event: RaceEvent) -> Self {
        Self::new(event, None)
    }
}
