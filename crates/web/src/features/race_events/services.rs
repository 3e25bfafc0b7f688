use std::collections::HashMap;

use sqlx::PgPool;
use storage::{
    dto::race_event::{CreateRaceEventRequest, RaceEventResponse, UpdateRaceEventRequest},
    error::Result,
    models::{RaceEvent, predictions_open_from},
    repository::race_event::RaceEventRepository,
};
use uuid::Uuid;

/// Attach the prediction window to each event. The window opens the day after
/// the previous round of the same season.
pub fn with_open_from(events: Vec<RaceEvent>) -> Vec<RaceEventResponse> {
    let race_starts: HashMap<(i32, i32), _> = events
        .iter()
        .map(|event| ((event.year, event.round), event.race_start))
        .collect();

    events
        .into_iter()
        .map(|event| {
            let open_from = race_starts
                .get(&(event.year, event.round - 1))
                .and_then(|start| predictions_open_from(*start));
            RaceEventResponse::new(event, open_from)
        })
        .collect()
}

/// List all race events
pub async fn list_race_events(pool: &PgPool) -> Result<Vec<RaceEventResponse>> {
    let repo = RaceEventRepository::new(pool);
    let events = repo.list().await?;
    Ok(with_open_from(events))
}

/// Get a race event with its prediction window
pub async fn get_race_event(pool: &PgPool, race_event_id: Uuid) -> Result<RaceEventResponse> {
    let repo = RaceEventRepository::new(pool);
    let event = repo.find_by_id(race_event_id).await?;

    let open_from = match event.round {
        1 => None,
        round => repo
            .find_by_round(event.year, round - 1)
            .await?
            .and_then(|previous| predictions_open_from(previous.race_start)),
    };

    Ok(RaceEventResponse::new(event, open_from))
}

/// Create a new race event
pub async fn create_race_event(
    pool: &PgPool,
    request: &CreateRaceEventRequest,
) -> Result<RaceEvent> {
    let repo = RaceEventRepository::new(pool);
    let event = repo.create(request).await?;
    tracing::info!(
        "Created race event {} {} round {}",
        event.race_event_id,
        event.year,
        event.round
    );
    Ok(event)
}

/// Update a race event
pub async fn update_race_event(
    pool: &PgPool,
    existing: &RaceEvent,
    request: &UpdateRaceEventRequest,
) -> Result<RaceEvent> {
    let repo = RaceEventRepository::new(pool);
    repo.update(existing, request).await
}

pub async fn find_race_event(pool: &PgPool, race_event_id: Uuid) -> Result<RaceEvent> {
    let repo = RaceEventRepository::new(pool);
    repo.find_by_id(race_event_id).await
}
