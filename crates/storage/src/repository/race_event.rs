use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::race_event::{CreateRaceEventRequest, UpdateRaceEventRequest};
use crate::error::{Result, StorageError};
use crate::models::RaceEvent;

const RACE_EVENT_COLUMNS: &str = r#"
    race_event_id, year, round, name, country, circuit,
    qualifying_start, race_start, has_sprint, is_result_entered, created_at
"#;

/// Calendar entry written by the seeder, keyed by (year, round).
#[derive(Debug, Clone)]
pub struct ScheduledRound<'a> {
    pub year: i32,
    pub round: i32,
    pub name: &'a str,
    pub country: &'a str,
    pub circuit: &'a str,
    pub qualifying_start: DateTime<Utc>,
    pub race_start: DateTime<Utc>,
    pub has_sprint: bool,
}

/// Repository for RaceEvent database operations
pub struct RaceEventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RaceEventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all race events, newest season first
    pub async fn list(&self) -> Result<Vec<RaceEvent>> {
        let events = sqlx::query_as::<_, RaceEvent>(&format!(
            "SELECT {RACE_EVENT_COLUMNS} FROM race_events ORDER BY year DESC, round ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, race_event_id: Uuid) -> Result<RaceEvent> {
        sqlx::query_as::<_, RaceEvent>(&format!(
            "SELECT {RACE_EVENT_COLUMNS} FROM race_events WHERE race_event_id = $1"
        ))
        .bind(race_event_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_round(&self, year: i32, round: i32) -> Result<Option<RaceEvent>> {
        let event = sqlx::query_as::<_, RaceEvent>(&format!(
            "SELECT {RACE_EVENT_COLUMNS} FROM race_events WHERE year = $1 AND round = $2"
        ))
        .bind(year)
        .bind(round)
        .fetch_optional(self.pool)
        .await?;

        Ok(event)
    }

    pub async fn create(&self, req: &CreateRaceEventRequest) -> Result<RaceEvent> {
        sqlx::query_as::<_, RaceEvent>(&format!(
            r#"
            INSERT INTO race_events (
                year, round, name, country, circuit, qualifying_start, race_start, has_sprint
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RACE_EVENT_COLUMNS}
            "#
        ))
        .bind(req.year)
        .bind(req.round)
        .bind(&req.name)
        .bind(&req.country)
        .bind(&req.circuit)
        .bind(req.qualifying_start)
        .bind(req.race_start)
        .bind(req.has_sprint)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e).on_unique_violation("A race event already exists for this round")
        })
    }

    pub async fn update(
        &self,
        existing: &RaceEvent,
        req: &UpdateRaceEventRequest,
    ) -> Result<RaceEvent> {
        let name = req.name.as_ref().unwrap_or(&existing.name);
        let country = req.country.as_ref().unwrap_or(&existing.country);
        let circuit = req.circuit.as_ref().unwrap_or(&existing.circuit);
        let qualifying_start = req.qualifying_start.unwrap_or(existing.qualifying_start);
        let race_start = req.race_start.unwrap_or(existing.race_start);
        let has_sprint = req.has_sprint.unwrap_or(existing.has_sprint);

        sqlx::query_as::<_, RaceEvent>(&format!(
            r#"
            UPDATE race_events
            SET name = $2,
                country = $3,
                circuit = $4,
                qualifying_start = $5,
                race_start = $6,
                has_sprint = $7
            WHERE race_event_id = $1
            RETURNING {RACE_EVENT_COLUMNS}
            "#
        ))
        .bind(existing.race_event_id)
        .bind(name)
        .bind(country)
        .bind(circuit)
        .bind(qualifying_start)
        .bind(race_start)
        .bind(has_sprint)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Insert or refresh a calendar round. Existing rounds keep their id and
    /// result flag.
    pub async fn upsert_round(&self, round: &ScheduledRound<'_>) -> Result<RaceEvent> {
        let event = sqlx::query_as::<_, RaceEvent>(&format!(
            r#"
            INSERT INTO race_events (
                year, round, name, country, circuit, qualifying_start, race_start, has_sprint
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (year, round)
            DO UPDATE SET
                name = EXCLUDED.name,
                country = EXCLUDED.country,
                circuit = EXCLUDED.circuit,
                qualifying_start = EXCLUDED.qualifying_start,
                race_start = EXCLUDED.race_start,
                has_sprint = EXCLUDED.has_sprint
            RETURNING {RACE_EVENT_COLUMNS}
            "#
        ))
        .bind(round.year)
        .bind(round.round)
        .bind(round.name)
        .bind(round.country)
        .bind(round.circuit)
        .bind(round.qualifying_start)
        .bind(round.race_start)
        .bind(round.has_sprint)
        .fetch_one(self.pool)
        .await?;

        Ok(event)
    }
}

/// Lock the event row for the rest of the transaction.
pub async fn lock_for_update(conn: &mut PgConnection, race_event_id: Uuid) -> Result<RaceEvent> {
    sqlx::query_as::<_, RaceEvent>(&format!(
        "SELECT {RACE_EVENT_COLUMNS} FROM race_events WHERE race_event_id = $1 FOR UPDATE"
    ))
    .bind(race_event_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(StorageError::NotFound)
}

pub async fn mark_results_entered(conn: &mut PgConnection, race_event_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE race_events SET is_result_entered = TRUE WHERE race_event_id = $1")
        .bind(race_event_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Clears every result flag. Maintenance only: the API never un-enters results.
pub async fn clear_result_flags(conn: &mut PgConnection) -> Result<u64> {
    let result =
        sqlx::query("UPDATE race_events SET is_result_entered = FALSE WHERE is_result_entered")
            .execute(&mut *conn)
            .await?;

    Ok(result.rows_affected())
}
