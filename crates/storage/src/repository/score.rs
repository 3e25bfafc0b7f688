use sqlx::{PgConnection, types::Json};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ScoreBreakdown, ScoreRecord};

const SCORE_COLUMNS: &str =
    "score_id, user_id, race_event_id, league_id, points, breakdown, calculated_at";

/// Replace the (user, event, league) record with freshly computed points.
pub async fn upsert(
    conn: &mut PgConnection,
    user_id: Uuid,
    race_event_id: Uuid,
    league_id: Uuid,
    breakdown: &ScoreBreakdown,
) -> Result<ScoreRecord> {
    let score = sqlx::query_as::<_, ScoreRecord>(&format!(
        r#"
        INSERT INTO scores (user_id, race_event_id, league_id, points, breakdown)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, race_event_id, league_id)
        DO UPDATE SET
            points = EXCLUDED.points,
            breakdown = EXCLUDED.breakdown,
            calculated_at = CURRENT_TIMESTAMP
        RETURNING {SCORE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(race_event_id)
    .bind(league_id)
    .bind(breakdown.total())
    .bind(Json(breakdown))
    .fetch_one(&mut *conn)
    .await?;

    Ok(score)
}

/// Delete records of this event whose user is no longer a member of the
/// record's league.
pub async fn delete_stale(conn: &mut PgConnection, race_event_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM scores s
        WHERE s.race_event_id = $1
          AND NOT EXISTS (
              SELECT 1
              FROM league_members m
              WHERE m.league_id = s.league_id AND m.user_id = s.user_id
          )
        "#,
    )
    .bind(race_event_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Maintenance only, run alongside the result reset.
pub async fn delete_all(conn: &mut PgConnection) -> Result<u64> {
    let result = sqlx::query("DELETE FROM scores")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
