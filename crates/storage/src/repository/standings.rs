use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use crate::error::Result;

/// Season totals of one league member, before ranking
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MemberTotalRow {
    pub user_id: Uuid,
    pub username: String,
    pub total_points: i64,
    pub events_scored: i64,
}

/// One stored score of a league member for a single event
#[derive(Debug, Clone, FromRow)]
pub struct EventScoreRow {
    pub user_id: Uuid,
    pub username: String,
    pub points: i32,
    pub breakdown: Json<serde_json::Value>,
}

pub struct StandingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StandingsRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Totals for every current member, zero for members without records.
    pub async fn league_totals(&self, league_id: Uuid) -> Result<Vec<MemberTotalRow>> {
        let rows = sqlx::query_as::<_, MemberTotalRow>(
            r#"
            SELECT
                m.user_id,
                u.username,
                COALESCE(SUM(s.points), 0)::BIGINT AS total_points,
                COUNT(s.score_id) AS events_scored
            FROM league_members m
            INNER JOIN users u ON u.user_id = m.user_id
            LEFT JOIN scores s ON s.league_id = m.league_id AND s.user_id = m.user_id
            WHERE m.league_id = $1
            GROUP BY m.user_id, u.username
            "#,
        )
        .bind(league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn event_scores(
        &self,
        league_id: Uuid,
        race_event_id: Uuid,
    ) -> Result<Vec<EventScoreRow>> {
        let rows = sqlx::query_as::<_, EventScoreRow>(
            r#"
            SELECT s.user_id, u.username, s.points, s.breakdown
            FROM scores s
            INNER JOIN users u ON u.user_id = s.user_id
            WHERE s.league_id = $1 AND s.race_event_id = $2
            "#,
        )
        .bind(league_id)
        .bind(race_event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
