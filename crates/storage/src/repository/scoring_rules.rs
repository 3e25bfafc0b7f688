use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{PointTable, ScoringRuleSet};

const RULE_COLUMNS: &str = r#"
    league_id, uses_defaults,
    points_p1, points_p2, points_p3, points_podio_bonus,
    points_pole, points_fastest_lap, points_safety_car, points_first_retirement,
    points_constructor_winner, points_fastest_pit_stop,
    points_sprint_pole, points_sprint_p1, points_sprint_p2, points_sprint_p3,
    points_sprint_podio_bonus, updated_at
"#;

/// Repository for per-league ScoringRuleSet rows
pub struct ScoringRulesRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoringRulesRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_for_league(&self, league_id: Uuid) -> Result<Option<ScoringRuleSet>> {
        let rules = sqlx::query_as::<_, ScoringRuleSet>(&format!(
            "SELECT {RULE_COLUMNS} FROM scoring_rules WHERE league_id = $1"
        ))
        .bind(league_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(rules)
    }

    pub async fn find_for_leagues(&self, league_ids: &[Uuid]) -> Result<Vec<ScoringRuleSet>> {
        let rules = sqlx::query_as::<_, ScoringRuleSet>(&format!(
            "SELECT {RULE_COLUMNS} FROM scoring_rules WHERE league_id = ANY($1)"
        ))
        .bind(league_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rules)
    }

    /// Store an explicit override table; it applies wholesale from now on.
    pub async fn save_overrides(
        &self,
        league_id: Uuid,
        table: &PointTable,
    ) -> Result<ScoringRuleSet> {
        let rules = sqlx::query_as::<_, ScoringRuleSet>(&format!(
            r#"
            INSERT INTO scoring_rules (
                league_id, uses_defaults,
                points_p1, points_p2, points_p3, points_podio_bonus,
                points_pole, points_fastest_lap, points_safety_car, points_first_retirement,
                points_constructor_winner, points_fastest_pit_stop,
                points_sprint_pole, points_sprint_p1, points_sprint_p2, points_sprint_p3,
                points_sprint_podio_bonus
            )
            VALUES ($1, FALSE, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (league_id)
            DO UPDATE SET
                uses_defaults = FALSE,
                points_p1 = EXCLUDED.points_p1,
                points_p2 = EXCLUDED.points_p2,
                points_p3 = EXCLUDED.points_p3,
                points_podio_bonus = EXCLUDED.points_podio_bonus,
                points_pole = EXCLUDED.points_pole,
                points_fastest_lap = EXCLUDED.points_fastest_lap,
                points_safety_car = EXCLUDED.points_safety_car,
                points_first_retirement = EXCLUDED.points_first_retirement,
                points_constructor_winner = EXCLUDED.points_constructor_winner,
                points_fastest_pit_stop = EXCLUDED.points_fastest_pit_stop,
                points_sprint_pole = EXCLUDED.points_sprint_pole,
                points_sprint_p1 = EXCLUDED.points_sprint_p1,
                points_sprint_p2 = EXCLUDED.points_sprint_p2,
                points_sprint_p3 = EXCLUDED.points_sprint_p3,
                points_sprint_podio_bonus = EXCLUDED.points_sprint_podio_bonus,
                updated_at = CURRENT_TIMESTAMP
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(league_id)
        .bind(table.p1)
        .bind(table.p2)
        .bind(table.p3)
        .bind(table.podio_bonus)
        .bind(table.pole)
        .bind(table.fastest_lap)
        .bind(table.safety_car)
        .bind(table.first_retirement)
        .bind(table.constructor_winner)
        .bind(table.fastest_pit_stop)
        .bind(table.sprint_pole)
        .bind(table.sprint_p1)
        .bind(table.sprint_p2)
        .bind(table.sprint_p3)
        .bind(table.sprint_podio_bonus)
        .fetch_one(self.pool)
        .await?;

        Ok(rules)
    }

    /// Switch the league back to the baseline table
    pub async fn reset_to_defaults(&self, league_id: Uuid) -> Result<ScoringRuleSet> {
        let mut conn = self.pool.acquire().await?;
        insert_defaults(&mut conn, league_id).await
    }
}

/// Insert a baseline ruleset for a league, or flip an existing one back to it.
pub async fn insert_defaults(conn: &mut PgConnection, league_id: Uuid) -> Result<ScoringRuleSet> {
    let rules = sqlx::query_as::<_, ScoringRuleSet>(&format!(
        r#"
        INSERT INTO scoring_rules (league_id, uses_defaults)
        VALUES ($1, TRUE)
        ON CONFLICT (league_id)
        DO UPDATE SET uses_defaults = TRUE, updated_at = CURRENT_TIMESTAMP
        RETURNING {RULE_COLUMNS}
        "#
    ))
    .bind(league_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(rules)
}

/// Every stored ruleset, read inside a scoring transaction
pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<ScoringRuleSet>> {
    let rules = sqlx::query_as::<_, ScoringRuleSet>(&format!(
        "SELECT {RULE_COLUMNS} FROM scoring_rules"
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rules)
}
