use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::entry::CategoryValue;
use crate::error::Result;
use crate::models::{PredictionEntry, UserPrediction};

const PREDICTION_COLUMNS: &str =
    "prediction_id, user_id, race_event_id, category, value, updated_at";

/// Repository for PredictionEntry database operations
pub struct PredictionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PredictionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        race_event_id: Uuid,
    ) -> Result<Vec<PredictionEntry>> {
        let predictions = sqlx::query_as::<_, PredictionEntry>(&format!(
            r#"
            SELECT {PREDICTION_COLUMNS}
            FROM predictions
            WHERE user_id = $1 AND race_event_id = $2
            ORDER BY category
            "#
        ))
        .bind(user_id)
        .bind(race_event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(predictions)
    }

    /// Every user's predictions for an event, with usernames
    pub async fn list_for_event_with_users(
        &self,
        race_event_id: Uuid,
    ) -> Result<Vec<UserPrediction>> {
        let predictions = sqlx::query_as::<_, UserPrediction>(
            r#"
            SELECT p.user_id, u.username, p.category, p.value, p.updated_at
            FROM predictions p
            INNER JOIN users u ON u.user_id = p.user_id
            WHERE p.race_event_id = $1
            ORDER BY u.username, p.category
            "#,
        )
        .bind(race_event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(predictions)
    }

    /// Insert or overwrite the given predictions in one transaction
    pub async fn save_many(
        &self,
        user_id: Uuid,
        race_event_id: Uuid,
        entries: &[CategoryValue],
    ) -> Result<Vec<PredictionEntry>> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(entries.len());

        for entry in entries {
            let prediction = sqlx::query_as::<_, PredictionEntry>(&format!(
                r#"
                INSERT INTO predictions (user_id, race_event_id, category, value)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, race_event_id, category)
                DO UPDATE SET
                    value = EXCLUDED.value,
                    updated_at = CURRENT_TIMESTAMP
                RETURNING {PREDICTION_COLUMNS}
                "#
            ))
            .bind(user_id)
            .bind(race_event_id)
            .bind(entry.category.as_str())
            .bind(&entry.value)
            .fetch_one(&mut *tx)
            .await?;

            saved.push(prediction);
        }

        tx.commit().await?;

        Ok(saved)
    }
}

/// All predictions for an event, read inside a scoring transaction
pub async fn list_for_event(
    conn: &mut PgConnection,
    race_event_id: Uuid,
) -> Result<Vec<PredictionEntry>> {
    let predictions = sqlx::query_as::<_, PredictionEntry>(&format!(
        "SELECT {PREDICTION_COLUMNS} FROM predictions WHERE race_event_id = $1"
    ))
    .bind(race_event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(predictions)
}
