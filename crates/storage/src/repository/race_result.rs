use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::entry::CategoryValue;
use crate::error::Result;
use crate::models::ResultEntry;

const RESULT_COLUMNS: &str = "result_id, race_event_id, category, value, updated_at";

/// Repository for ResultEntry database operations
pub struct ResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(&self, race_event_id: Uuid) -> Result<Vec<ResultEntry>> {
        let mut conn = self.pool.acquire().await?;
        list_for_event(&mut conn, race_event_id).await
    }
}

pub async fn list_for_event(
    conn: &mut PgConnection,
    race_event_id: Uuid,
) -> Result<Vec<ResultEntry>> {
    let results = sqlx::query_as::<_, ResultEntry>(&format!(
        "SELECT {RESULT_COLUMNS} FROM race_results WHERE race_event_id = $1 ORDER BY category"
    ))
    .bind(race_event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(results)
}

pub async fn upsert(
    conn: &mut PgConnection,
    race_event_id: Uuid,
    entry: &CategoryValue,
) -> Result<ResultEntry> {
    let result = sqlx::query_as::<_, ResultEntry>(&format!(
        r#"
        INSERT INTO race_results (race_event_id, category, value)
        VALUES ($1, $2, $3)
        ON CONFLICT (race_event_id, category)
        DO UPDATE SET
            value = EXCLUDED.value,
            updated_at = CURRENT_TIMESTAMP
        RETURNING {RESULT_COLUMNS}
        "#
    ))
    .bind(race_event_id)
    .bind(entry.category.as_str())
    .bind(&entry.value)
    .fetch_one(&mut *conn)
    .await?;

    Ok(result)
}

pub async fn delete_all(conn: &mut PgConnection) -> Result<u64> {
    let result = sqlx::query("DELETE FROM race_results")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
