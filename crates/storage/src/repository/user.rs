use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::User;

/// Repository for the local copy of externally provisioned accounts
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record the account behind a verified token, refreshing its username and
    /// role.
    pub async fn upsert(&self, user_id: Uuid, username: &str, role: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, username, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET username = EXCLUDED.username, role = EXCLUDED.role
            RETURNING user_id, username, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation("Username already taken"))?;

        Ok(user)
    }
}
