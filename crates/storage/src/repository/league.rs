use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::league::{AdministeredLeague, LeaguePreview, LeagueSummary};
use crate::error::{Result, StorageError};
use crate::models::{League, LeagueMember};

use super::scoring_rules;

const LEAGUE_COLUMNS: &str = "league_id, name, admin_id, invite_code, created_at";

/// Repository for League and membership database operations
pub struct LeagueRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeagueRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a league with its admin as first member and a baseline ruleset
    pub async fn create(&self, name: &str, admin_id: Uuid) -> Result<League> {
        let mut tx = self.pool.begin().await?;

        let league = sqlx::query_as::<_, League>(&format!(
            r#"
            INSERT INTO leagues (name, admin_id, invite_code)
            VALUES ($1, $2, $3)
            RETURNING {LEAGUE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(admin_id)
        .bind(Uuid::new_v4())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO league_members (league_id, user_id) VALUES ($1, $2)")
            .bind(league.league_id)
            .bind(admin_id)
            .execute(&mut *tx)
            .await?;

        scoring_rules::insert_defaults(&mut tx, league.league_id).await?;

        tx.commit().await?;

        Ok(league)
    }

    pub async fn find_by_id(&self, league_id: Uuid) -> Result<League> {
        sqlx::query_as::<_, League>(&format!(
            "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE league_id = $1"
        ))
        .bind(league_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_invite_code(&self, invite_code: Uuid) -> Result<League> {
        sqlx::query_as::<_, League>(&format!(
            "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE invite_code = $1"
        ))
        .bind(invite_code)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Leagues the user belongs to, with member counts
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<LeagueSummary>> {
        let leagues = sqlx::query_as::<_, LeagueSummary>(
            r#"
            SELECT
                l.league_id,
                l.name,
                l.admin_id,
                a.username AS admin_username,
                (SELECT COUNT(*) FROM league_members c WHERE c.league_id = l.league_id) AS member_count,
                m.joined_at
            FROM league_members m
            INNER JOIN leagues l ON l.league_id = m.league_id
            INNER JOIN users a ON a.user_id = l.admin_id
            WHERE m.user_id = $1
            ORDER BY m.joined_at
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(leagues)
    }

    /// Leagues administered by the user, with member counts
    pub async fn list_administered(&self, admin_id: Uuid) -> Result<Vec<AdministeredLeague>> {
        let leagues = sqlx::query_as::<_, AdministeredLeague>(
            r#"
            SELECT
                l.league_id,
                l.name,
                l.invite_code,
                (SELECT COUNT(*) FROM league_members c WHERE c.league_id = l.league_id) AS member_count,
                l.created_at
            FROM leagues l
            WHERE l.admin_id = $1
            ORDER BY l.created_at, l.name
            "#,
        )
        .bind(admin_id)
        .fetch_all(self.pool)
        .await?;

        Ok(leagues)
    }

    pub async fn list_members(&self, league_id: Uuid) -> Result<Vec<LeagueMember>> {
        let members = sqlx::query_as::<_, LeagueMember>(
            r#"
            SELECT m.user_id, u.username, m.joined_at
            FROM league_members m
            INNER JOIN users u ON u.user_id = m.user_id
            WHERE m.league_id = $1
            ORDER BY m.joined_at, u.username
            "#,
        )
        .bind(league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(members)
    }

    pub async fn preview_by_invite_code(&self, invite_code: Uuid) -> Result<LeaguePreview> {
        sqlx::query_as::<_, LeaguePreview>(
            r#"
            SELECT
                l.league_id,
                l.name,
                a.username AS admin_username,
                (SELECT COUNT(*) FROM league_members c WHERE c.league_id = l.league_id) AS member_count
            FROM leagues l
            INNER JOIN users a ON a.user_id = l.admin_id
            WHERE l.invite_code = $1
            "#,
        )
        .bind(invite_code)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn is_member(&self, league_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM league_members WHERE league_id = $1 AND user_id = $2)",
        )
        .bind(league_id)
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn add_member(&self, league_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("INSERT INTO league_members (league_id, user_id) VALUES ($1, $2)")
            .bind(league_id)
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e).on_unique_violation("Already a member of this league")
            })?;

        Ok(())
    }

    pub async fn refresh_invite_code(&self, league_id: Uuid) -> Result<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "UPDATE leagues SET invite_code = $2 WHERE league_id = $1 RETURNING invite_code",
        )
        .bind(league_id)
        .bind(Uuid::new_v4())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }
}

/// Ids of every league, read inside a scoring transaction
pub async fn list_ids(conn: &mut PgConnection) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>("SELECT league_id FROM leagues ORDER BY league_id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(ids)
}

/// (league_id, user_id) membership pairs, read inside a scoring transaction
pub async fn list_memberships(conn: &mut PgConnection) -> Result<Vec<(Uuid, Uuid)>> {
    let members = sqlx::query_as::<_, (Uuid, Uuid)>(
        "SELECT league_id, user_id FROM league_members ORDER BY league_id, user_id",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(members)
}
