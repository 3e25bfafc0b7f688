use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A group of players scored with a shared ruleset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct League {
    pub league_id: Uuid,
    pub name: String,
    pub admin_id: Uuid,
    pub invite_code: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A member of a league, joined with their username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeagueMember {
    pub user_id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}
