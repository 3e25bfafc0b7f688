use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ScoreKey;

/// One row of a league's season standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeagueStandingEntry {
    pub position: i64,
    pub user_id: Uuid,
    pub username: String,
    pub total_points: i64,
    pub events_scored: i64,
}

/// One row of a league's standings for a single race event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventStandingEntry {
    pub position: i64,
    pub user_id: Uuid,
    pub username: String,
    pub points: i32,
    #[schema(value_type = std::collections::HashMap<String, i32>)]
    pub breakdown: BTreeMap<ScoreKey, i32>,
}
