use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ScoreKey;

/// Points a user earned for one race event in one league.
///
/// Derived data: rows are replaced wholesale whenever the event's results
/// change and are never edited by hand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScoreRecord {
    pub score_id: Uuid,
    pub user_id: Uuid,
    pub race_event_id: Uuid,
    pub league_id: Uuid,
    pub points: i32,
    #[schema(value_type = Object)]
    pub breakdown: Json<serde_json::Value>,
    pub calculated_at: DateTime<Utc>,
}

/// Per-key points a user actually earned. Keys that earned nothing are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBreakdown(BTreeMap<ScoreKey, i32>);

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ScoreKey, points: i32) {
        self.0.insert(key, points);
    }

    pub fn contains(&self, key: ScoreKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn total(&self) -> i32 {
        self.0.values().sum()
    }

    /// Decodes a stored breakdown.
    ///
    /// Accepts a JSON object, or a JSON string holding an encoded object as
    /// written by older rows. Unknown keys and non-integer values are skipped.
    pub fn decode(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => map
                .iter()
                .filter_map(|(key, points)| {
                    let Ok(key) = key.parse::<ScoreKey>() else {
                        tracing::warn!("Skipping unknown breakdown key '{}'", key);
                        return None;
                    };
                    let points = points.as_i64().and_then(|p| i32::try_from(p).ok())?;
                    Some((key, points))
                })
                .collect(),
            serde_json::Value::String(encoded) => match serde_json::from_str(encoded) {
                Ok(inner @ serde_json::Value::Object(_)) => Self::decode(&inner),
                _ => {
                    tracing::warn!("Discarding undecodable breakdown blob");
                    Self::default()
                }
            },
            serde_json::Value::Null => Self::default(),
            other => {
                tracing::warn!("Discarding breakdown of unexpected shape: {}", other);
                Self::default()
            }
        }
    }
}

impl FromIterator<(ScoreKey, i32)> for ScoreBreakdown {
    fn from_iter<I: IntoIterator<Item = (ScoreKey, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<ScoreBreakdown> for BTreeMap<ScoreKey, i32> {
    fn from(breakdown: ScoreBreakdown) -> Self {
        breakdown.0
    }
}
