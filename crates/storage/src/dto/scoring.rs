use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{PointTable, ScoreKey, ScoringRuleSet, resolve_rules};

pub const MAX_POINTS_PER_KEY: i32 = 100;

/// Effective ruleset of a league
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoringRulesResponse {
    pub league_id: Uuid,
    pub uses_defaults: bool,
    #[schema(value_type = std::collections::HashMap<String, i32>)]
    pub points: BTreeMap<ScoreKey, i32>,
}

impl ScoringRulesResponse {
    pub fn new(league_id: Uuid, uses_defaults: bool, table: &PointTable) -> Self {
        Self {
            league_id,
            uses_defaults,
            points: table.entries(),
        }
    }

    /// Response for a league that may have no stored ruleset yet.
    pub fn from_rules(league_id: Uuid, rules: Option<&ScoringRuleSet>) -> Self {
        let uses_defaults = rules.is_none_or(|rules| rules.uses_defaults);
        Self::new(league_id, uses_defaults, &resolve_rules(rules))
    }
}

/// Request payload for customizing a league's ruleset.
///
/// Keys left out keep their currently effective value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateScoringRulesRequest {
    #[validate(custom(function = "validate_point_values"))]
    #[schema(value_type = std::collections::HashMap<String, i32>)]
    pub points: BTreeMap<ScoreKey, i32>,
}

fn validate_point_values(points: &BTreeMap<ScoreKey, i32>) -> Result<(), ValidationError> {
    if points
        .values()
        .all(|value| (0..=MAX_POINTS_PER_KEY).contains(value))
    {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_points")
            .with_message("Point values must be between 0 and 100".into()))
    }
}

/// Outcome of one score recomputation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecomputeSummary {
    pub race_event_id: Uuid,
    /// True when the event had no results and nothing was computed.
    pub skipped: bool,
    pub leagues: usize,
    pub records_written: usize,
    pub records_removed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::rule_set;

    #[test]
    fn test_partial_update_parses() {
        let json = r#"{ "points": { "P1": 12, "SPRINT_PODIO_BONUS": 4 } }"#;
        let req: UpdateScoringRulesRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.points.get(&ScoreKey::P1), Some(&12));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_negative_points_rejected() {
        let req = UpdateScoringRulesRequest {
            points: BTreeMap::from([(ScoreKey::Pole, -1)]),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unknown_key_rejected_at_parse_time() {
        let json = r#"{ "points": { "DRIVER_OF_THE_DAY": 2 } }"#;
        assert!(serde_json::from_str::<UpdateScoringRulesRequest>(json).is_err());
    }

    #[test]
    fn test_missing_ruleset_reports_defaults() {
        let response = ScoringRulesResponse::from_rules(Uuid::nil(), None);
        assert!(response.uses_defaults);
        assert_eq!(response.points.get(&ScoreKey::P1), Some(&10));
    }

    #[test]
    fn test_override_ruleset_reports_stored_values() {
        let table = PointTable {
            p1: 25,
            ..PointTable::default()
        };
        let rules = rule_set(Uuid::nil(), false, table);

        let response = ScoringRulesResponse::from_rules(Uuid::nil(), Some(&rules));
        assert!(!response.uses_defaults);
        assert_eq!(response.points.get(&ScoreKey::P1), Some(&25));
    }

    #[test]
    fn test_sentinel_hides_stale_columns() {
        let table = PointTable {
            p1: 25,
            ..PointTable::default()
        };
        let rules = rule_set(Uuid::nil(), true, table);

        let response = ScoringRulesResponse::from_rules(Uuid::nil(), Some(&rules));
        assert!(response.uses_defaults);
        assert_eq!(response.points.get(&ScoreKey::P1), Some(&10));
    }

    #[test]
    fn test_response_lists_every_key() {
        let response = ScoringRulesResponse::new(Uuid::nil(), true, &PointTable::default());
        assert_eq!(response.points.len(), ScoreKey::ALL.len());
    }
}
