use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{OutcomeCategory, PredictionEntry, ResultEntry};

/// One category/value pair as submitted for a prediction or a result.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryValue {
    pub category: OutcomeCategory,

    #[validate(length(
        min = 1,
        max = 64,
        message = "Value must be between 1 and 64 characters"
    ))]
    pub value: String,
}

/// Request payload for saving a user's predictions for a race event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitPredictionsRequest {
    #[validate(nested, custom(function = "validate_unique_categories"))]
    pub predictions: Vec<CategoryValue>,
}

/// Request payload for entering the official results of a race event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EnterResultsRequest {
    #[validate(
        length(min = 1, message = "At least one result is required"),
        nested,
        custom(function = "validate_unique_categories")
    )]
    pub results: Vec<CategoryValue>,
}

fn validate_unique_categories(entries: &[CategoryValue]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if entries.iter().all(|entry| seen.insert(entry.category)) {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_category")
            .with_message("Each category may appear only once".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    pub race_event_id: Uuid,
    pub category: OutcomeCategory,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl From<PredictionEntry> for PredictionResponse {
    fn from(entry: PredictionEntry) -> Self {
        Self {
            race_event_id: entry.race_event_id,
            category: entry.category,
            value: entry.value,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultResponse {
    pub race_event_id: Uuid,
    pub category: OutcomeCategory,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl From<ResultEntry> for ResultResponse {
    fn from(entry: ResultEntry) -> Self {
        Self {
            race_event_id: entry.race_event_id,
            category: entry.category,
            value: entry.value,
            updated_at: entry.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: OutcomeCategory, value: &str) -> CategoryValue {
        CategoryValue {
            category,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_predictions_may_be_empty() {
        let req = SubmitPredictionsRequest {
            predictions: vec![],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_results_must_not_be_empty() {
        let req = EnterResultsRequest { results: vec![] };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_duplicate_categories_are_rejected() {
        let req = EnterResultsRequest {
            results: vec![
                entry(OutcomeCategory::P1, "VER"),
                entry(OutcomeCategory::P1, "NOR"),
            ],
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("results"));
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let req = SubmitPredictionsRequest {
            predictions: vec![entry(OutcomeCategory::Pole, "")],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_bonus_keys_cannot_be_submitted() {
        let json = r#"{ "predictions": [{ "category": "PODIO_BONUS", "value": "SI" }] }"#;
        assert!(serde_json::from_str::<SubmitPredictionsRequest>(json).is_err());
    }

    #[test]
    fn test_parses_wire_format() {
        let json = r#"{ "results": [
            { "category": "P1", "value": "VER" },
            { "category": "SAFETY_CAR", "value": "SI" }
        ] }"#;
        let req: EnterResultsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.results.len(), 2);
        assert_eq!(req.results[1].category, OutcomeCategory::SafetyCar);
        assert!(req.validate().is_ok());
    }
}
