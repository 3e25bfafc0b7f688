use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A predictable fact about a race weekend.
///
/// Categories are the shared vocabulary of predictions and results. They are
/// stored as their token (`P1`, `FASTEST_LAP`, ...) and compared
/// case-sensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum OutcomeCategory {
    #[serde(rename = "P1")]
    P1,
    #[serde(rename = "P2")]
    P2,
    #[serde(rename = "P3")]
    P3,
    #[serde(rename = "POLE")]
    Pole,
    #[serde(rename = "FASTEST_LAP")]
    FastestLap,
    #[serde(rename = "SAFETY_CAR")]
    SafetyCar,
    #[serde(rename = "FIRST_RETIREMENT")]
    FirstRetirement,
    #[serde(rename = "CONSTRUCTOR_WINNER")]
    ConstructorWinner,
    #[serde(rename = "FASTEST_PIT_STOP")]
    FastestPitStop,
    #[serde(rename = "SPRINT_POLE")]
    SprintPole,
    #[serde(rename = "SPRINT_P1")]
    SprintP1,
    #[serde(rename = "SPRINT_P2")]
    SprintP2,
    #[serde(rename = "SPRINT_P3")]
    SprintP3,
}

impl OutcomeCategory {
    pub const ALL: [OutcomeCategory; 13] = [
        Self::P1,
        Self::P2,
        Self::P3,
        Self::Pole,
        Self::FastestLap,
        Self::SafetyCar,
        Self::FirstRetirement,
        Self::ConstructorWinner,
        Self::FastestPitStop,
        Self::SprintPole,
        Self::SprintP1,
        Self::SprintP2,
        Self::SprintP3,
    ];

    pub const PODIUM: [OutcomeCategory; 3] = [Self::P1, Self::P2, Self::P3];

    pub const SPRINT_PODIUM: [OutcomeCategory; 3] = [Self::SprintP1, Self::SprintP2, Self::SprintP3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::Pole => "POLE",
            Self::FastestLap => "FASTEST_LAP",
            Self::SafetyCar => "SAFETY_CAR",
            Self::FirstRetirement => "FIRST_RETIREMENT",
            Self::ConstructorWinner => "CONSTRUCTOR_WINNER",
            Self::FastestPitStop => "FASTEST_PIT_STOP",
            Self::SprintPole => "SPRINT_POLE",
            Self::SprintP1 => "SPRINT_P1",
            Self::SprintP2 => "SPRINT_P2",
            Self::SprintP3 => "SPRINT_P3",
        }
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown outcome category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for OutcomeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for OutcomeCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Key of a score breakdown or point table: every category plus the two
/// podium bonus pseudo-categories, which are only ever derived.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum ScoreKey {
    #[serde(rename = "P1")]
    P1,
    #[serde(rename = "P2")]
    P2,
    #[serde(rename = "P3")]
    P3,
    #[serde(rename = "PODIO_BONUS")]
    PodioBonus,
    #[serde(rename = "POLE")]
    Pole,
    #[serde(rename = "FASTEST_LAP")]
    FastestLap,
    #[serde(rename = "SAFETY_CAR")]
    SafetyCar,
    #[serde(rename = "FIRST_RETIREMENT")]
    FirstRetirement,
    #[serde(rename = "CONSTRUCTOR_WINNER")]
    ConstructorWinner,
    #[serde(rename = "FASTEST_PIT_STOP")]
    FastestPitStop,
    #[serde(rename = "SPRINT_POLE")]
    SprintPole,
    #[serde(rename = "SPRINT_P1")]
    SprintP1,
    #[serde(rename = "SPRINT_P2")]
    SprintP2,
    #[serde(rename = "SPRINT_P3")]
    SprintP3,
    #[serde(rename = "SPRINT_PODIO_BONUS")]
    SprintPodioBonus,
}

impl ScoreKey {
    pub const ALL: [ScoreKey; 15] = [
        Self::P1,
        Self::P2,
        Self::P3,
        Self::PodioBonus,
        Self::Pole,
        Self::FastestLap,
        Self::SafetyCar,
        Self::FirstRetirement,
        Self::ConstructorWinner,
        Self::FastestPitStop,
        Self::SprintPole,
        Self::SprintP1,
        Self::SprintP2,
        Self::SprintP3,
        Self::SprintPodioBonus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PodioBonus => "PODIO_BONUS",
            Self::SprintPodioBonus => "SPRINT_PODIO_BONUS",
            other => other
                .category()
                .map(|category| category.as_str())
                .unwrap_or_default(),
        }
    }

    /// The category this key scores, or `None` for the bonus keys.
    pub fn category(&self) -> Option<OutcomeCategory> {
        let category = match self {
            Self::P1 => OutcomeCategory::P1,
            Self::P2 => OutcomeCategory::P2,
            Self::P3 => OutcomeCategory::P3,
            Self::Pole => OutcomeCategory::Pole,
            Self::FastestLap => OutcomeCategory::FastestLap,
            Self::SafetyCar => OutcomeCategory::SafetyCar,
            Self::FirstRetirement => OutcomeCategory::FirstRetirement,
            Self::ConstructorWinner => OutcomeCategory::ConstructorWinner,
            Self::FastestPitStop => OutcomeCategory::FastestPitStop,
            Self::SprintPole => OutcomeCategory::SprintPole,
            Self::SprintP1 => OutcomeCategory::SprintP1,
            Self::SprintP2 => OutcomeCategory::SprintP2,
            Self::SprintP3 => OutcomeCategory::SprintP3,
            Self::PodioBonus | Self::SprintPodioBonus => return None,
        };
        Some(category)
    }
}

impl From<OutcomeCategory> for ScoreKey {
    fn from(category: OutcomeCategory) -> Self {
        match category {
            OutcomeCategory::P1 => Self::P1,
            OutcomeCategory::P2 => Self::P2,
            OutcomeCategory::P3 => Self::P3,
            OutcomeCategory::Pole => Self::Pole,
            OutcomeCategory::FastestLap => Self::FastestLap,
            OutcomeCategory::SafetyCar => Self::SafetyCar,
            OutcomeCategory::FirstRetirement => Self::FirstRetirement,
            OutcomeCategory::ConstructorWinner => Self::ConstructorWinner,
            OutcomeCategory::FastestPitStop => Self::FastestPitStop,
            OutcomeCategory::SprintPole => Self::SprintPole,
            OutcomeCategory::SprintP1 => Self::SprintP1,
            OutcomeCategory::SprintP2 => Self::SprintP2,
            OutcomeCategory::SprintP3 => Self::SprintP3,
        }
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreKey {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
