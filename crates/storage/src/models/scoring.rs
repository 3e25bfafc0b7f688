use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ScoreKey;

/// Point value for every score key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PointTable {
    pub p1: i32,
    pub p2: i32,
    pub p3: i32,
    pub podio_bonus: i32,
    pub pole: i32,
    pub fastest_lap: i32,
    pub safety_car: i32,
    pub first_retirement: i32,
    pub constructor_winner: i32,
    pub fastest_pit_stop: i32,
    pub sprint_pole: i32,
    pub sprint_p1: i32,
    pub sprint_p2: i32,
    pub sprint_p3: i32,
    pub sprint_podio_bonus: i32,
}

impl Default for PointTable {
    /// Baseline table used by leagues that never customized their ruleset.
    fn default() -> Self {
        Self {
            p1: 10,
            p2: 7,
            p3: 5,
            podio_bonus: 5,
            pole: 5,
            fastest_lap: 5,
            safety_car: 3,
            first_retirement: 8,
            constructor_winner: 4,
            fastest_pit_stop: 4,
            sprint_pole: 3,
            sprint_p1: 7,
            sprint_p2: 5,
            sprint_p3: 3,
            sprint_podio_bonus: 3,
        }
    }
}

impl PointTable {
    pub fn points_for(&self, key: ScoreKey) -> i32 {
        *self.slot(key)
    }

    pub fn set(&mut self, key: ScoreKey, points: i32) {
        *self.slot_mut(key) = points;
    }

    /// Copy of this table with the given keys replaced.
    pub fn with_overrides(&self, overrides: &BTreeMap<ScoreKey, i32>) -> Self {
        let mut table = *self;
        for (key, points) in overrides {
            table.set(*key, *points);
        }
        table
    }

    pub fn entries(&self) -> BTreeMap<ScoreKey, i32> {
        ScoreKey::ALL
            .into_iter()
            .map(|key| (key, self.points_for(key)))
            .collect()
    }

    fn slot(&self, key: ScoreKey) -> &i32 {
        match key {
            ScoreKey::P1 => &self.p1,
            ScoreKey::P2 => &self.p2,
            ScoreKey::P3 => &self.p3,
            ScoreKey::PodioBonus => &self.podio_bonus,
            ScoreKey::Pole => &self.pole,
            ScoreKey::FastestLap => &self.fastest_lap,
            ScoreKey::SafetyCar => &self.safety_car,
            ScoreKey::FirstRetirement => &self.first_retirement,
            ScoreKey::ConstructorWinner => &self.constructor_winner,
            ScoreKey::FastestPitStop => &self.fastest_pit_stop,
            ScoreKey::SprintPole => &self.sprint_pole,
            ScoreKey::SprintP1 => &self.sprint_p1,
            ScoreKey::SprintP2 => &self.sprint_p2,
            ScoreKey::SprintP3 => &self.sprint_p3,
            ScoreKey::SprintPodioBonus => &self.sprint_podio_bonus,
        }
    }

    fn slot_mut(&mut self, key: ScoreKey) -> &mut i32 {
        match key {
            ScoreKey::P1 => &mut self.p1,
            ScoreKey::P2 => &mut self.p2,
            ScoreKey::P3 => &mut self.p3,
            ScoreKey::PodioBonus => &mut self.podio_bonus,
            ScoreKey::Pole => &mut self.pole,
            ScoreKey::FastestLap => &mut self.fastest_lap,
            ScoreKey::SafetyCar => &mut self.safety_car,
            ScoreKey::FirstRetirement => &mut self.first_retirement,
            ScoreKey::ConstructorWinner => &mut self.constructor_winner,
            ScoreKey::FastestPitStop => &mut self.fastest_pit_stop,
            ScoreKey::SprintPole => &mut self.sprint_pole,
            ScoreKey::SprintP1 => &mut self.sprint_p1,
            ScoreKey::SprintP2 => &mut self.sprint_p2,
            ScoreKey::SprintP3 => &mut self.sprint_p3,
            ScoreKey::SprintPodioBonus => &mut self.sprint_podio_bonus,
        }
    }
}

/// Stored per-league ruleset.
///
/// `uses_defaults` is the explicit sentinel: while it is set the stored
/// columns are ignored and the baseline table applies wholesale. Once a league
/// admin saves overrides the stored columns apply wholesale instead. Values are
/// never merged field by field at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScoringRuleSet {
    pub league_id: Uuid,
    pub uses_defaults: bool,
    pub points_p1: i32,
    pub points_p2: i32,
    pub points_p3: i32,
    pub points_podio_bonus: i32,
    pub points_pole: i32,
    pub points_fastest_lap: i32,
    pub points_safety_car: i32,
    pub points_first_retirement: i32,
    pub points_constructor_winner: i32,
    pub points_fastest_pit_stop: i32,
    pub points_sprint_pole: i32,
    pub points_sprint_p1: i32,
    pub points_sprint_p2: i32,
    pub points_sprint_p3: i32,
    pub points_sprint_podio_bonus: i32,
    pub updated_at: DateTime<Utc>,
}

impl ScoringRuleSet {
    /// The table actually used to score this league.
    pub fn resolve(&self) -> PointTable {
        if self.uses_defaults {
            PointTable::default()
        } else {
            self.stored_table()
        }
    }

    pub fn stored_table(&self) -> PointTable {
        PointTable {
            p1: self.points_p1,
            p2: self.points_p2,
            p3: self.points_p3,
            podio_bonus: self.points_podio_bonus,
            pole: self.points_pole,
            fastest_lap: self.points_fastest_lap,
            safety_car: self.points_safety_car,
            first_retirement: self.points_first_retirement,
            constructor_winner: self.points_constructor_winner,
            fastest_pit_stop: self.points_fastest_pit_stop,
            sprint_pole: self.points_sprint_pole,
            sprint_p1: self.points_sprint_p1,
            sprint_p2: self.points_sprint_p2,
            sprint_p3: self.points_sprint_p3,
            sprint_podio_bonus: self.points_sprint_podio_bonus,
        }
    }
}

/// Effective table for a league that may have no ruleset row at all.
pub fn resolve_rules(rules: Option<&ScoringRuleSet>) -> PointTable {
    rules.map(ScoringRuleSet::resolve).unwrap_or_default()
}
