use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::repository::race_event::ScheduledRound;
use tracing::warn;

use crate::{Result, SeederError};

const CALENDAR_2025: &str = include_str!("../data/calendar_2025.json");
const CALENDAR_2026: &str = include_str!("../data/calendar_2026.json");

/// A season calendar as stored in the bundled JSON files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarFile {
    pub year: i32,
    #[serde(default)]
    pub sprint_rounds: Vec<i32>,
    pub rounds: Vec<CalendarRound>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRound {
    pub round: i32,
    pub name: String,
    pub country: String,
    pub circuit: String,
    pub qualifying_start: DateTime<Utc>,
    pub race_start: DateTime<Utc>,
}

impl CalendarFile {
    pub fn bundled(year: i32) -> Result<Self> {
        let raw = match year {
            2025 => CALENDAR_2025,
            2026 => CALENDAR_2026,
            other => return Err(SeederError::UnknownSeason(other)),
        };
        Self::parse(raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn has_sprint(&self, round: i32) -> bool {
        self.sprint_rounds.contains(&round)
    }

    pub fn scheduled_rounds(&self) -> Vec<ScheduledRound<'_>> {
        self.rounds
            .iter()
            .map(|round| ScheduledRound {
                year: self.year,
                round: round.round,
                name: &round.name,
                country: &round.country,
                circuit: &round.circuit,
                qualifying_start: round.qualifying_start,
                race_start: round.race_start,
                has_sprint: self.has_sprint(round.round),
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

pub struct CalendarValidator;

impl CalendarValidator {
    pub fn validate(calendar: &CalendarFile) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if calendar.rounds.is_empty() {
            report
                .errors
                .push("Calendar must contain at least one round".to_string());
        }

        let mut rounds = HashSet::new();
        for round in &calendar.rounds {
            if round.round < 1 {
                report.errors.push(format!(
                    "Round '{}' has invalid number: {}. Rounds start at 1",
                    round.name, round.round
                ));
            }
            if !rounds.insert(round.round) {
                report
                    .errors
                    .push(format!("Duplicate round number: {}", round.round));
            }
            if round.name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Round {} has an empty name", round.round));
            }
            if round.country.trim().is_empty() || round.circuit.trim().is_empty() {
                report.warnings.push(format!(
                    "Round {} is missing its country or circuit",
                    round.round
                ));
            }
            if round.qualifying_start >= round.race_start {
                report.errors.push(format!(
                    "Round {}: qualifying must start before the race",
                    round.round
                ));
            }
            if round.race_start.format("%Y").to_string() != calendar.year.to_string() {
                report.warnings.push(format!(
                    "Round {} races outside the {} season",
                    round.round, calendar.year
                ));
            }
        }

        if !rounds.is_empty() && !rounds.contains(&1) {
            report
                .errors
                .push("Calendar must start at round 1".to_string());
        }

        let expected = rounds.len() as i32;
        if rounds.iter().any(|round| *round > expected) {
            report
                .warnings
                .push("Round numbers are not contiguous".to_string());
        }

        for sprint in &calendar.sprint_rounds {
            if !rounds.contains(sprint) {
                report
                    .errors
                    .push(format!("Sprint round {} is not in the calendar", sprint));
            }
        }

        if !report.errors.is_empty() {
            return Err(SeederError::ValidationError(report.errors.join("; ")));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(number: i32, qualifying: &str, race: &str) -> CalendarRound {
        CalendarRound {
            round: number,
            name: format!("Grand Prix {}", number),
            country: "Country".to_string(),
            circuit: "Circuit".to_string(),
            qualifying_start: qualifying.parse().unwrap(),
            race_start: race.parse().unwrap(),
        }
    }

    fn calendar(rounds: Vec<CalendarRound>, sprint_rounds: Vec<i32>) -> CalendarFile {
        CalendarFile {
            year: 2025,
            sprint_rounds,
            rounds,
        }
    }

    #[test]
    fn test_bundled_calendars_are_valid() {
        for year in [2025, 2026] {
            let calendar = CalendarFile::bundled(year).unwrap();
            assert_eq!(calendar.rounds.len(), 24);
            let report = CalendarValidator::validate(&calendar).unwrap();
            assert!(report.warnings.is_empty());
        }
    }

    #[test]
    fn test_bundled_sprint_weekends() {
        let calendar = CalendarFile::bundled(2025).unwrap();
        let sprints: Vec<i32> = calendar
            .scheduled_rounds()
            .iter()
            .filter(|round| round.has_sprint)
            .map(|round| round.round)
            .collect();
        assert_eq!(sprints, vec![2, 6, 13, 19, 21, 23]);
    }

    #[test]
    fn test_unknown_season() {
        assert!(matches!(
            CalendarFile::bundled(1999),
            Err(SeederError::UnknownSeason(1999))
        ));
    }

    #[test]
    fn test_duplicate_round_is_an_error() {
        let calendar = calendar(
            vec![
                round(1, "2025-03-15T05:00:00Z", "2025-03-16T05:00:00Z"),
                round(1, "2025-03-22T07:00:00Z", "2025-03-23T07:00:00Z"),
            ],
            vec![],
        );
        assert!(CalendarValidator::validate(&calendar).is_err());
    }

    #[test]
    fn test_race_before_qualifying_is_an_error() {
        let calendar = calendar(
            vec![round(1, "2025-03-16T05:00:00Z", "2025-03-15T05:00:00Z")],
            vec![],
        );
        assert!(CalendarValidator::validate(&calendar).is_err());
    }

    #[test]
    fn test_unknown_sprint_round_is_an_error() {
        let calendar = calendar(
            vec![round(1, "2025-03-15T05:00:00Z", "2025-03-16T05:00:00Z")],
            vec![4],
        );
        assert!(CalendarValidator::validate(&calendar).is_err());
    }

    #[test]
    fn test_gap_in_rounds_is_a_warning() {
        let calendar = calendar(
            vec![
                round(1, "2025-03-15T05:00:00Z", "2025-03-16T05:00:00Z"),
                round(3, "2025-04-05T06:00:00Z", "2025-04-06T05:00:00Z"),
            ],
            vec![],
        );
        let report = CalendarValidator::validate(&calendar).unwrap();
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_empty_calendar_is_an_error() {
        assert!(CalendarValidator::validate(&calendar(vec![], vec![])).is_err());
    }
}
