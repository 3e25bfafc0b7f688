use std::cmp::Ordering;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::standings::{EventStandingEntry, LeagueStandingEntry};
use crate::error::Result;
use crate::models::ScoreBreakdown;
use crate::repository::standings::{EventScoreRow, MemberTotalRow, StandingsRepository};

fn by_points_then_name(
    (a_points, a_name, a_id): (i64, &str, Uuid),
    (b_points, b_name, b_id): (i64, &str, Uuid),
) -> Ordering {
    b_points
        .cmp(&a_points)
        .then_with(|| a_name.cmp(b_name))
        .then_with(|| a_id.cmp(&b_id))
}

/// Rank season totals. Equal totals share a position and the next distinct
/// total takes the following position (1, 1, 2).
pub fn rank_league_totals(mut rows: Vec<MemberTotalRow>) -> Vec<LeagueStandingEntry> {
    rows.sort_by(|a, b| {
        by_points_then_name(
            (a.total_points, a.username.as_str(), a.user_id),
            (b.total_points, b.username.as_str(), b.user_id),
        )
    });

    let mut position = 0;
    let mut previous_total = None;

    rows.into_iter()
        .map(|row| {
            if previous_total != Some(row.total_points) {
                position += 1;
                previous_total = Some(row.total_points);
            }

            LeagueStandingEntry {
                position,
                user_id: row.user_id,
                username: row.username,
                total_points: row.total_points,
                events_scored: row.events_scored,
            }
        })
        .collect()
}

/// Rank one event's scores. Positions follow the sort order.
pub fn rank_event_scores(mut rows: Vec<EventScoreRow>) -> Vec<EventStandingEntry> {
    rows.sort_by(|a, b| {
        by_points_then_name(
            (i64::from(a.points), a.username.as_str(), a.user_id),
            (i64::from(b.points), b.username.as_str(), b.user_id),
        )
    });

    rows.into_iter()
        .zip(1..)
        .map(|(row, position)| EventStandingEntry {
            position,
            user_id: row.user_id,
            username: row.username,
            points: row.points,
            breakdown: ScoreBreakdown::decode(&row.breakdown.0).into(),
        })
        .collect()
}

pub async fn league_standings(pool: &PgPool, league_id: Uuid) -> Result<Vec<LeagueStandingEntry>> {
    let repo = StandingsRepository::new(pool);
    let rows = repo.league_totals(league_id).await?;
    Ok(rank_league_totals(rows))
}

pub async fn event_standings(
    pool: &PgPool,
    league_id: Uuid,
    race_event_id: Uuid,
) -> Result<Vec<EventStandingEntry>> {
    let repo = StandingsRepository::new(pool);
    let rows = repo.event_scores(league_id, race_event_id).await?;
    Ok(rank_event_scores(rows))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlx::types::Json;

    use super::*;
    use crate::models::ScoreKey;

    fn total(id: u128, username: &str, total_points: i64) -> MemberTotalRow {
        MemberTotalRow {
            user_id: Uuid::from_u128(id),
            username: username.to_string(),
            total_points,
            events_scored: 1,
        }
    }

    fn event_row(id: u128, username: &str, points: i32, breakdown: serde_json::Value) -> EventScoreRow {
        EventScoreRow {
            user_id: Uuid::from_u128(id),
            username: username.to_string(),
            points,
            breakdown: Json(breakdown),
        }
    }

    #[test]
    fn test_league_totals_sorted_descending() {
        let standings = rank_league_totals(vec![
            total(1, "carla", 12),
            total(2, "bruno", 40),
            total(3, "anna", 27),
        ]);

        let names: Vec<&str> = standings.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, vec!["bruno", "anna", "carla"]);
        let positions: Vec<i64> = standings.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_tied_totals_share_position() {
        let standings = rank_league_totals(vec![
            total(1, "zoe", 30),
            total(2, "anna", 30),
            total(3, "marco", 10),
        ]);

        assert_eq!(standings[0].username, "anna");
        assert_eq!(standings[1].username, "zoe");
        assert_eq!(standings[0].position, 1);
        assert_eq!(standings[1].position, 1);
        assert_eq!(standings[2].position, 2);
    }

    #[test]
    fn test_same_username_breaks_tie_on_id() {
        let standings = rank_league_totals(vec![total(9, "sam", 5), total(4, "sam", 5)]);
        assert_eq!(standings[0].user_id, Uuid::from_u128(4));
    }

    #[test]
    fn test_empty_league_has_empty_standings() {
        assert!(rank_league_totals(Vec::new()).is_empty());
    }

    #[test]
    fn test_event_positions_are_sequential() {
        let standings = rank_event_scores(vec![
            event_row(1, "bea", 3, json!({ "SAFETY_CAR": 3 })),
            event_row(2, "ada", 3, json!({ "SAFETY_CAR": 3 })),
            event_row(3, "cy", 27, json!({ "P1": 10, "P2": 7, "P3": 5, "PODIO_BONUS": 5 })),
        ]);

        let ranked: Vec<(i64, &str)> = standings
            .iter()
            .map(|s| (s.position, s.username.as_str()))
            .collect();
        assert_eq!(ranked, vec![(1, "cy"), (2, "ada"), (3, "bea")]);
        assert_eq!(standings[0].breakdown.get(&ScoreKey::PodioBonus), Some(&5));
    }

    #[test]
    fn test_event_breakdown_decodes_blob_rows() {
        let standings = rank_event_scores(vec![event_row(
            1,
            "ada",
            5,
            json!("{\"POLE\":5}"),
        )]);

        assert_eq!(standings[0].breakdown.get(&ScoreKey::Pole), Some(&5));
    }
}
