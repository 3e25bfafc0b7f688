use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::entry::EnterResultsRequest;
use crate::dto::scoring::RecomputeSummary;
use crate::error::Result;
use crate::models::{OutcomeCategory, PointTable, ScoreBreakdown, ScoreKey, resolve_rules};
use crate::repository::{league, prediction, race_event, race_result, score, scoring_rules};

/// Category to value lookup for one side of a comparison: a user's
/// predictions or an event's official results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeSheet(HashMap<OutcomeCategory, String>);

impl OutcomeSheet {
    /// Stored value for `category`. Empty values count as missing.
    pub fn value(&self, category: OutcomeCategory) -> Option<&str> {
        self.0
            .get(&category)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<S: Into<String>> FromIterator<(OutcomeCategory, S)> for OutcomeSheet {
    fn from_iter<I: IntoIterator<Item = (OutcomeCategory, S)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(category, value)| (category, value.into()))
                .collect(),
        )
    }
}

/// Compare one user's predictions with the official results.
///
/// A category scores its table value only when both sides hold the same
/// non-empty value. The podium bonus requires all three podium legs to have
/// scored, and likewise for the sprint podium.
pub fn compare(
    predictions: &OutcomeSheet,
    results: &OutcomeSheet,
    table: &PointTable,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::new();

    for category in OutcomeCategory::ALL {
        let (Some(predicted), Some(actual)) =
            (predictions.value(category), results.value(category))
        else {
            continue;
        };

        if predicted == actual {
            let key = ScoreKey::from(category);
            breakdown.insert(key, table.points_for(key));
        }
    }

    award_podium_bonus(&mut breakdown, &OutcomeCategory::PODIUM, ScoreKey::PodioBonus, table);
    award_podium_bonus(
        &mut breakdown,
        &OutcomeCategory::SPRINT_PODIUM,
        ScoreKey::SprintPodioBonus,
        table,
    );

    breakdown
}

fn award_podium_bonus(
    breakdown: &mut ScoreBreakdown,
    legs: &[OutcomeCategory],
    bonus: ScoreKey,
    table: &PointTable,
) {
    if legs
        .iter()
        .all(|leg| breakdown.contains(ScoreKey::from(*leg)))
    {
        breakdown.insert(bonus, table.points_for(bonus));
    }
}

/// Everything needed to score one league for an event
#[derive(Debug, Clone)]
pub struct LeagueScoringInput {
    pub league_id: Uuid,
    pub table: PointTable,
    pub members: Vec<Uuid>,
}

/// A score record to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreUpsert {
    pub user_id: Uuid,
    pub race_event_id: Uuid,
    pub league_id: Uuid,
    pub breakdown: ScoreBreakdown,
}

impl ScoreUpsert {
    pub fn points(&self) -> i32 {
        self.breakdown.total()
    }
}

/// Plan one record per (league, member), ordered by league id then user id.
///
/// Members without predictions still get a record with an empty breakdown.
pub fn plan_event_scores(
    race_event_id: Uuid,
    results: &OutcomeSheet,
    leagues: &[LeagueScoringInput],
    predictions: &HashMap<Uuid, OutcomeSheet>,
) -> Vec<ScoreUpsert> {
    let no_predictions = OutcomeSheet::default();

    let mut leagues: Vec<&LeagueScoringInput> = leagues.iter().collect();
    leagues.sort_by_key(|league| league.league_id);

    let mut plan = Vec::new();
    for league in leagues {
        let mut members = league.members.clone();
        members.sort();
        members.dedup();

        for user_id in members {
            let sheet = predictions.get(&user_id).unwrap_or(&no_predictions);
            plan.push(ScoreUpsert {
                user_id,
                race_event_id,
                league_id: league.league_id,
                breakdown: compare(sheet, results, &league.table),
            });
        }
    }

    plan
}

/// Recompute every league's records for an event on the given connection.
///
/// Expects to run inside a transaction: the advisory lock taken here is
/// released on commit or rollback.
pub async fn recompute_in(conn: &mut PgConnection, race_event_id: Uuid) -> Result<RecomputeSummary> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(race_event_id.to_string())
        .execute(&mut *conn)
        .await?;

    let results = race_result::list_for_event(conn, race_event_id).await?;
    if results.is_empty() {
        tracing::info!("No results for race event {}, skipping scoring", race_event_id);
        return Ok(RecomputeSummary {
            race_event_id,
            skipped: true,
            ..RecomputeSummary::default()
        });
    }

    let result_sheet: OutcomeSheet = results
        .into_iter()
        .map(|entry| (entry.category, entry.value))
        .collect();

    let league_ids = league::list_ids(conn).await?;

    let rules: HashMap<_, _> = scoring_rules::list_all(conn)
        .await?
        .into_iter()
        .map(|rules| (rules.league_id, rules))
        .collect();

    let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (league_id, user_id) in league::list_memberships(conn).await? {
        members.entry(league_id).or_default().push(user_id);
    }

    let inputs: Vec<LeagueScoringInput> = league_ids
        .into_iter()
        .map(|league_id| LeagueScoringInput {
            league_id,
            table: resolve_rules(rules.get(&league_id)),
            members: members.remove(&league_id).unwrap_or_default(),
        })
        .collect();

    let mut grouped: HashMap<Uuid, Vec<(OutcomeCategory, String)>> = HashMap::new();
    for entry in prediction::list_for_event(conn, race_event_id).await? {
        grouped
            .entry(entry.user_id)
            .or_default()
            .push((entry.category, entry.value));
    }
    let predictions: HashMap<Uuid, OutcomeSheet> = grouped
        .into_iter()
        .map(|(user_id, entries)| (user_id, entries.into_iter().collect()))
        .collect();

    let plan = plan_event_scores(race_event_id, &result_sheet, &inputs, &predictions);

    for upsert in &plan {
        score::upsert(
            conn,
            upsert.user_id,
            upsert.race_event_id,
            upsert.league_id,
            &upsert.breakdown,
        )
        .await?;
    }

    for input in &inputs {
        tracing::debug!(
            "Scored {} members of league {} for race event {}",
            input.members.len(),
            input.league_id,
            race_event_id
        );
    }

    let records_removed = score::delete_stale(conn, race_event_id).await?;

    let summary = RecomputeSummary {
        race_event_id,
        skipped: false,
        leagues: inputs.len(),
        records_written: plan.len(),
        records_removed,
    };

    tracing::info!(
        "Recomputed race event {}: {} leagues, {} records written, {} stale removed",
        race_event_id,
        summary.leagues,
        summary.records_written,
        summary.records_removed
    );

    Ok(summary)
}

/// Recompute all score records of an event in one transaction.
pub async fn recompute_event_scores(pool: &PgPool, race_event_id: Uuid) -> Result<RecomputeSummary> {
    let mut tx = pool.begin().await?;
    let summary = recompute_in(&mut tx, race_event_id).await?;
    tx.commit().await?;

    Ok(summary)
}

/// Store official results, flag the event and rescore it atomically.
pub async fn enter_results(
    pool: &PgPool,
    race_event_id: Uuid,
    req: &EnterResultsRequest,
) -> Result<RecomputeSummary> {
    let mut tx = pool.begin().await?;

    race_event::lock_for_update(&mut tx, race_event_id).await?;

    for entry in &req.results {
        race_result::upsert(&mut tx, race_event_id, entry).await?;
    }
    race_event::mark_results_entered(&mut tx, race_event_id).await?;

    let summary = recompute_in(&mut tx, race_event_id).await?;

    tx.commit().await?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn sheet(entries: &[(OutcomeCategory, &str)]) -> OutcomeSheet {
        entries.iter().map(|(c, v)| (*c, *v)).collect()
    }

    fn points(entries: &[(ScoreKey, i32)]) -> ScoreBreakdown {
        entries.iter().copied().collect()
    }

    fn full_sheet() -> OutcomeSheet {
        OutcomeCategory::ALL
            .into_iter()
            .map(|category| (category, format!("{}-value", category)))
            .collect()
    }

    #[test]
    fn test_podium_match_with_wrong_pole() {
        use OutcomeCategory::*;
        let predictions = sheet(&[(P1, "VER"), (P2, "NOR"), (P3, "LEC"), (Pole, "VER")]);
        let results = sheet(&[(P1, "VER"), (P2, "NOR"), (P3, "LEC"), (Pole, "HAM")]);

        let breakdown = compare(&predictions, &results, &PointTable::default());

        assert_eq!(
            breakdown,
            points(&[
                (ScoreKey::P1, 10),
                (ScoreKey::P2, 7),
                (ScoreKey::P3, 5),
                (ScoreKey::PodioBonus, 5),
            ])
        );
        assert!(!breakdown.contains(ScoreKey::Pole));
        assert_eq!(breakdown.total(), 27);
    }

    #[test]
    fn test_single_safety_car_match() {
        let predictions = sheet(&[(OutcomeCategory::SafetyCar, "SI")]);
        let results = sheet(&[(OutcomeCategory::SafetyCar, "SI")]);

        let breakdown = compare(&predictions, &results, &PointTable::default());

        assert_eq!(breakdown, points(&[(ScoreKey::SafetyCar, 3)]));
        assert_eq!(breakdown.total(), 3);
    }

    #[test]
    fn test_no_predictions_scores_nothing() {
        let breakdown = compare(&OutcomeSheet::default(), &full_sheet(), &PointTable::default());
        assert_eq!(breakdown, ScoreBreakdown::new());
        assert_eq!(breakdown.total(), 0);
    }

    #[test]
    fn test_all_categories_match_awards_both_bonuses() {
        let table = PointTable::default();
        let breakdown = compare(&full_sheet(), &full_sheet(), &table);

        assert_eq!(BTreeMap::from(breakdown.clone()), table.entries());
        assert_eq!(breakdown.total(), 77);
    }

    #[test]
    fn test_partial_podium_earns_no_bonus() {
        use OutcomeCategory::*;
        let predictions = sheet(&[(P1, "VER"), (P2, "NOR"), (P3, "PIA")]);
        let results = sheet(&[(P1, "VER"), (P2, "NOR"), (P3, "LEC")]);

        let breakdown = compare(&predictions, &results, &PointTable::default());

        assert_eq!(breakdown.total(), 17);
        assert!(!breakdown.contains(ScoreKey::PodioBonus));
    }

    #[test]
    fn test_sprint_podium_bonus_is_independent() {
        use OutcomeCategory::*;
        let predictions = sheet(&[(SprintP1, "PIA"), (SprintP2, "NOR"), (SprintP3, "VER")]);
        let results = sheet(&[
            (SprintP1, "PIA"),
            (SprintP2, "NOR"),
            (SprintP3, "VER"),
            (P1, "LEC"),
        ]);

        let breakdown = compare(&predictions, &results, &PointTable::default());

        assert!(breakdown.contains(ScoreKey::SprintPodioBonus));
        assert!(!breakdown.contains(ScoreKey::PodioBonus));
        assert_eq!(breakdown.total(), 7 + 5 + 3 + 3);
    }

    #[test]
    fn test_values_compare_case_sensitively() {
        let predictions = sheet(&[(OutcomeCategory::P1, "ver")]);
        let results = sheet(&[(OutcomeCategory::P1, "VER")]);
        let breakdown = compare(&predictions, &results, &PointTable::default());
        assert_eq!(breakdown, ScoreBreakdown::new());
    }

    #[test]
    fn test_empty_values_never_match() {
        let predictions = sheet(&[(OutcomeCategory::FastestLap, "")]);
        let results = sheet(&[(OutcomeCategory::FastestLap, "")]);
        let breakdown = compare(&predictions, &results, &PointTable::default());
        assert_eq!(breakdown, ScoreBreakdown::new());
    }

    #[test]
    fn test_custom_table_values_are_used() {
        let mut table = PointTable::default();
        table.set(ScoreKey::SafetyCar, 20);

        let predictions = sheet(&[(OutcomeCategory::SafetyCar, "NO")]);
        let breakdown = compare(&predictions, &predictions, &table);

        assert_eq!(breakdown, points(&[(ScoreKey::SafetyCar, 20)]));
    }

    fn league(id: u128, table: PointTable, members: &[Uuid]) -> LeagueScoringInput {
        LeagueScoringInput {
            league_id: Uuid::from_u128(id),
            table,
            members: members.to_vec(),
        }
    }

    #[test]
    fn test_plan_covers_every_member_in_stable_order() {
        let alice = Uuid::from_u128(0xa);
        let bob = Uuid::from_u128(0xb);
        let event = Uuid::from_u128(0xe);
        let results = sheet(&[(OutcomeCategory::P1, "VER")]);
        let predictions = HashMap::from([(alice, sheet(&[(OutcomeCategory::P1, "VER")]))]);
        let leagues = vec![
            league(2, PointTable::default(), &[bob, alice]),
            league(1, PointTable::default(), &[alice]),
        ];

        let plan = plan_event_scores(event, &results, &leagues, &predictions);

        let keys: Vec<(Uuid, Uuid)> = plan.iter().map(|u| (u.league_id, u.user_id)).collect();
        assert_eq!(
            keys,
            vec![
                (Uuid::from_u128(1), alice),
                (Uuid::from_u128(2), alice),
                (Uuid::from_u128(2), bob),
            ]
        );
        assert!(plan.iter().all(|u| u.race_event_id == event));
        assert_eq!(plan[2].points(), 0);
        assert_eq!(plan[2].breakdown, ScoreBreakdown::new());
    }

    #[test]
    fn test_plan_is_idempotent() {
        let user = Uuid::from_u128(7);
        let results = full_sheet();
        let predictions = HashMap::from([(user, full_sheet())]);
        let leagues = vec![league(1, PointTable::default(), &[user])];

        let first = plan_event_scores(Uuid::nil(), &results, &leagues, &predictions);
        let second = plan_event_scores(Uuid::nil(), &results, &leagues, &predictions);

        assert_eq!(first, second);
    }

    #[test]
    fn test_changed_result_lowers_score() {
        use OutcomeCategory::*;
        let user = Uuid::from_u128(7);
        let predictions = HashMap::from([(user, sheet(&[(P1, "VER"), (P2, "NOR"), (P3, "LEC")]))]);
        let leagues = vec![league(1, PointTable::default(), &[user])];

        let before = sheet(&[(P1, "VER"), (P2, "NOR"), (P3, "LEC")]);
        let after = sheet(&[(P1, "HAM"), (P2, "NOR"), (P3, "LEC")]);

        let first = plan_event_scores(Uuid::nil(), &before, &leagues, &predictions);
        let second = plan_event_scores(Uuid::nil(), &after, &leagues, &predictions);

        assert_eq!(first[0].points(), 27);
        assert_eq!(second[0].points(), 12);
    }

    #[test]
    fn test_missing_rules_equal_explicit_defaults() {
        use crate::models::fixtures::rule_set;

        let user = Uuid::from_u128(7);
        let league_id = Uuid::from_u128(1);
        let predictions = HashMap::from([(user, full_sheet())]);
        let explicit = rule_set(league_id, false, PointTable::default());

        let implicit = vec![league(1, resolve_rules(None), &[user])];
        let stored = vec![league(1, resolve_rules(Some(&explicit)), &[user])];

        assert_eq!(
            plan_event_scores(Uuid::nil(), &full_sheet(), &implicit, &predictions),
            plan_event_scores(Uuid::nil(), &full_sheet(), &stored, &predictions),
        );
    }

    #[test]
    fn test_duplicate_members_scored_once() {
        let user = Uuid::from_u128(7);
        let leagues = vec![league(1, PointTable::default(), &[user, user])];
        let plan = plan_event_scores(Uuid::nil(), &full_sheet(), &leagues, &HashMap::new());
        assert_eq!(plan.len(), 1);
    }

    mod recompute {
        use chrono::{Duration, Utc};
        use sqlx::PgPool;

        use super::super::*;
        use crate::dto::entry::CategoryValue;
        use crate::dto::race_event::CreateRaceEventRequest;
        use crate::models::{ROLE_ADMIN, ROLE_USER};
        use crate::repository::{
            league::LeagueRepository, prediction::PredictionRepository,
            race_event::RaceEventRepository, user::UserRepository,
        };

        struct Paddock {
            event: Uuid,
            alice: Uuid,
            bob: Uuid,
            league: Uuid,
        }

        fn entry(category: OutcomeCategory, value: &str) -> CategoryValue {
            CategoryValue {
                category,
                value: value.to_string(),
            }
        }

        fn podium(p1: &str) -> EnterResultsRequest {
            EnterResultsRequest {
                results: vec![
                    entry(OutcomeCategory::P1, p1),
                    entry(OutcomeCategory::P2, "NOR"),
                    entry(OutcomeCategory::P3, "LEC"),
                    entry(OutcomeCategory::Pole, "HAM"),
                ],
            }
        }

        /// Two-member league, one upcoming event, predictions from alice only
        async fn paddock(pool: &PgPool) -> Paddock {
            let alice = Uuid::from_u128(0xa);
            let bob = Uuid::from_u128(0xb);

            let users = UserRepository::new(pool);
            users.upsert(alice, "alice", ROLE_ADMIN).await.unwrap();
            users.upsert(bob, "bob", ROLE_USER).await.unwrap();

            let leagues = LeagueRepository::new(pool);
            let league = leagues.create("Paddock Club", alice).await.unwrap();
            leagues.add_member(league.league_id, bob).await.unwrap();

            let qualifying_start = Utc::now() + Duration::days(2);
            let event = RaceEventRepository::new(pool)
                .create(&CreateRaceEventRequest {
                    year: 2025,
                    round: 1,
                    name: "Australian Grand Prix".to_string(),
                    country: "Australia".to_string(),
                    circuit: "Albert Park".to_string(),
                    qualifying_start,
                    race_start: qualifying_start + Duration::days(1),
                    has_sprint: false,
                })
                .await
                .unwrap();

            PredictionRepository::new(pool)
                .save_many(
                    alice,
                    event.race_event_id,
                    &[
                        entry(OutcomeCategory::P1, "VER"),
                        entry(OutcomeCategory::P2, "NOR"),
                        entry(OutcomeCategory::P3, "LEC"),
                        entry(OutcomeCategory::Pole, "VER"),
                    ],
                )
                .await
                .unwrap();

            Paddock {
                event: event.race_event_id,
                alice,
                bob,
                league: league.league_id,
            }
        }

        async fn stored_points(pool: &PgPool, race_event_id: Uuid) -> Vec<(Uuid, i32)> {
            sqlx::query_as::<_, (Uuid, i32)>(
                "SELECT user_id, points FROM scores WHERE race_event_id = $1 ORDER BY user_id",
            )
            .bind(race_event_id)
            .fetch_all(pool)
            .await
            .unwrap()
        }

        #[sqlx::test(migrator = "crate::MIGRATOR")]
        #[ignore = "requires a Postgres DATABASE_URL"]
        async fn test_results_score_every_member(pool: PgPool) {
            let paddock = paddock(&pool).await;

            let summary = enter_results(&pool, paddock.event, &podium("VER"))
                .await
                .unwrap();

            assert!(!summary.skipped);
            assert_eq!(summary.leagues, 1);
            assert_eq!(summary.records_written, 2);
            assert_eq!(summary.records_removed, 0);
            assert_eq!(
                stored_points(&pool, paddock.event).await,
                vec![(paddock.alice, 27), (paddock.bob, 0)]
            );

            let event = RaceEventRepository::new(&pool)
                .find_by_id(paddock.event)
                .await
                .unwrap();
            assert!(event.is_result_entered);
        }

        #[sqlx::test(migrator = "crate::MIGRATOR")]
        #[ignore = "requires a Postgres DATABASE_URL"]
        async fn test_rerun_leaves_scores_unchanged(pool: PgPool) {
            let paddock = paddock(&pool).await;
            enter_results(&pool, paddock.event, &podium("VER"))
                .await
                .unwrap();
            let before = stored_points(&pool, paddock.event).await;

            let summary = recompute_event_scores(&pool, paddock.event).await.unwrap();

            assert_eq!(summary.records_written, 2);
            assert_eq!(stored_points(&pool, paddock.event).await, before);
        }

        #[sqlx::test(migrator = "crate::MIGRATOR")]
        #[ignore = "requires a Postgres DATABASE_URL"]
        async fn test_corrected_results_replace_scores(pool: PgPool) {
            let paddock = paddock(&pool).await;
            enter_results(&pool, paddock.event, &podium("VER"))
                .await
                .unwrap();

            enter_results(&pool, paddock.event, &podium("HAM"))
                .await
                .unwrap();

            assert_eq!(
                stored_points(&pool, paddock.event).await,
                vec![(paddock.alice, 12), (paddock.bob, 0)]
            );
        }

        #[sqlx::test(migrator = "crate::MIGRATOR")]
        #[ignore = "requires a Postgres DATABASE_URL"]
        async fn test_departed_member_loses_record(pool: PgPool) {
            let paddock = paddock(&pool).await;
            enter_results(&pool, paddock.event, &podium("VER"))
                .await
                .unwrap();

            sqlx::query("DELETE FROM league_members WHERE league_id = $1 AND user_id = $2")
                .bind(paddock.league)
                .bind(paddock.bob)
                .execute(&pool)
                .await
                .unwrap();

            let summary = recompute_event_scores(&pool, paddock.event).await.unwrap();

            assert_eq!(summary.records_written, 1);
            assert_eq!(summary.records_removed, 1);
            assert_eq!(
                stored_points(&pool, paddock.event).await,
                vec![(paddock.alice, 27)]
            );
        }

        #[sqlx::test(migrator = "crate::MIGRATOR")]
        #[ignore = "requires a Postgres DATABASE_URL"]
        async fn test_event_without_results_is_skipped(pool: PgPool) {
            let paddock = paddock(&pool).await;

            let summary = recompute_event_scores(&pool, paddock.event).await.unwrap();

            assert_eq!(
                summary,
                RecomputeSummary {
                    race_event_id: paddock.event,
                    skipped: true,
                    ..RecomputeSummary::default()
                }
            );
            assert!(stored_points(&pool, paddock.event).await.is_empty());
        }

        #[sqlx::test(migrator = "crate::MIGRATOR")]
        #[ignore = "requires a Postgres DATABASE_URL"]
        async fn test_failed_entry_rolls_back(pool: PgPool) {
            let paddock = paddock(&pool).await;
            let oversized = EnterResultsRequest {
                results: vec![
                    entry(OutcomeCategory::P1, "VER"),
                    entry(OutcomeCategory::P2, &"X".repeat(65)),
                ],
            };

            assert!(enter_results(&pool, paddock.event, &oversized).await.is_err());

            let stored: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM race_results WHERE race_event_id = $1")
                    .bind(paddock.event)
                    .fetch_one(&pool)
                    .await
                    .unwrap();
            assert_eq!(stored, 0);
            assert!(stored_points(&pool, paddock.event).await.is_empty());

            let event = RaceEventRepository::new(&pool)
                .find_by_id(paddock.event)
                .await
                .unwrap();
            assert!(!event.is_result_entered);
        }
    }
}
