use sqlx::PgPool;
use storage::repository::{
    race_event::{self, RaceEventRepository},
    race_result, score,
};

use crate::Result;
use crate::calendar::CalendarFile;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResetSummary {
    pub scores_deleted: u64,
    pub results_deleted: u64,
    pub flags_cleared: u64,
}

pub struct CalendarSeeder<'a> {
    pool: &'a PgPool,
}

impl<'a> CalendarSeeder<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert every round of the calendar keyed by (year, round)
    pub async fn seed(&self, calendar: &CalendarFile) -> Result<SeedSummary> {
        let repo = RaceEventRepository::new(self.pool);
        let mut summary = SeedSummary::default();

        for round in calendar.scheduled_rounds() {
            let existing = repo.find_by_round(round.year, round.round).await?;
            let event = repo.upsert_round(&round).await?;

            if existing.is_some() {
                summary.updated += 1;
            } else {
                summary.created += 1;
            }

            tracing::debug!(
                "Round {} {} ({}){}",
                event.round,
                event.name,
                event.race_event_id,
                if event.has_sprint { " [sprint]" } else { "" }
            );
        }

        Ok(summary)
    }

    /// Remove every result and score and reopen all events for result entry.
    /// All or nothing.
    pub async fn reset_results(&self) -> Result<ResetSummary> {
        let mut tx = self.pool.begin().await?;

        let scores_deleted = score::delete_all(&mut tx).await?;
        let results_deleted = race_result::delete_all(&mut tx).await?;
        let flags_cleared = race_event::clear_result_flags(&mut tx).await?;

        tx.commit().await?;

        Ok(ResetSummary {
            scores_deleted,
            results_deleted,
            flags_cleared,
        })
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use storage::dto::entry::{CategoryValue, EnterResultsRequest};
    use storage::models::{OutcomeCategory, ROLE_ADMIN};
    use storage::repository::{
        league::LeagueRepository, race_event::RaceEventRepository, user::UserRepository,
    };
    use storage::services::scoring::enter_results;
    use uuid::Uuid;

    use super::*;

    fn entry(category: OutcomeCategory, value: &str) -> CategoryValue {
        CategoryValue {
            category,
            value: value.to_string(),
        }
    }

    #[sqlx::test(migrator = "storage::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_reset_clears_results_scores_and_flags(pool: PgPool) {
        let calendar = CalendarFile::bundled(2025).unwrap();
        let seeded = CalendarSeeder::new(&pool).seed(&calendar).await.unwrap();
        assert_eq!(seeded.created, calendar.rounds.len());

        let admin = Uuid::new_v4();
        UserRepository::new(&pool)
            .upsert(admin, "steward", ROLE_ADMIN)
            .await
            .unwrap();
        LeagueRepository::new(&pool)
            .create("Paddock Club", admin)
            .await
            .unwrap();

        let event = RaceEventRepository::new(&pool)
            .find_by_round(2025, 1)
            .await
            .unwrap()
            .unwrap();
        enter_results(
            &pool,
            event.race_event_id,
            &EnterResultsRequest {
                results: vec![
                    entry(OutcomeCategory::P1, "NOR"),
                    entry(OutcomeCategory::Pole, "NOR"),
                ],
            },
        )
        .await
        .unwrap();

        let summary = CalendarSeeder::new(&pool).reset_results().await.unwrap();

        assert_eq!(
            summary,
            ResetSummary {
                scores_deleted: 1,
                results_deleted: 2,
                flags_cleared: 1,
            }
        );

        let remaining: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM scores) + (SELECT COUNT(*) FROM race_results)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(remaining, 0);

        let reopened = RaceEventRepository::new(&pool)
            .find_by_id(event.race_event_id)
            .await
            .unwrap();
        assert!(!reopened.is_result_entered);

        let again = CalendarSeeder::new(&pool).reset_results().await.unwrap();
        assert_eq!(again, ResetSummary::default());
    }
}
