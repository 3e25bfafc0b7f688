use sqlx::PgPool;
use storage::{
    dto::{entry::EnterResultsRequest, scoring::RecomputeSummary},
    error::Result,
    models::ResultEntry,
    repository::{race_event::RaceEventRepository, race_result::ResultRepository},
    services::scoring,
};
use uuid::Uuid;

/// List the official results of a race event
pub async fn list_results(pool: &PgPool, race_event_id: Uuid) -> Result<Vec<ResultEntry>> {
    RaceEventRepository::new(pool).find_by_id(race_event_id).await?;

    let repo = ResultRepository::new(pool);
    repo.list_for_event(race_event_id).await
}

/// Store results and rescore every league for the event
pub async fn enter_results(
    pool: &PgPool,
    race_event_id: Uuid,
    request: &EnterResultsRequest,
) -> Result<RecomputeSummary> {
    tracing::info!(
        "Entering {} results for race event {}",
        request.results.len(),
        race_event_id
    );
    scoring::enter_results(pool, race_event_id, request).await
}

/// Rescore an existing race event from its stored results
pub async fn recompute(pool: &PgPool, race_event_id: Uuid) -> Result<RecomputeSummary> {
    RaceEventRepository::new(pool).find_by_id(race_event_id).await?;
    scoring::recompute_event_scores(pool, race_event_id).await
}
