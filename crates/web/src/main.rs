use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use features::{leagues, predictions, race_events, results, scoring, standings};
use middleware::auth::JwtKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        race_events::handlers::list_race_events,
        race_events::handlers::get_race_event,
        race_events::handlers::create_race_event,
        race_events::handlers::update_race_event,
        results::handlers::list_results,
        results::handlers::enter_results,
        results::handlers::recompute_scores,
        predictions::handlers::list_own_predictions,
        predictions::handlers::submit_predictions,
        predictions::handlers::list_all_predictions,
        leagues::handlers::create_league,
        leagues::handlers::list_my_leagues,
        leagues::handlers::list_admin_leagues,
        leagues::handlers::get_league,
        leagues::handlers::preview_invite,
        leagues::handlers::join_league,
        leagues::handlers::refresh_invite_code,
        scoring::handlers::get_scoring_rules,
        scoring::handlers::update_scoring_rules,
        scoring::handlers::reset_scoring_rules,
        standings::handlers::get_league_standings,
        standings::handlers::get_event_standings,
    ),
    components(
        schemas(
            storage::dto::race_event::CreateRaceEventRequest,
            storage::dto::race_event::UpdateRaceEventRequest,
            storage::dto::race_event::RaceEventResponse,
            storage::dto::entry::CategoryValue,
            storage::dto::entry::SubmitPredictionsRequest,
            storage::dto::entry::EnterResultsRequest,
            storage::dto::entry::PredictionResponse,
            storage::dto::entry::ResultResponse,
            storage::dto::league::CreateLeagueRequest,
            storage::dto::league::LeagueResponse,
            storage::dto::league::LeagueSummary,
            storage::dto::league::JoinLeagueResponse,
            storage::dto::league::InviteCodeResponse,
            storage::dto::league::LeaguePreview,
            storage::dto::league::LeagueDetailResponse,
            storage::dto::league::AdministeredLeagueResponse,
            storage::dto::scoring::ScoringRulesResponse,
            storage::dto::scoring::UpdateScoringRulesRequest,
            storage::dto::scoring::RecomputeSummary,
            storage::dto::standings::LeagueStandingEntry,
            storage::dto::standings::EventStandingEntry,
            storage::models::OutcomeCategory,
            storage::models::ScoreKey,
            storage::models::UserPrediction,
            storage::models::LeagueMember,
        )
    ),
    tags(
        (name = "race-events", description = "Race calendar endpoints"),
        (name = "results", description = "Official results"),
        (name = "predictions", description = "Player predictions"),
        (name = "leagues", description = "League membership"),
        (name = "scoring", description = "Per-league point tables"),
        (name = "standings", description = "League standings"),
        (name = "admin", description = "Maintenance endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

fn cors_layer(frontend_url: Option<&str>) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Ok(match frontend_url {
        Some(url) => cors.allow_origin(
            url.parse::<HeaderValue>()
                .context("FRONTEND_URL is not a valid origin")?,
        ),
        None => cors.allow_origin(Any),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting paddock league API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let keys = JwtKeys::from_secret(&config.jwt_secret);
    let cors = cors_layer(config.frontend_url.as_deref())?;

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(features::api_router(keys).with_state(db))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_recompute_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths
                .paths
                .contains_key("/api/admin/race-events/{race_event_id}/recompute")
        );
    }

    #[test]
    fn test_openapi_lists_league_reads() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/leagues/admin",
            "/api/leagues/{league_id}",
            "/api/leagues/join/{invite_code}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_cors_rejects_malformed_origin() {
        assert!(cors_layer(Some("http://ok.example")).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }
}
