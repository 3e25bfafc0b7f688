use clap::{Parser, Subcommand};
use seeder::{CalendarFile, CalendarSeeder, CalendarValidator};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "f1-seed")]
#[command(about = "Race calendar seeding and result maintenance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert or refresh a season calendar
    Calendar {
        #[command(flatten)]
        source: CalendarSource,

        #[arg(long)]
        validate_only: bool,
    },
    /// Delete every result and score and clear the result flags
    ResetResults,
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct CalendarSource {
    /// Season of a bundled calendar (2025 or 2026)
    #[arg(short, long)]
    year: Option<i32>,

    /// Path to a calendar JSON file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("f1_seed={},seeder={},storage={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Calendar {
            source,
            validate_only,
        } => {
            handle_calendar(source, validate_only, cli.database_url.as_deref()).await?;
        }
        Commands::ResetResults => {
            handle_reset_results(cli.database_url.as_deref()).await?;
        }
    }

    Ok(())
}

async fn connect(database_url: Option<&str>) -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = database_url.ok_or("DATABASE_URL or --database-url is required")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

async fn handle_calendar(
    source: CalendarSource,
    validate_only: bool,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let calendar = match (source.year, source.file) {
        (Some(year), _) => {
            tracing::info!("Loading bundled {} calendar", year);
            CalendarFile::bundled(year)?
        }
        (None, Some(file)) => {
            tracing::info!("Loading calendar from: {}", file.display());
            let raw = tokio::fs::read_to_string(&file).await?;
            CalendarFile::parse(&raw)?
        }
        (None, None) => return Err("Either --year or --file is required".into()),
    };

    tracing::info!(
        "Loaded {} season: {} rounds, {} sprint weekends",
        calendar.year,
        calendar.rounds.len(),
        calendar.sprint_rounds.len()
    );

    let report = CalendarValidator::validate(&calendar)?;
    report.log_warnings();
    tracing::info!("Validation successful");

    if validate_only {
        return Ok(());
    }

    let pool = connect(database_url).await?;
    let summary = CalendarSeeder::new(&pool).seed(&calendar).await?;

    tracing::info!(
        "Calendar {} seeded: {} created, {} updated",
        calendar.year,
        summary.created,
        summary.updated
    );

    Ok(())
}

async fn handle_reset_results(database_url: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect(database_url).await?;
    let summary = CalendarSeeder::new(&pool).reset_results().await?;

    tracing::info!(
        "Reset complete: {} scores deleted, {} results deleted, {} events reopened",
        summary.scores_deleted,
        summary.results_deleted,
        summary.flags_cleared
    );

    Ok(())
}
