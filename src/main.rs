use job_autopilot::{app_state::AppState, config::AppConfig, db, pipeline};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration from environment");
    })?;

    tracing::info!(database_url = %config.database_url, "Opening listing store");
    let db_pool = db::init_pool(&config.database_url).await?;

    let state = AppState::from_config(&config, db_pool).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to initialize services");
    })?;

    let summary = pipeline::run(&state).await.inspect_err(|e| {
        tracing::error!(error = %e, "Run aborted by storage failure");
    })?;

    tracing::info!(
        submitted = summary.submitted,
        pending = summary.pending,
        "Job application run complete"
    );

    state.db.close().await;
    Ok(())
}
