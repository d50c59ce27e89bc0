use dotenvy::dotenv;
use payment_ledger::{
    config::{
        database::{create_connection, create_tables},
        settings::{DEFAULT_CONFIG_PATH, load_settings},
    },
    core::retention::start_retention_job,
    errors::Result,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load settings (DATABASE_URL overrides the file)
    let config_path =
        std::env::var("LEDGER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = load_settings(&config_path)
        .inspect_err(|e| error!("Failed to load settings from {}: {}", config_path, e))?;
    let policy = settings.retention.policy()?;

    // 4. Connect and make sure the schema exists
    let db = create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Run the retention job until Ctrl-C
    let cancel = CancellationToken::new();
    let retention = start_retention_job(db.clone(), policy, cancel.clone());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");

    cancel.cancel();
    if let Err(e) = retention.await {
        error!("Retention job ended abnormally: {}", e);
    }

    db.close().await?;
    Ok(())
}
