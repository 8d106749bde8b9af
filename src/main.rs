//! HTTP server for the advance engine.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use advance_engine::api::{AppState, create_router};
use advance_engine::clock::SystemClock;
use advance_engine::config::ConfigLoader;
use advance_engine::notification::{LogSender, NotificationDispatcher};
use advance_engine::service::AdvanceService;
use advance_engine::store::{InMemoryAdvanceRepository, InMemoryDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/advance";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advance_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir = env::var("ADVANCE_ENGINE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
    let addr = env::var("ADVANCE_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    let seed = ConfigLoader::load_directory(&config_dir)?;
    tracing::info!(
        config_dir = %config_dir.display(),
        companies = seed.companies.len(),
        employees = seed.employees.len(),
        transition_policy = ?config.transition_policy,
        "Configuration loaded"
    );

    let service = AdvanceService::new(
        Box::new(InMemoryAdvanceRepository::new()),
        Arc::new(InMemoryDirectory::new(seed, config.global.clone())),
        NotificationDispatcher::new(Arc::new(LogSender), config.notifications.clone()),
        Arc::new(SystemClock),
        config.transition_policy,
    );
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Advance engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
