//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, MigrationError, PoolError, apply_migrations};
use backend::settings::{ServiceSettings, SettingsError};
use server::{ServerConfig, create_server};

/// Failures that stop the service before it starts listening.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to load configuration: {0}")]
    Load(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<StartupError> for std::io::Error {
    fn from(err: StartupError) -> Self {
        std::io::Error::other(err.to_string())
    }
}

async fn prepare(settings: &ServiceSettings) -> Result<ServerConfig, StartupError> {
    let database_url = settings.database_url()?;
    if settings.run_migrations() {
        let applied = apply_migrations(database_url.to_owned()).await?;
        info!(applied, "database schema up to date");
    } else {
        info!("skipping migrations");
    }
    let pool = DbPool::new(settings.pool_config()?).await?;
    Ok(ServerConfig::new(settings.bind_addr()?, pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServiceSettings::load().map_err(|err| StartupError::Load(err.to_string()))?;
    let config = prepare(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
