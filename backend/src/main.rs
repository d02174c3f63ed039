//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use workbench_backend::inbound::http::health::HealthState;
use workbench_backend::inbound::http::token_key::{BuildMode, token_key_from_env};
use workbench_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, ServerSettings, create_server};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("loading settings: {err}"))?;
    let token_key = token_key_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("loading token signing key")?;
    let mut config =
        ServerConfig::from_settings(&settings, token_key).wrap_err("invalid server settings")?;

    if let Some(database_url) = settings.database_url() {
        if settings.migrate_on_start {
            let applied = run_pending_migrations(database_url)
                .await
                .wrap_err("running database migrations")?;
            info!(applied, "database schema up to date");
        }
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("connecting to the database")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("starting HTTP server")?;
    info!("workbench backend listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("HTTP server failed")
}
