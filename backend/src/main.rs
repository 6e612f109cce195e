//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API.

mod server;

use std::io;

use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use social::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use social::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let config = build_config(&settings).await?;

    let (server, _health) = create_server(config)?;
    info!("server listening");
    server.await
}

async fn build_config(settings: &AppSettings) -> io::Result<ServerConfig> {
    let database_url = settings.database_url().map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let token_ttl = settings.token_ttl().map_err(io::Error::other)?;
    let page_size = settings.default_page_size().map_err(io::Error::other)?;

    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(io::Error::other)?;
    info!(%bind_addr, max_connections = settings.db_max_connections(), "database pool ready");

    let config = ServerConfig::new(bind_addr, pool)
        .with_token_ttl(token_ttl)
        .with_default_page_size(page_size);
    match settings.jwt_secret() {
        Some(secret) => Ok(config.with_jwt_secret(secret)),
        None if cfg!(debug_assertions) => Ok(config),
        None => Err(io::Error::other(
            "jwt_secret is required in release builds (set SOCIAL_JWT_SECRET)",
        )),
    }
}
