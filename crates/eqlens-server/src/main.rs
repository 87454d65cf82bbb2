//! eqlens Server - Main entry point

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use eqlens_common::logging::{init_logging, LogConfig};
use tracing::{info, warn};

use eqlens_server::{
    api,
    config::Config,
    repository::{InMemoryRepository, PgRepository, SharedRepository},
    shutdown::{serve_with_drain, shutdown_signal},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Builder defaults first, LOG_* variables take precedence
    let log_config = LogConfig::builder()
        .log_file_prefix("eqlens-server")
        .filter_directives("eqlens_server=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting eqlens server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let repo: SharedRepository = match &config.database {
        Some(database) => {
            let repo = PgRepository::connect(database).await?;
            info!("Database connection pool established and migrations applied");
            Arc::new(repo)
        },
        None => {
            warn!("DATABASE_URL is not set - datasets are kept in memory and lost on restart");
            Arc::new(InMemoryRepository::new())
        },
    };

    let app = api::create_router(repo, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let drain = Duration::from_secs(config.server.shutdown_timeout_secs);
    if serve_with_drain(listener, app, shutdown_signal(), drain).await? {
        info!("Server shut down gracefully");
    }

    Ok(())
}
