//! Backend entry point: tracing, configuration, pool, and HTTP server.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use rozgar_backend::outbound::persistence::{DbPool, PoolConfig};
use rozgar_backend::server::{AppConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let config = AppConfig::from_env()?;

    let pool = match config.database_url.as_deref() {
        Some(url) => Some(
            DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|error| std::io::Error::other(format!("database pool: {error}")))?,
        ),
        None => None,
    };

    create_server(config, pool)?.await
}
