//! Connection pool construction.

use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::Config as PgConfig;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::error::{AcctError, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a connection pool and verify it with one round trip.
pub async fn connect(config: &DatabaseConfig) -> Result<Pool> {
    let mut pg_config = PgConfig::new();
    pg_config.host(&config.host);
    pg_config.port(config.port);
    pg_config.dbname(&config.database);
    pg_config.user(&config.user);
    pg_config.password(&config.password);
    pg_config.keepalives(true);
    pg_config.keepalives_idle(Duration::from_secs(30));
    pg_config.connect_timeout(CONNECT_TIMEOUT);

    warn!("TLS is disabled. Credentials will be transmitted in plaintext.");
    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config);
    let pool = Pool::builder(mgr)
        .max_size(config.pool_size)
        .build()
        .map_err(|e| AcctError::pool(e, "creating connection pool"))?;

    let client = pool
        .get()
        .await
        .map_err(|e| AcctError::pool(e, "opening initial connection"))?;
    client.simple_query("SELECT 1").await?;

    info!(
        "Connected to {}:{}/{}",
        config.host, config.port, config.database
    );

    Ok(pool)
}

/// Check that the pool can still serve a connection.
pub async fn health_check(pool: &Pool) -> Result<()> {
    let client = pool
        .get()
        .await
        .map_err(|e| AcctError::pool(e, "checking pool health"))?;
    client.simple_query("SELECT 1").await?;
    Ok(())
}
