//! Pool construction and operator-driven reconnection.
//!
//! The active pool sits behind a shared `RwLock` so every adapter picks up
//! a reconnect without being rebuilt. Mirroring the reconnect flow on the
//! POS side, the old pool is closed before the new connection is attempted;
//! when the attempt fails the display stays disconnected until the operator
//! retries with corrected parameters.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tokio::sync::RwLock;

use crate::config::DatabaseConfig;
use crate::ports::{ConnectionDescriptor, ConnectionError, ConnectionManager};

/// The swappable database pool shared by all postgres adapters.
pub type SharedPool = Arc<RwLock<PgPool>>;

/// Builds the startup pool from configuration.
pub async fn build_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(&config.url)
        .await
}

pub struct PgConnectionManager {
    pool: SharedPool,
    config: DatabaseConfig,
}

impl PgConnectionManager {
    pub fn new(pool: SharedPool, config: DatabaseConfig) -> Self {
        Self { pool, config }
    }
}

#[async_trait]
impl ConnectionManager for PgConnectionManager {
    async fn reconnect(&self, descriptor: ConnectionDescriptor) -> Result<(), ConnectionError> {
        tracing::info!(
            host = %descriptor.host,
            database = %descriptor.database,
            "reconnecting to POS database"
        );

        {
            let pool = self.pool.read().await;
            pool.close().await;
        }

        let options = PgConnectOptions::new()
            .host(&descriptor.host)
            .port(descriptor.port)
            .database(&descriptor.database)
            .username(&descriptor.user)
            .password(descriptor.password.expose_secret());

        let new_pool = PgPoolOptions::new()
            .min_connections(self.config.min_connections)
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.acquire_timeout())
            .idle_timeout(self.config.idle_timeout())
            .connect_with(options)
            .await
            .map_err(|e| ConnectionError::ConnectFailed(e.to_string()))?;

        sqlx::query("SELECT 1")
            .execute(&new_pool)
            .await
            .map_err(|e| ConnectionError::ConnectFailed(e.to_string()))?;

        *self.pool.write().await = new_pool;
        tracing::info!("POS database connection replaced");
        Ok(())
    }

    async fn ping(&self) -> Result<(), ConnectionError> {
        let pool = self.pool.read().await;
        sqlx::query("SELECT 1")
            .execute(&*pool)
            .await
            .map(|_| ())
            .map_err(|e| ConnectionError::PingFailed(e.to_string()))
    }
}
