//! Live reconnection to the POS database.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

/// Connection parameters supplied by an operator at runtime.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: SecretString,
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection attempt failed: {0}")]
    ConnectFailed(String),

    #[error("liveness probe failed: {0}")]
    PingFailed(String),
}

/// Swaps the active database connection without a process restart.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// Tears down the current pool and connects with the new parameters.
    /// On failure the previous pool stays closed; callers must surface the
    /// error so an operator can retry.
    async fn reconnect(&self, descriptor: ConnectionDescriptor) -> Result<(), ConnectionError>;

    /// Cheap liveness probe against the active connection.
    async fn ping(&self) -> Result<(), ConnectionError>;
}
