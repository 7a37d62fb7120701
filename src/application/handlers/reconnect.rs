//! Operator-driven reconnection to the POS database.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode};
use crate::ports::{ConnectionDescriptor, ConnectionManager};

pub struct ReconnectHandler {
    connection: Arc<dyn ConnectionManager>,
    refresh: Arc<Notify>,
}

impl ReconnectHandler {
    pub fn new(connection: Arc<dyn ConnectionManager>, refresh: Arc<Notify>) -> Self {
        Self {
            connection,
            refresh,
        }
    }

    pub async fn execute(
        &self,
        descriptor: ConnectionDescriptor,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        if descriptor.host.trim().is_empty() {
            return Err(DomainError::validation("host", "Host is required"));
        }
        if descriptor.database.trim().is_empty() {
            return Err(DomainError::validation("database", "Database is required"));
        }

        tracing::info!(
            host = %descriptor.host,
            database = %descriptor.database,
            performed_by = %metadata.performed_by,
            correlation_id = %metadata.correlation_id(),
            "operator requested reconnect"
        );

        self.connection
            .reconnect(descriptor)
            .await
            .map_err(|e| DomainError::new(ErrorCode::Disconnected, e.to_string()))?;

        // Refresh immediately so the board recovers without waiting for the
        // next poll interval.
        self.refresh.notify_one();
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.connection
            .ping()
            .await
            .map_err(|e| DomainError::new(ErrorCode::Disconnected, e.to_string()))
    }
}
