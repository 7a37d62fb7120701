//! Command metadata for audit context.
//!
//! Commands that change order state record who performed them. Rather than a
//! module-level "current user", the operator name travels explicitly with
//! every command into its handler and down to the database audit columns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context that flows through command processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Name of the operator executing this command (audit logging).
    pub performed_by: String,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g. "api", "keypad", "poller").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for the given operator.
    pub fn new(performed_by: impl Into<String>) -> Self {
        Self {
            performed_by: performed_by.into(),
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: add a correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: add a source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Test fixture with a fixed operator and correlation id.
    pub fn test_fixture() -> Self {
        Self::new("test-operator")
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
