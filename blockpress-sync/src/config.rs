use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the reconciliation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Upper bound for a single backend request (ms).
    pub operation_timeout_ms: u64,
    /// Whether `save` runs validation before touching the backend.
    pub validate_before_save: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: 30_000,
            validate_before_save: true,
        }
    }
}

impl ReconcileConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}
