//! Seat store backend selection.

use serde::{Deserialize, Serialize};

/// Which seat store implementation backs the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// Process-local store. State is lost on restart.
    #[default]
    Memory,
    /// PostgreSQL-backed store with conditional updates.
    Postgres,
}

/// Seat store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend provider.
    #[serde(default)]
    pub provider: StoreProvider,
}
