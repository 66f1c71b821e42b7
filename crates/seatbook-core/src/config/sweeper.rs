//! Expiry sweeper configuration.

use serde::{Deserialize, Serialize};

/// Background expiry sweeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Whether the sweeper runs alongside the HTTP server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweep cycles.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Maximum seats expired per store scan.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    30
}

fn default_batch_size() -> usize {
    500
}
