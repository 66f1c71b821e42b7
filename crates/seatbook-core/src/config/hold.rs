//! Hold lifecycle configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Hold duration and per-session quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldConfig {
    /// How long a hold stays live after it is placed, in minutes.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u32,
    /// Maximum number of live holds a single session may own.
    #[serde(default = "default_max_per_session")]
    pub max_per_session: usize,
}

impl HoldConfig {
    /// Hold lifetime as a chrono duration.
    pub fn ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.ttl_minutes))
    }

    /// Largest hold set a session may present in one request.
    pub fn max_session_entries(&self) -> usize {
        self.max_per_session.saturating_mul(4)
    }
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            max_per_session: default_max_per_session(),
        }
    }
}

fn default_ttl_minutes() -> u32 {
    10
}

fn default_max_per_session() -> usize {
    4
}
