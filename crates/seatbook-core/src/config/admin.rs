//! Admin credential configuration.

use serde::{Deserialize, Serialize};

/// Admin authority configuration.
///
/// Credentials are never stored in clear text: each entry is the lowercase
/// hex SHA-256 digest of an admin API key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Hex-encoded SHA-256 digests of accepted admin keys.
    #[serde(default)]
    pub key_hashes: Vec<String>,
}
