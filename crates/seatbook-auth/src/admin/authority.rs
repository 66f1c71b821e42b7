//! Admin predicate comparing SHA-256 digests of presented keys against the
//! digests listed in configuration.

use async_trait::async_trait;
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use seatbook_core::config::AdminConfig;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::traits::AdminAuthority;
use seatbook_core::types::AdminIdentity;

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Computes the lowercase hex SHA-256 digest of an admin key.
///
/// Operators store this value in `admin.key_hashes`.
pub fn hash_admin_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{digest:x}")
}

/// Admin authority that accepts any key whose digest is configured.
#[derive(Debug, Clone)]
pub struct ConfiguredAdminAuthority {
    digests: Vec<String>,
}

impl ConfiguredAdminAuthority {
    /// Build the authority from configuration, rejecting malformed digests.
    pub fn from_config(config: &AdminConfig) -> AppResult<Self> {
        let mut digests = Vec::with_capacity(config.key_hashes.len());
        for raw in &config.key_hashes {
            let digest = raw.trim().to_ascii_lowercase();
            if digest.len() != DIGEST_HEX_LEN || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AppError::configuration(
                    "admin.key_hashes entries must be 64-character hex SHA-256 digests",
                ));
            }
            digests.push(digest);
        }

        if digests.is_empty() {
            warn!("No admin keys configured; booking finalization is disabled");
        }

        Ok(Self { digests })
    }
}

#[async_trait]
impl AdminAuthority for ConfiguredAdminAuthority {
    async fn is_admin(&self, identity: &AdminIdentity) -> AppResult<bool> {
        let presented = hash_admin_key(identity.expose());
        let matched = self
            .digests
            .iter()
            .fold(false, |acc, known| {
                acc | constant_time_eq(known.as_bytes(), presented.as_bytes())
            });

        debug!(matched, "Admin credential checked");
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority_for(keys: &[&str]) -> ConfiguredAdminAuthority {
        let config = AdminConfig {
            key_hashes: keys.iter().map(|k| hash_admin_key(k)).collect(),
        };
        ConfiguredAdminAuthority::from_config(&config).expect("valid config")
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        assert_eq!(
            hash_admin_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_configured_key_is_admin() {
        let authority = authority_for(&["ops-key", "night-shift"]);
        let ok = authority
            .is_admin(&AdminIdentity::new("night-shift"))
            .await
            .expect("check");
        assert!(ok);
    }

    #[tokio::test]
    async fn test_unknown_key_is_not_admin() {
        let authority = authority_for(&["ops-key"]);
        let ok = authority
            .is_admin(&AdminIdentity::new("guess"))
            .await
            .expect("check");
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_no_keys_rejects_everyone() {
        let authority = ConfiguredAdminAuthority::from_config(&AdminConfig::default())
            .expect("empty config is allowed");
        assert!(!authority.is_admin(&AdminIdentity::new("")).await.expect("check"));
    }

    #[tokio::test]
    async fn test_uppercase_configured_digest_matches() {
        let config = AdminConfig {
            key_hashes: vec![hash_admin_key("ops-key").to_ascii_uppercase()],
        };
        let authority = ConfiguredAdminAuthority::from_config(&config).expect("valid config");
        assert!(authority.is_admin(&AdminIdentity::new("ops-key")).await.expect("check"));
        assert!(!authority.is_admin(&AdminIdentity::new("ops-key ")).await.expect("check"));
    }

    #[test]
    fn test_malformed_digest_rejected() {
        let config = AdminConfig {
            key_hashes: vec!["not-a-digest".to_string()],
        };
        assert!(ConfiguredAdminAuthority::from_config(&config).is_err());
    }
}
