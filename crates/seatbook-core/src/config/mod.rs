//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod admin;
pub mod app;
pub mod database;
pub mod hold;
pub mod logging;
pub mod seed;
pub mod store;
pub mod sweeper;

use serde::{Deserialize, Serialize};

pub use self::admin::AdminConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::hold::HoldConfig;
pub use self::logging::LoggingConfig;
pub use self::seed::{SeedConfig, SeedTrip};
pub use self::store::{StoreConfig, StoreProvider};
pub use self::sweeper::SweeperConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Seat store backend selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Hold lifetime and per-session quota.
    #[serde(default)]
    pub hold: HoldConfig,
    /// Expiry sweeper settings.
    #[serde(default)]
    pub sweeper: SweeperConfig,
    /// Admin credential settings.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Trips created at startup.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `SEATBOOK__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SEATBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("admin.key_hashes")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject settings that would break the hold lifecycle guarantees.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.hold.ttl_minutes == 0 {
            return Err(AppError::configuration("hold.ttl_minutes must be positive"));
        }
        if self.hold.max_per_session == 0 {
            return Err(AppError::configuration(
                "hold.max_per_session must be positive",
            ));
        }
        if self.sweeper.batch_size == 0 {
            return Err(AppError::configuration("sweeper.batch_size must be positive"));
        }
        if self.sweeper.interval_seconds == 0 {
            return Err(AppError::configuration(
                "sweeper.interval_seconds must be positive",
            ));
        }

        let ceiling = self.hold.ttl().num_seconds() as u64 / 4;
        if self.sweeper.interval_seconds > ceiling {
            return Err(AppError::configuration(format!(
                "sweeper.interval_seconds ({}) must not exceed a quarter of the hold TTL ({ceiling}s)",
                self.sweeper.interval_seconds
            )));
        }

        if self.store.provider == StoreProvider::Postgres && self.database.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url is required when store.provider = \"postgres\"",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hold.ttl_minutes, 10);
        assert_eq!(config.hold.max_per_session, 4);
        assert_eq!(config.sweeper.interval_seconds, 30);
        assert_eq!(config.store.provider, StoreProvider::Memory);
    }

    #[test]
    fn test_sweep_interval_longer_than_quarter_ttl_rejected() {
        let mut config = AppConfig::default();
        config.sweeper.interval_seconds = 200;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_quota_rejected() {
        let mut config = AppConfig::default();
        config.hold.max_per_session = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Postgres;
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let raw = r#"
            [hold]
            ttl_minutes = 20

            [store]
            provider = "postgres"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("config should parse");
        assert_eq!(config.hold.ttl_minutes, 20);
        assert_eq!(config.hold.max_per_session, 4);
        assert_eq!(config.store.provider, StoreProvider::Postgres);
        assert_eq!(config.server.port, 8080);
        assert!(config.seed.trips.is_empty());
    }

    #[test]
    fn test_seed_trips_parse() {
        let raw = r#"
            [[seed.trips]]
            title = "Jakarta - Bandung"
            origin = "Jakarta"
            destination = "Bandung"
            departs_at = "2026-03-02T07:30:00+07:00"
            price = 150000
            rows = 10
            seats_per_row = 4
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("config should parse");

        let trip = &config.seed.trips[0];
        assert_eq!(trip.bus_type, "STANDARD");
        assert_eq!(trip.price, 150_000);
        assert_eq!(trip.rows * trip.seats_per_row, 40);
        assert_eq!(trip.departs_at.to_rfc3339(), "2026-03-02T00:30:00+00:00");
    }
}
