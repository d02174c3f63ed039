//! Server settings and the runtime configuration built from them.

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use workbench_backend::domain::DEFAULT_RESET_CODE_TTL_MINUTES;
use workbench_backend::inbound::http::token_key::TokenSigningKey;
use workbench_backend::outbound::persistence::DbPool;
use workbench_backend::outbound::security::{DEFAULT_BCRYPT_COST, DEFAULT_TOKEN_TTL_HOURS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings read from `WORKBENCH_*` variables, config files and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WORKBENCH")]
pub struct ServerSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory storage is used when absent.
    pub database_url: Option<String>,
    pub token_ttl_hours: Option<i64>,
    pub reset_code_ttl_minutes: Option<i64>,
    pub bcrypt_cost: Option<u32>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = false)]
    pub migrate_on_start: bool,
}

/// Errors raised while interpreting [`ServerSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: i64 },
    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    BcryptCost(u32),
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        positive("token_ttl_hours", hours).map(Duration::hours)
    }

    pub fn reset_code_ttl(&self) -> Result<Duration, SettingsError> {
        let minutes = self
            .reset_code_ttl_minutes
            .unwrap_or(DEFAULT_RESET_CODE_TTL_MINUTES);
        positive("reset_code_ttl_minutes", minutes).map(Duration::minutes)
    }

    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST);
        if (4..=31).contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::BcryptCost(cost))
        }
    }
}

fn positive(name: &'static str, value: i64) -> Result<i64, SettingsError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(SettingsError::NotPositive { name, value })
    }
}

/// Everything `create_server` needs, resolved and validated.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_key: TokenSigningKey,
    pub(crate) token_ttl: Duration,
    pub(crate) reset_code_ttl: Duration,
    pub(crate) bcrypt_cost: u32,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Resolve settings into a server configuration.
    pub fn from_settings(
        settings: &ServerSettings,
        token_key: TokenSigningKey,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            token_key,
            token_ttl: settings.token_ttl()?,
            reset_code_ttl: settings.reset_code_ttl()?,
            bcrypt_cost: settings.bcrypt_cost()?,
            db_pool: None,
        })
    }

    /// Attach a database connection pool; every repository then uses Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "WORKBENCH_BIND_ADDR",
        "WORKBENCH_DATABASE_URL",
        "WORKBENCH_TOKEN_TTL_HOURS",
        "WORKBENCH_RESET_CODE_TTL_MINUTES",
        "WORKBENCH_BCRYPT_COST",
        "WORKBENCH_MIGRATE_ON_START",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("workbench-backend")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("default addr")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(
            settings.token_ttl().expect("ttl"),
            Duration::hours(DEFAULT_TOKEN_TTL_HOURS)
        );
        assert_eq!(
            settings.reset_code_ttl().expect("ttl"),
            Duration::minutes(DEFAULT_RESET_CODE_TTL_MINUTES)
        );
        assert_eq!(settings.bcrypt_cost().expect("cost"), DEFAULT_BCRYPT_COST);
        assert!(!settings.migrate_on_start);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("WORKBENCH_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "WORKBENCH_DATABASE_URL",
                Some("postgres://localhost/workbench".to_owned()),
            ),
            ("WORKBENCH_TOKEN_TTL_HOURS", Some("2".to_owned())),
            ("WORKBENCH_RESET_CODE_TTL_MINUTES", Some("15".to_owned())),
            ("WORKBENCH_BCRYPT_COST", Some("6".to_owned())),
            ("WORKBENCH_MIGRATE_ON_START", Some("true".to_owned())),
        ]);

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/workbench")
        );
        assert_eq!(settings.token_ttl().expect("ttl"), Duration::hours(2));
        assert_eq!(settings.reset_code_ttl().expect("ttl"), Duration::minutes(15));
        assert_eq!(settings.bcrypt_cost().expect("cost"), 6);
        assert!(settings.migrate_on_start);
    }

    fn settings() -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            database_url: None,
            token_ttl_hours: None,
            reset_code_ttl_minutes: None,
            bcrypt_cost: None,
            migrate_on_start: false,
        }
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let settings = ServerSettings {
            database_url: Some("   ".to_owned()),
            ..settings()
        };
        assert_eq!(settings.database_url(), None);
    }

    #[rstest]
    fn malformed_bind_addr_is_rejected() {
        let settings = ServerSettings {
            bind_addr: Some("localhost".to_owned()),
            ..settings()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    #[case(Some(0), None, "token_ttl_hours")]
    #[case(None, Some(-5), "reset_code_ttl_minutes")]
    fn non_positive_lifetimes_are_rejected(
        #[case] token_hours: Option<i64>,
        #[case] reset_minutes: Option<i64>,
        #[case] expected: &str,
    ) {
        let settings = ServerSettings {
            token_ttl_hours: token_hours,
            reset_code_ttl_minutes: reset_minutes,
            ..settings()
        };
        let err = settings
            .token_ttl()
            .and_then(|_| settings.reset_code_ttl())
            .expect_err("rejected");
        assert!(matches!(err, SettingsError::NotPositive { name, .. } if name == expected));
    }

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn bcrypt_cost_outside_supported_range_is_rejected(#[case] cost: u32) {
        let settings = ServerSettings {
            bcrypt_cost: Some(cost),
            ..settings()
        };
        assert!(matches!(
            settings.bcrypt_cost(),
            Err(SettingsError::BcryptCost(value)) if value == cost
        ));
    }
}
