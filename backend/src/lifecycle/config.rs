//! Lifecycle configuration loaded via OrthoConfig.
//!
//! Values come from `COCKTAILS_*` environment variables, CLI flags or a
//! configuration file, in the usual OrthoConfig precedence.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Default snapshot root, relative to the working directory.
pub const DEFAULT_SNAPSHOTS_ROOT: &str = "Resources/snapshots";
/// File name of the default import file inside the cocktail directory.
pub const DEFAULT_IMPORT_FILE: &str = "cocktailsOutput.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings shared by the server and the operator commands.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COCKTAILS")]
pub struct LifecycleSettings {
    /// PostgreSQL connection string. Falls back to `DATABASE_URL`.
    pub database_url: Option<String>,
    /// Directory holding the per-family snapshot directories.
    pub snapshots_root: Option<PathBuf>,
    /// Import file used when the operator names none.
    pub import_path: Option<PathBuf>,
    /// HTTP listener address for the probes.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled database connections for the server.
    pub pool_max_size: Option<u32>,
    /// Seconds a connection checkout waits before failing.
    pub pool_checkout_timeout_secs: Option<u64>,
    /// Run the whole-store restore at startup.
    #[ortho_config(default = true)]
    pub restore_on_startup: bool,
    /// Run the cocktails-only bootstrap at startup.
    #[ortho_config(default = true)]
    pub cocktail_bootstrap_on_startup: bool,
}

impl LifecycleSettings {
    /// Configured database URL, or `DATABASE_URL` from the environment.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Snapshot root, defaulting to [`DEFAULT_SNAPSHOTS_ROOT`].
    pub fn snapshots_root(&self) -> PathBuf {
        self.snapshots_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOTS_ROOT))
    }

    /// Default import file, `{snapshots_root}/Cocktails/cocktailsOutput.json`
    /// unless overridden.
    pub fn import_path(&self) -> PathBuf {
        self.import_path.clone().unwrap_or_else(|| {
            self.snapshots_root()
                .join("Cocktails")
                .join(DEFAULT_IMPORT_FILE)
        })
    }

    /// Pool sizing for `database_url`, with unset values left at the pool
    /// defaults.
    pub fn pool_config(&self, database_url: impl Into<String>) -> PoolConfig {
        let mut config = PoolConfig::new(database_url);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(secs) = self.pool_checkout_timeout_secs {
            config = config.with_checkout_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// Parsed listener address.
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }
}

#[cfg(test)]
mod tests {
    //! Settings defaults and environment overrides.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 9] = [
        "COCKTAILS_DATABASE_URL",
        "COCKTAILS_SNAPSHOTS_ROOT",
        "COCKTAILS_IMPORT_PATH",
        "COCKTAILS_BIND_ADDR",
        "COCKTAILS_POOL_MAX_SIZE",
        "COCKTAILS_POOL_CHECKOUT_TIMEOUT_SECS",
        "COCKTAILS_RESTORE_ON_STARTUP",
        "COCKTAILS_COCKTAIL_BOOTSTRAP_ON_STARTUP",
        "DATABASE_URL",
    ];

    fn load() -> LifecycleSettings {
        LifecycleSettings::load_from_iter([OsString::from("cocktails")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.snapshots_root(), PathBuf::from("Resources/snapshots"));
        assert_eq!(
            settings.import_path(),
            PathBuf::from("Resources/snapshots/Cocktails/cocktailsOutput.json")
        );
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert!(settings.restore_on_startup);
        assert!(settings.cocktail_bootstrap_on_startup);
    }

    #[rstest]
    fn import_path_follows_the_snapshot_root() {
        let _guard = lock_env(VARS.map(|name| match name {
            "COCKTAILS_SNAPSHOTS_ROOT" => (name, Some("/srv/snapshots".to_owned())),
            _ => (name, None),
        }));

        let settings = load();

        assert_eq!(
            settings.import_path(),
            PathBuf::from("/srv/snapshots/Cocktails/cocktailsOutput.json")
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(VARS.map(|name| {
            let value = match name {
                "COCKTAILS_DATABASE_URL" => Some("postgres://db/cocktails"),
                "COCKTAILS_IMPORT_PATH" => Some("/tmp/import.json"),
                "COCKTAILS_BIND_ADDR" => Some("127.0.0.1:9000"),
                "COCKTAILS_RESTORE_ON_STARTUP" => Some("false"),
                _ => None,
            };
            (name, value.map(str::to_owned))
        }));

        let settings = load();

        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://db/cocktails")
        );
        assert_eq!(settings.import_path(), PathBuf::from("/tmp/import.json"));
        assert_eq!(
            settings.bind_addr().expect("override parses"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert!(!settings.restore_on_startup);
        assert!(settings.cocktail_bootstrap_on_startup);
    }

    #[rstest]
    fn pool_sizing_comes_from_the_environment() {
        let _guard = lock_env(VARS.map(|name| {
            let value = match name {
                "COCKTAILS_POOL_MAX_SIZE" => Some("3"),
                "COCKTAILS_POOL_CHECKOUT_TIMEOUT_SECS" => Some("5"),
                _ => None,
            };
            (name, value.map(str::to_owned))
        }));

        let config = load().pool_config("postgres://db/cocktails");

        assert_eq!(config.database_url(), "postgres://db/cocktails");
        assert_eq!(config.max_size(), 3);
        assert_eq!(config.checkout_timeout(), Duration::from_secs(5));
        assert_eq!(config.for_operator_command().max_size(), 1);
    }

    #[rstest]
    fn unset_pool_sizing_keeps_the_pool_defaults() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let config = load().pool_config("postgres://db/cocktails");

        assert_eq!(config, PoolConfig::new("postgres://db/cocktails"));
    }

    #[rstest]
    fn database_url_falls_back_to_the_conventional_variable() {
        let _guard = lock_env(VARS.map(|name| match name {
            "DATABASE_URL" => (name, Some("postgres://fallback/db".to_owned())),
            _ => (name, None),
        }));

        assert_eq!(
            load().database_url().as_deref(),
            Some("postgres://fallback/db")
        );
    }
}
