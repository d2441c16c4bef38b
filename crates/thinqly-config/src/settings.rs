// Runtime settings, merged from defaults, an optional TOML file, and
// `THINQLY_`-prefixed environment variables (highest precedence).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Address the HTTP front end binds to.
    pub listen_addr: SocketAddr,

    /// Path of the homes file (read/written whole).
    pub homes_file: PathBuf,

    /// Seconds between refresh cycles, measured from cycle end.
    pub refresh_interval_secs: u64,

    /// Per-request timeout for ThinQ calls, in seconds.
    pub http_timeout_secs: u64,

    /// When set, admin endpoints require this value in `x-admin-key`.
    pub admin_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 5000).into(),
            homes_file: "homes.json".into(),
            refresh_interval_secs: 180,
            http_timeout_secs: 12,
            admin_key: None,
        }
    }
}

impl Settings {
    /// Load from `thinqly.toml` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("thinqly.toml")
    }

    /// Load with an explicit TOML path. A missing file is fine; the
    /// defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("THINQLY_"))
            .extract()
            .map_err(Into::into)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_sources() {
        figment::Jail::expect_with(|_jail| {
            let settings = Settings::load_from("does-not-exist.toml").unwrap();
            assert_eq!(settings.refresh_interval_secs, 180);
            assert_eq!(settings.http_timeout_secs, 12);
            assert_eq!(settings.homes_file, PathBuf::from("homes.json"));
            assert!(settings.admin_key.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "thinqly.toml",
                r#"
                refresh_interval_secs = 60
                admin_key = "from-toml"
                "#,
            )?;
            jail.set_env("THINQLY_ADMIN_KEY", "from-env");

            let settings = Settings::load_from("thinqly.toml").unwrap();
            assert_eq!(settings.refresh_interval_secs, 60);
            assert_eq!(settings.admin_key.as_deref(), Some("from-env"));
            Ok(())
        });
    }
}
