use std::path::Path;

use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

/// Environment variable prefix; nested keys use `__`, e.g. `QUAKE_MCC_SIMULATION__SEED`.
pub const ENV_PREFIX: &str = "QUAKE_MCC_";

pub struct ConfigLoader;

impl ConfigLoader {
    fn base(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(path))
    }

    /// Loads configuration by merging defaults, a TOML file and environment variables.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment values cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::base(path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Loads configuration with a profile overlay, `Config.<profile>.toml` next to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        let path = path.as_ref();
        let overlay = path.with_file_name(format!("Config.{profile}.toml"));
        let config: AppConfig = Self::base(path)
            .merge(Toml::file(&overlay))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| {
                format!(
                    "Failed to load config from {} with profile {profile}",
                    path.display()
                )
            })?;

        Ok(config)
    }
}
