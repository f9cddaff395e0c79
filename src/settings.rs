//! Process settings from the environment (`.env` supported).

use std::path::PathBuf;

use crate::error::AppError;

/// Environment variable naming the default endpoint configuration file.
pub const CONFIG_ENV: &str = "CARBON_CONFIG";
/// Environment variable naming the default log level.
pub const LOG_ENV: &str = "CARBON_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub config_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Settings {
    /// Read settings, loading a `.env` file first if one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            config_path: non_empty(CONFIG_ENV).map(PathBuf::from),
            log_level: non_empty(LOG_ENV),
        }
    }

    /// The configuration path to use: the explicit flag wins over the environment.
    pub fn resolve_config_path(&self, flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
        flag.or_else(|| self.config_path.clone()).ok_or_else(|| {
            AppError::input(format!(
                "No endpoint configuration given: pass --config or set {CONFIG_ENV}."
            ))
        })
    }
}
