//! Application-level configuration loading, including the score bounds.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CYBEROSCOPE_CONFIG_PATH";
/// Environment variables holding the MongoDB connection string, in lookup order.
pub const MONGO_URI_VARS: [&str; 2] = ["MONGODB_URI", "MONGO_URI"];
/// Highest score a team can reach through increments.
pub const DEFAULT_MAX_SCORE: i64 = 240;
/// Score given to freshly registered teams.
pub const DEFAULT_INITIAL_SCORE: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    max_score: i64,
    initial_score: i64,
}

impl AppConfig {
    /// Build a configuration from explicit values.
    ///
    /// Returns `None` when `initial_score` exceeds `max_score`.
    pub fn new(max_score: i64, initial_score: i64) -> Option<Self> {
        (initial_score <= max_score).then_some(Self {
            max_score,
            initial_score,
        })
    }

    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => match Self::try_from(raw) {
                    Ok(app_config) => {
                        info!(
                            path = %path.display(),
                            max_score = app_config.max_score,
                            initial_score = app_config.initial_score,
                            "loaded score settings from config"
                        );
                        app_config
                    }
                    Err(raw) => {
                        warn!(
                            path = %path.display(),
                            max_score = raw.max_score,
                            initial_score = raw.initial_score,
                            "initial score exceeds max score; falling back to defaults"
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Upper bound enforced on score increments.
    pub fn max_score(&self) -> i64 {
        self.max_score
    }

    /// Score assigned to newly created teams.
    pub fn initial_score(&self) -> i64 {
        self.initial_score
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_score: DEFAULT_MAX_SCORE,
            initial_score: DEFAULT_INITIAL_SCORE,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default = "default_max_score")]
    max_score: i64,
    #[serde(default = "default_initial_score")]
    initial_score: i64,
}

fn default_max_score() -> i64 {
    DEFAULT_MAX_SCORE
}

fn default_initial_score() -> i64 {
    DEFAULT_INITIAL_SCORE
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = RawConfig;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        Self::new(value.max_score, value.initial_score).ok_or(value)
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// MongoDB connection string from `MONGODB_URI`, falling back to `MONGO_URI`.
///
/// Blank values count as unset.
pub fn mongo_uri_from_env() -> Option<String> {
    first_mongo_uri(|var| env::var(var).ok())
}

fn first_mongo_uri(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    MONGO_URI_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}
