use serde::Deserialize;
use std::path::PathBuf;

/// Environment prefix for every setting, e.g. `DECK_DATA_DIR`.
pub const ENV_PREFIX: &str = "DECK_";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory the file-backed key/value store writes into
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Namespace for persisted keys (`{prefix}:prefs:v1`, `{prefix}:last_moods:v1`)
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_service_name")]
    pub service_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".deck-recommender")
}

fn default_key_prefix() -> String {
    "nuera".to_string()
}

fn default_service_name() -> String {
    "deck-recommender".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key_prefix: default_key_prefix(),
            log_format: LogFormat::default(),
            service_name: default_service_name(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();

        envy::prefixed(ENV_PREFIX).from_env::<Config>()
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }
}

/// Keys the two persisted stores live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub preferences: String,
    pub last_mood_signal: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            preferences: format!("{}:prefs:v1", prefix),
            last_mood_signal: format!("{}:last_moods:v1", prefix),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(&default_key_prefix())
    }
}
