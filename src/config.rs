use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

pub const BASE_URL_VAR: &str = "TODO_API_BASE_URL";
pub const COLLECTION_VAR: &str = "TODO_API_COLLECTION";
pub const STORAGE_KEY_VAR: &str = "TASKBOARD_STORAGE_KEY";
pub const CACHE_DIR_VAR: &str = "TASKBOARD_CACHE_DIR";
pub const TIMEOUT_VAR: &str = "TASKBOARD_TIMEOUT_SECS";

/// Settings for the remote collection and the session cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub collection_path: String,
    pub storage_key: String,
    pub cache_dir: PathBuf,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            collection_path: "users/1/todos".to_string(),
            storage_key: "task-storage".to_string(),
            cache_dir: PathBuf::from(".taskboard"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads the configuration from the environment. The base URL is required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| BoardError::Config(format!("{} is not set", BASE_URL_VAR)))?;

        let mut config = Self::new(base_url);
        if let Some(path) = lookup(COLLECTION_VAR) {
            config.collection_path = path;
        }
        if let Some(key) = lookup(STORAGE_KEY_VAR) {
            config.storage_key = key;
        }
        if let Some(dir) = lookup(CACHE_DIR_VAR) {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                BoardError::Config(format!("{} must be a whole number of seconds", TIMEOUT_VAR))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Full URL of the task collection
    pub fn collection_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.collection_path.trim_matches('/')
        )
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
