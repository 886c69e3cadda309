use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::categories::DEFAULT_TRENDING_TOPICS;
use crate::error::{PulseError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PulseConfig {
    pub backend: BackendConfig,
    pub news: NewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub preferences_collection_id: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: String,
    pub latest_query: String,
    pub category_cap: usize,
    pub home_cap: usize,
    pub trending_page_size: u32,
    pub trending_topics: Vec<String>,
    pub max_concurrent_requests: usize,
    pub request_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            database_id: "newspulse".to_string(),
            preferences_collection_id: "preferences".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2/".to_string(),
            api_key: String::new(),
            latest_query: "international".to_string(),
            category_cap: 10,
            home_cap: 25,
            trending_page_size: 20,
            trending_topics: DEFAULT_TRENDING_TOPICS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            max_concurrent_requests: 4,
            request_timeout_seconds: 10,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl NewsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl PulseConfig {
    /// Default location: `<config dir>/newspulse/config.json`.
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PulseError::Config("no configuration directory available".into()))?;
        Ok(config_dir.join("newspulse").join("config.json"))
    }

    /// Defaults, then the JSON file if present, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_file_path()?, false),
        };
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<PulseConfig>(&content)?,
            // Only a missing default file falls back; an explicit path must exist.
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                return Err(PulseError::Config(format!("{}: {e}", path.display())));
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        debug!(
            backend = %config.backend.endpoint,
            news = %config.news.base_url,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Overlay values from the environment; `lookup` abstracts `std::env::var`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots: [(&str, &mut String); 6] = [
            ("NEWSPULSE_BACKEND_ENDPOINT", &mut self.backend.endpoint),
            ("NEWSPULSE_PROJECT_ID", &mut self.backend.project_id),
            ("NEWSPULSE_DATABASE_ID", &mut self.backend.database_id),
            (
                "NEWSPULSE_COLLECTION_ID",
                &mut self.backend.preferences_collection_id,
            ),
            ("NEWSPULSE_NEWS_URL", &mut self.news.base_url),
            ("NEWSPULSE_NEWS_API_KEY", &mut self.news.api_key),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("backend endpoint", &self.backend.endpoint),
            ("backend project id", &self.backend.project_id),
            ("database id", &self.backend.database_id),
            ("preferences collection id", &self.backend.preferences_collection_id),
            ("news base url", &self.news.base_url),
            ("news api key", &self.news.api_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PulseError::Config(format!("{name} is not set")));
            }
        }
        if self.news.category_cap == 0 || self.news.home_cap == 0 {
            return Err(PulseError::Config("article caps must be positive".into()));
        }
        if self.news.max_concurrent_requests == 0 {
            return Err(PulseError::Config(
                "max_concurrent_requests must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Writes the configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PulseError::Config(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(path, json)
            .map_err(|e| PulseError::Config(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}
