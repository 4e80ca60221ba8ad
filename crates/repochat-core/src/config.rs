use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub index: IndexSettings,
    pub watch: WatchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Minimum interval between chat-triggered re-index calls per root.
    pub reindex_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    /// File extensions the backend indexes; new files outside this set are
    /// not worth notifying it about.
    pub extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendSettings {
                base_url: crate::backend::DEFAULT_BASE_URL.to_string(),
            },
            index: IndexSettings {
                reindex_interval_secs: 60,
            },
            watch: WatchSettings {
                extensions: [
                    "py", "js", "ts", "java", "cpp", "cs", "txt", "md", "ipynb", "rs", "go",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            },
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("repochat")
            .join("config.toml")
    }

    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&config_path) {
                if let Ok(settings) = toml::from_str(&content) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> crate::error::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RepochatError::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}
