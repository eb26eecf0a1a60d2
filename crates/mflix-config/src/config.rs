use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the catalog comes from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Firebase-style REST endpoint: `{base_url}/{collection}.json`
    Http,
    /// Local JSON export (array or id-keyed object of records)
    File,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Display caps for derived views. These are presentation policy, not data
/// invariants, which is why they live in configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_rail_limit")]
    pub rail_limit: usize,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default = "default_search_min_chars")]
    pub search_min_chars: usize,
    #[serde(default = "default_featured_limit")]
    pub featured_limit: usize,
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotificationConfig {
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaybackConfig {
    #[serde(default = "default_save_debounce_secs")]
    pub save_debounce_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    pub file: Option<PathBuf>,
}

fn default_source_kind() -> SourceKind {
    SourceKind::Http
}

fn default_collection() -> String {
    "movies".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_rail_limit() -> usize {
    15
}

fn default_search_limit() -> usize {
    18
}

fn default_search_min_chars() -> usize {
    2
}

fn default_featured_limit() -> usize {
    8
}

fn default_related_limit() -> usize {
    12
}

fn default_max_visible() -> usize {
    3
}

fn default_dismiss_after_ms() -> u64 {
    3200
}

fn default_save_debounce_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    false
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            base_url: String::new(),
            collection: default_collection(),
            file: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rail_limit: default_rail_limit(),
            search_limit: default_search_limit(),
            search_min_chars: default_search_min_chars(),
            featured_limit: default_featured_limit(),
            related_limit: default_related_limit(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            save_debounce_secs: default_save_debounce_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.source.kind {
            SourceKind::Http => {
                if self.source.base_url.trim().is_empty() {
                    return Err(anyhow::anyhow!("source.base_url is required for an http source"));
                }
                if !self.source.base_url.starts_with("http") {
                    return Err(anyhow::anyhow!("source.base_url must be an http(s) URL: {}", self.source.base_url));
                }
                if self.source.collection.trim().is_empty() {
                    return Err(anyhow::anyhow!("source.collection cannot be empty"));
                }
            }
            SourceKind::File => {
                if self.source.file.is_none() {
                    return Err(anyhow::anyhow!("source.file is required for a file source"));
                }
            }
        }

        let limits = [
            ("display.rail_limit", self.display.rail_limit),
            ("display.search_limit", self.display.search_limit),
            ("display.featured_limit", self.display.featured_limit),
            ("display.related_limit", self.display.related_limit),
            ("notifications.max_visible", self.notifications.max_visible),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(anyhow::anyhow!("{} must be greater than zero", name));
            }
        }

        if self.display.search_min_chars < 2 {
            return Err(anyhow::anyhow!(
                "display.search_min_chars must be at least 2 (got {})",
                self.display.search_min_chars
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.source.base_url = "https://example.firebaseio.com".to_string();
        config.display.rail_limit = 20;
        config.notifications.dismiss_after_ms = 1500;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert!(!loaded.logging.json);
        assert_eq!(loaded.source.base_url, "https://example.firebaseio.com");
        assert_eq!(loaded.source.kind, SourceKind::Http);
        assert_eq!(loaded.display.rail_limit, 20);
        assert_eq!(loaded.display.search_limit, 18);
        assert_eq!(loaded.notifications.dismiss_after_ms, 1500);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            kind = "file"
            file = "catalog.json"

            [display]
            search_limit = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.collection, "movies");
        assert_eq!(config.display.search_limit, 5);
        assert_eq!(config.display.rail_limit, 15);
        assert_eq!(config.display.featured_limit, 8);
        assert_eq!(config.notifications.max_visible, 3);
        assert_eq!(config.playback.save_debounce_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.display.rail_limit, 15);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err(), "http source without base_url");

        config.source.base_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        config.source.base_url = "https://example.firebaseio.com".to_string();
        assert!(config.validate().is_ok());

        config.display.rail_limit = 0;
        assert!(config.validate().is_err());

        config.display.rail_limit = 15;
        for search_min_chars in [0, 1] {
            config.display.search_min_chars = search_min_chars;
            assert!(config.validate().is_err(), "search_min_chars {}", search_min_chars);
        }
        config.display.search_min_chars = 3;
        assert!(config.validate().is_ok());

        config.source.kind = SourceKind::File;
        assert!(config.validate().is_err(), "file source without path");
    }
}
