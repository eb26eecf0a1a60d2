use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable that overrides every platform directory.
pub const BASE_PATH_ENV: &str = "MFLIX_BASE_PATH";

/// Get the explicit base path from the environment, if set.
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var(BASE_PATH_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("mflix");

        Ok(Self::from_base(base_dir))
    }

    /// Config files at the base level, data and logs in subdirectories.
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Directory backing the durable client storage (one file per key).
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.log_dir.join("mflix.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.storage_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform-specific paths (e.g., ~/.config/mflix on Linux), falling back
        // to a local directory when the platform has none
        Self::new().unwrap_or_else(|_| Self::from_base(".mflix"))
    }
}
