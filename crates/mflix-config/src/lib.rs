pub mod config;
pub mod paths;

pub use config::{Config, DisplayConfig, LoggingConfig, NotificationConfig, PlaybackConfig, SourceConfig, SourceKind};
pub use paths::{PathManager, base_path_override};
