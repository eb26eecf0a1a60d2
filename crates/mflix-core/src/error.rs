use std::path::PathBuf;

/// The only input the normalizer refuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("record has no usable identifier")]
    MissingIdentifier,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage quota exceeded writing {key}: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { key: String, needed: usize, limit: usize },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
