use async_trait::async_trait;
use mflix_models::RawRecord;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::error::SourceError;
use crate::payload::records_from_collection;
use crate::traits::CatalogSource;

/// Catalog read from a local JSON export.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileSource {
    fn source_name(&self) -> &str {
        "file"
    }

    async fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let payload: Value = serde_json::from_str(&content)
            .map_err(|e| SourceError::Payload(format!("{}: {}", self.path.display(), e)))?;
        let records = records_from_collection(payload)?;
        info!("Loaded {} catalog records from {:?}", records.len(), self.path);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_fetch_all_and_one() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"m1": {{"title": "Alpha"}}, "m2": {{"title": "Beta", "year": 2023}}}}"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let records = source.fetch_all().await.unwrap();
        assert_eq!(records.len(), 2);

        let beta = source.fetch_one("m2").await.unwrap().unwrap();
        assert_eq!(beta.text("title").as_deref(), Some("Beta"));
        assert!(source.fetch_one("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        assert!(matches!(source.fetch_all().await, Err(SourceError::Io { .. })));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let source = JsonFileSource::new(file.path());
        assert!(matches!(source.fetch_all().await, Err(SourceError::Payload(_))));
    }
}
