//! Source factory for creating the catalog source from configuration
//!
//! Keeps source selection in one place so the presentation layer only ever
//! sees a `dyn CatalogSource`.

use anyhow::Result;
use mflix_config::{Config, SourceKind};
use std::time::Duration;
use crate::{CatalogSource, HttpCatalogSource, JsonFileSource};

pub struct SourceFactory;

impl SourceFactory {
    /// Create the configured source. Fails only on invalid configuration.
    pub fn create(config: &Config) -> Result<Box<dyn CatalogSource>> {
        let source = &config.source;
        match source.kind {
            SourceKind::Http => {
                if source.base_url.trim().is_empty() {
                    return Err(anyhow::anyhow!("source.base_url is not configured"));
                }
                let http = HttpCatalogSource::new(
                    &source.base_url,
                    &source.collection,
                    Duration::from_secs(source.timeout_secs),
                )?;
                Ok(Box::new(http))
            }
            SourceKind::File => {
                let path = source
                    .file
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("source.file is not configured"))?;
                Ok(Box::new(JsonFileSource::new(path)))
            }
        }
    }
}
