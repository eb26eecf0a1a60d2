use async_trait::async_trait;
use mflix_models::RawRecord;
use crate::error::SourceError;

/// Upstream provider of raw catalog records.
///
/// Implementations only move bytes and shape them into records; they never
/// normalize. Callers in the core turn every error into an empty or absent
/// result.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    // Source metadata
    fn source_name(&self) -> &str;

    /// Every record in upstream order.
    async fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError>;

    /// A single record by identifier.
    ///
    /// The default scans `fetch_all`; sources with a per-item endpoint override it.
    async fn fetch_one(&self, id: &str) -> Result<Option<RawRecord>, SourceError> {
        let records = self.fetch_all().await?;
        Ok(records
            .into_iter()
            .find(|record| record.identifier().as_deref() == Some(id)))
    }
}
