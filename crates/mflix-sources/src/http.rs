use async_trait::async_trait;
use mflix_models::RawRecord;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use crate::error::SourceError;
use crate::payload::{record_from_item, records_from_collection};
use crate::traits::CatalogSource;

/// Catalog served over a Firebase-style REST API.
///
/// `GET {base_url}/{collection}.json` returns the whole collection and
/// `GET {base_url}/{collection}/{id}.json` a single record (`null` when absent).
#[derive(Clone)]
pub struct HttpCatalogSource {
    client: Client,
    base_url: String,
    collection: String,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str, collection: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self::with_client(client, base_url, collection))
    }

    pub fn with_client(client: Client, base_url: &str, collection: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.trim_matches('/').to_string(),
        }
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base_url, self.collection)
    }

    pub fn item_url(&self, id: &str) -> String {
        format!("{}/{}/{}.json", self.base_url, self.collection, urlencoding::encode(id))
    }

    /// GET a JSON document. `Ok(None)` on 404.
    async fn get_json(&self, url: &str) -> Result<Option<Value>, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} returned 404", url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.json::<Value>().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(Some(body))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn source_name(&self) -> &str {
        "http"
    }

    async fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError> {
        let url = self.collection_url();
        let start = std::time::Instant::now();
        let payload = self.get_json(&url).await?.unwrap_or(Value::Null);
        let records = records_from_collection(payload)?;
        info!("Fetched {} catalog records from {} in {:?}", records.len(), url, start.elapsed());
        Ok(records)
    }

    async fn fetch_one(&self, id: &str) -> Result<Option<RawRecord>, SourceError> {
        let url = self.item_url(id);
        match self.get_json(&url).await? {
            Some(payload) => record_from_item(payload, id),
            None => Ok(None),
        }
    }
}
