/// HTTP client for the JSON document store
///
/// Wire contract, per resource kind:
/// - `GET  {base}/{kind}.json`       → map of generated key → record,
///   or JSON null when the collection is empty
/// - `POST {base}/{kind}.json`       → `{"name": "<generated key>"}`
/// - `PUT  {base}/{kind}/{id}.json`  → full replacement (also upsert)
/// - `DELETE {base}/{kind}/{id}.json`
///
/// Failures surface as `StoreError`; nothing here retries or queues. A
/// lost write stays lost until the user repeats the action.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection-level failure or an unreadable response
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The store answered, but not with success
    #[error("store returned HTTP {0}")]
    Status(reqwest::StatusCode),
    /// The response body did not match the expected record shape
    #[error("store response did not match its kind: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Key assigned by the store for a newly created record
#[derive(Debug, Deserialize)]
struct CreatedKey {
    name: String,
}

#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self, kind: &str) -> String {
        format!("{}/{}.json", self.base_url, kind)
    }

    fn record_url(&self, kind: &str, id: &str) -> String {
        format!("{}/{}/{}.json", self.base_url, kind, id)
    }

    /// Fetch every record of a kind; an empty store is an empty map
    pub async fn list<T: DeserializeOwned>(
        &self,
        kind: &str,
    ) -> Result<BTreeMap<String, T>, StoreError> {
        debug!(kind, "listing records");
        let response = self.http.get(self.collection_url(kind)).send().await?;
        let body: serde_json::Value = check(response)?.json().await?;
        Ok(listing_from_value(body)?)
    }

    /// Create a record; the store assigns and returns its key
    pub async fn create<T: Serialize>(&self, kind: &str, body: &T) -> Result<String, StoreError> {
        debug!(kind, "creating record");
        let response = self
            .http
            .post(self.collection_url(kind))
            .json(body)
            .send()
            .await?;
        let created: CreatedKey = check(response)?.json().await?;
        Ok(created.name)
    }

    /// Fully replace the record at an id (creates it if absent)
    pub async fn update<T: Serialize>(
        &self,
        kind: &str,
        id: &str,
        body: &T,
    ) -> Result<(), StoreError> {
        debug!(kind, id, "updating record");
        let response = self
            .http
            .put(self.record_url(kind, id))
            .json(body)
            .send()
            .await?;
        check(response)?;
        Ok(())
    }

    /// Remove the record at an id permanently
    pub async fn delete(&self, kind: &str, id: &str) -> Result<(), StoreError> {
        debug!(kind, id, "deleting record");
        let response = self.http.delete(self.record_url(kind, id)).send().await?;
        check(response)?;
        Ok(())
    }
}

fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(StoreError::Status(response.status()))
    }
}

/// Decode a listing body, treating JSON null as "no data yet"
fn listing_from_value<T: DeserializeOwned>(
    value: serde_json::Value,
) -> Result<BTreeMap<String, T>, serde_json::Error> {
    let listing: Option<BTreeMap<String, T>> = serde_json::from_value(value)?;
    Ok(listing.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::PhotoRecord;
    use serde_json::json;

    #[test]
    fn urls_follow_the_store_layout() {
        let client = StoreClient::new("https://store.example.app/");
        assert_eq!(
            client.collection_url("photos"),
            "https://store.example.app/photos.json"
        );
        assert_eq!(
            client.record_url("documents", "-Nabc123"),
            "https://store.example.app/documents/-Nabc123.json"
        );
    }

    #[test]
    fn null_listing_is_empty() {
        let listing: BTreeMap<String, PhotoRecord> =
            listing_from_value(serde_json::Value::Null).unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn listing_keeps_store_keys() {
        let body = json!({
            "-Na": {
                "fileName": "a.png",
                "imageUrl": "data:image/png;base64,AAAA",
                "note": "",
                "uploadedAt": "2025-06-01T09:00:00Z"
            },
            "-Nb": {
                "fileName": "b.png",
                "imageUrl": "data:image/png;base64,BBBB",
                "uploadedAt": "2025-06-02T09:00:00Z"
            }
        });

        let listing: BTreeMap<String, PhotoRecord> = listing_from_value(body).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing["-Nb"].file_name, "b.png");
        // A record written without a note deserializes with an empty one
        assert_eq!(listing["-Nb"].note, "");
    }

    #[test]
    fn created_key_comes_from_the_name_field() {
        let created: CreatedKey = serde_json::from_value(json!({"name": "-Nxyz789"})).unwrap();
        assert_eq!(created.name, "-Nxyz789");
    }
}
