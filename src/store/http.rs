//! Fetches objects over HTTP from the public database.

use tracing::debug;

use super::{ObjectKey, ObjectStore};
use crate::error::{EngineError, Result};

pub const DEFAULT_BASE_URL: &str =
    "https://filedn.com/l31Uxc2iCI1koQr1EKWjwQH/Research/rs-app-database/";

#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        HttpStore {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn url(&self, key: &ObjectKey) -> String {
        format!("{}{}", self.base_url, key.path())
    }
}

impl Default for HttpStore {
    fn default() -> Self {
        HttpStore::new(DEFAULT_BASE_URL)
    }
}

impl ObjectStore for HttpStore {
    async fn fetch(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        let url = self.url(key);
        let path = key.path();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::fetch(&path, e))?;

        if !response.status().is_success() {
            return Err(EngineError::fetch(&path, response.status()));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| EngineError::fetch(&path, e))?;
        debug!(key = %path, bytes = content.len(), "Fetched object");

        Ok(content.to_vec())
    }
}

// -- Tests -------------------------------------------------------------------
