//! Object storage client
//!
//! Blobs (inspection photos, signatures, ID documents) are PUT to a storage
//! gateway under a path and served back at a tokenized public URL.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a blob at `path` and return its retrievable URL
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<String>;
}

/// HTTP implementation talking to the storage gateway
#[derive(Clone)]
pub struct HttpObjectStorage {
    client: reqwest::Client,
    base_url: String,
    public_base_url: String,
}

impl HttpObjectStorage {
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build storage client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        let response = self
            .client
            .put(format!("{}/{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Storage gateway returned {}",
                response.status()
            )));
        }

        let token = Uuid::new_v4();
        Ok(format!(
            "{}/{}?alt=media&token={}",
            self.public_base_url, path, token
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn mock_storage_echoes_the_requested_path() {
        let mut mock = MockObjectStorage::new();
        mock.expect_upload()
            .returning(|path, _, _| Ok(format!("https://storage.test/{}", path)));

        let storage: Arc<dyn ObjectStorage> = Arc::new(mock);
        let url = storage
            .upload("inspections/RES-001/departure/front.jpg", Bytes::from_static(b"jpeg"), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "https://storage.test/inspections/RES-001/departure/front.jpg");
    }
}
