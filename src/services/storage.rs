use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Client for the upload bucket: signed-URL issuer plus direct binary PUT.
pub struct UploadStorage {
    http: Client,
    api_base_url: String,
    content_base_url: String,
}

impl UploadStorage {
    pub fn new(http: Client, api_base_url: &str, content_base_url: &str) -> Self {
        Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            content_base_url: content_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the API for a pre-signed upload location for `file_name`.
    pub async fn signed_upload_url(&self, file_name: &str) -> Result<String, StorageError> {
        let url = format!("{}/get-emd-upload-url", self.api_base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("fileName", file_name)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::SignedUrl(response.status().to_string()));
        }

        let signed = response.text().await?;
        tracing::debug!(file_name, "Got signed upload URL");
        Ok(signed.trim().to_string())
    }

    /// PUT the file bytes to a signed location.
    pub async fn put_object(
        &self,
        signed_url: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = data.len();
        let response = self
            .http
            .put(signed_url)
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Transfer(response.status().to_string()));
        }

        tracing::debug!(size, content_type, "Object uploaded");
        Ok(())
    }

    /// Public URL of an uploaded object. Derived by convention, never
    /// returned by the server.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.content_base_url, file_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to get signed URL: {0}")]
    SignedUrl(String),

    #[error("Failed to upload file: {0}")]
    Transfer(String),

    #[error("Upload request failed: {0}")]
    Http(#[from] reqwest::Error),
}
