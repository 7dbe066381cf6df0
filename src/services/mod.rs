pub mod effects;
pub mod media;
pub mod poller;
pub mod storage;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::job::{JobStatusResponse, SubmittedJob};
use effects::{EffectsClient, EffectsError};
use media::{FetchedMedia, MediaError};
use storage::{StorageError, UploadStorage};

/// Remote calls the workflow controller depends on.
#[async_trait]
pub trait StudioBackend: Send + Sync {
    /// Pre-signed upload location for `file_name`.
    async fn request_upload_url(&self, file_name: &str) -> Result<String, StorageError>;

    /// Binary transfer to a signed location.
    async fn put_object(
        &self,
        signed_url: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Public URL an uploaded object is served from.
    fn public_url(&self, file_name: &str) -> String;

    async fn submit_job(&self, asset_url: &str) -> Result<SubmittedJob, EffectsError>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, EffectsError>;

    /// Fetch a result for download.
    async fn fetch_media(&self, url: &str) -> Result<FetchedMedia, MediaError>;
}

#[async_trait]
impl<T: StudioBackend + ?Sized> StudioBackend for Arc<T> {
    async fn request_upload_url(&self, file_name: &str) -> Result<String, StorageError> {
        (**self).request_upload_url(file_name).await
    }

    async fn put_object(
        &self,
        signed_url: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        (**self).put_object(signed_url, data, content_type).await
    }

    fn public_url(&self, file_name: &str) -> String {
        (**self).public_url(file_name)
    }

    async fn submit_job(&self, asset_url: &str) -> Result<SubmittedJob, EffectsError> {
        (**self).submit_job(asset_url).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, EffectsError> {
        (**self).job_status(job_id).await
    }

    async fn fetch_media(&self, url: &str) -> Result<FetchedMedia, MediaError> {
        (**self).fetch_media(url).await
    }
}

/// HTTP implementation over one shared `reqwest` client.
pub struct HttpStudio {
    http: Client,
    storage: UploadStorage,
    effects: EffectsClient,
}

impl HttpStudio {
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("effect-studio/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            storage: UploadStorage::new(
                http.clone(),
                &config.api_base_url,
                &config.content_base_url,
            ),
            effects: EffectsClient::new(
                http.clone(),
                &config.api_base_url,
                config.effect_settings(),
            ),
            http,
        })
    }
}

#[async_trait]
impl StudioBackend for HttpStudio {
    async fn request_upload_url(&self, file_name: &str) -> Result<String, StorageError> {
        self.storage.signed_upload_url(file_name).await
    }

    async fn put_object(
        &self,
        signed_url: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.storage.put_object(signed_url, data, content_type).await
    }

    fn public_url(&self, file_name: &str) -> String {
        self.storage.public_url(file_name)
    }

    async fn submit_job(&self, asset_url: &str) -> Result<SubmittedJob, EffectsError> {
        self.effects.submit_job(asset_url).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, EffectsError> {
        self.effects.job_status(job_id).await
    }

    async fn fetch_media(&self, url: &str) -> Result<FetchedMedia, MediaError> {
        let response = self.http.get(media::cache_busted(url)).send().await?;

        if !response.status().is_success() {
            return Err(MediaError::Status(response.status().to_string()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedMedia {
            content_type,
            bytes,
        })
    }
}
