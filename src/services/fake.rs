//! In-memory backend used by unit tests.

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

use super::effects::EffectsError;
use super::media::{FetchedMedia, MediaError};
use super::storage::StorageError;
use super::StudioBackend;
use crate::models::job::{JobStatusResponse, SubmittedJob};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UploadUrl(String),
    Put { content_type: String, size: usize },
    Submit(String),
    Status(String),
    Fetch(String),
}

pub struct ScriptedBackend {
    pub statuses: Mutex<VecDeque<Result<JobStatusResponse, String>>>,
    pub calls: Mutex<Vec<Call>>,
    pub poll_times: Mutex<Vec<Instant>>,
    pub fail_signed_url: bool,
    pub fail_put: bool,
    pub fail_submit: bool,
    pub media: Option<FetchedMedia>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            poll_times: Mutex::new(Vec::new()),
            fail_signed_url: false,
            fail_put: false,
            fail_submit: false,
            media: None,
        }
    }
}

impl ScriptedBackend {
    pub fn with_statuses(statuses: Vec<JobStatusResponse>) -> Self {
        let backend = Self::default();
        backend
            .statuses
            .lock()
            .unwrap()
            .extend(statuses.into_iter().map(Ok));
        backend
    }

    /// Queue a non-success HTTP status for the next poll.
    pub fn push_status_error(&self, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Err(status.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Status(_)))
            .count()
    }

    pub fn poll_times(&self) -> Vec<Instant> {
        self.poll_times.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn status(status: &str) -> JobStatusResponse {
    JobStatusResponse {
        status: status.to_string(),
        result: None,
        error: None,
    }
}

pub fn completed_with_image(url: &str) -> JobStatusResponse {
    JobStatusResponse {
        status: "completed".to_string(),
        result: Some(json!({ "image": url })),
        error: None,
    }
}

#[async_trait]
impl StudioBackend for ScriptedBackend {
    async fn request_upload_url(&self, file_name: &str) -> Result<String, StorageError> {
        self.record(Call::UploadUrl(file_name.to_string()));
        if self.fail_signed_url {
            return Err(StorageError::SignedUrl("500 Internal Server Error".to_string()));
        }
        Ok(format!("https://signed.test/{file_name}?sig=abc"))
    }

    async fn put_object(
        &self,
        _signed_url: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.record(Call::Put {
            content_type: content_type.to_string(),
            size: data.len(),
        });
        if self.fail_put {
            return Err(StorageError::Transfer("403 Forbidden".to_string()));
        }
        Ok(())
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("https://cdn.test/{file_name}")
    }

    async fn submit_job(&self, asset_url: &str) -> Result<SubmittedJob, EffectsError> {
        self.record(Call::Submit(asset_url.to_string()));
        if self.fail_submit {
            return Err(EffectsError::Submit("400 Bad Request".to_string()));
        }
        Ok(SubmittedJob {
            job_id: "job-1".to_string(),
            status: "queued".to_string(),
        })
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, EffectsError> {
        self.record(Call::Status(job_id.to_string()));
        self.poll_times.lock().unwrap().push(Instant::now());
        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(http_status)) => Err(EffectsError::StatusCheck(http_status)),
            None => Ok(status("processing")),
        }
    }

    async fn fetch_media(&self, url: &str) -> Result<FetchedMedia, MediaError> {
        self.record(Call::Fetch(url.to_string()));
        self.media
            .clone()
            .ok_or_else(|| MediaError::Status("404 Not Found".to_string()))
    }
}
