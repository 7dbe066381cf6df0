use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::models::job::{EffectSettings, JobRequest, JobStatusResponse, SubmittedJob};

const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// Client for the effects job API.
pub struct EffectsClient {
    http: Client,
    api_base_url: String,
    settings: EffectSettings,
}

impl EffectsClient {
    pub fn new(http: Client, api_base_url: &str, settings: EffectSettings) -> Self {
        Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.api_base_url, self.settings.mode.endpoint())
    }

    /// Submit a generation job for an uploaded asset.
    pub async fn submit_job(&self, asset_url: &str) -> Result<SubmittedJob, EffectsError> {
        let body = JobRequest::for_asset(&self.settings, asset_url);

        let response = self
            .http
            .post(self.endpoint())
            .header(ACCEPT, ACCEPT_JSON)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EffectsError::Submit(response.status().to_string()));
        }

        let job: SubmittedJob = response.json().await?;
        tracing::info!(
            job_id = %job.job_id,
            status = %job.status,
            mode = %self.settings.mode,
            "Job submitted"
        );
        Ok(job)
    }

    /// Fetch the current status of a job.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, EffectsError> {
        let url = format!("{}/{}/{}/status", self.endpoint(), self.settings.user_id, job_id);

        let response = self.http.get(&url).header(ACCEPT, ACCEPT_JSON).send().await?;

        if !response.status().is_success() {
            return Err(EffectsError::StatusCheck(response.status().to_string()));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EffectsError {
    #[error("Failed to submit job: {0}")]
    Submit(String),

    #[error("Failed to check status: {0}")]
    StatusCheck(String),

    #[error("Effects API request failed: {0}")]
    Http(#[from] reqwest::Error),
}
