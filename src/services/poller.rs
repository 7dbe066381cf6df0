use std::time::Duration;
use tokio::time::sleep;

use crate::models::job::{JobStatus, JobStatusResponse};
use crate::services::effects::EffectsError;
use crate::services::StudioBackend;

const DEFAULT_INTERVAL_MS: u64 = 2000;
const DEFAULT_MAX_ATTEMPTS: u32 = 60;
const GENERIC_FAILURE: &str = "Job processing failed";

/// Fixed-interval, bounded polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Poll a job until it reaches a terminal status or the attempt budget runs out.
///
/// `on_progress` is called with the 1-based attempt number after every
/// non-terminal response, before the interval sleep. No sleep follows the
/// final attempt.
pub async fn poll_until_done<B>(
    backend: &B,
    job_id: &str,
    policy: &PollPolicy,
    mut on_progress: impl FnMut(u32),
) -> Result<JobStatusResponse, PollError>
where
    B: StudioBackend + ?Sized,
{
    for attempt in 1..=policy.max_attempts {
        let response = backend.job_status(job_id).await?;
        metrics::counter!("effect_status_polls_total").increment(1);

        let status = response.job_status();
        tracing::debug!(job_id, attempt, status = %status, "Polled job status");

        if !status.is_terminal() {
            on_progress(attempt);
            if attempt < policy.max_attempts {
                sleep(policy.interval).await;
            }
            continue;
        }

        if status == JobStatus::Completed {
            return Ok(response);
        }

        let message = response
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        return Err(PollError::JobFailed(message));
    }

    Err(PollError::Timeout {
        attempts: policy.max_attempts,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    StatusCheck(#[from] EffectsError),

    #[error("{0}")]
    JobFailed(String),

    #[error("Job timed out after {attempts} polls")]
    Timeout { attempts: u32 },
}
