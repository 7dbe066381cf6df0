use crate::services::effects::EffectsError;
use crate::services::poller::PollError;
use crate::services::storage::StorageError;

/// Errors surfaced to the user by the generation workflow. Each one ends the
/// current attempt and leaves the session recoverable.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Please upload a valid image file.")]
    InvalidInputKind { content_type: String },

    #[error("{0}")]
    UploadFailed(String),

    #[error("{0}")]
    SubmissionFailed(String),

    #[error("{0}")]
    StatusCheckFailed(String),

    #[error("{0}")]
    JobFailed(String),

    #[error("Job timed out after {attempts} polls")]
    JobTimeout { attempts: u32 },

    #[error("No image URL in response")]
    MissingResultUrl,

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("A generation step is already in progress")]
    Busy,
}

impl From<StorageError> for WorkflowError {
    fn from(e: StorageError) -> Self {
        Self::UploadFailed(e.to_string())
    }
}

impl From<EffectsError> for WorkflowError {
    fn from(e: EffectsError) -> Self {
        match e {
            EffectsError::StatusCheck(_) => Self::StatusCheckFailed(e.to_string()),
            _ => Self::SubmissionFailed(e.to_string()),
        }
    }
}

impl From<PollError> for WorkflowError {
    fn from(e: PollError) -> Self {
        match e {
            PollError::StatusCheck(inner) => Self::StatusCheckFailed(inner.to_string()),
            PollError::JobFailed(message) => Self::JobFailed(message),
            PollError::Timeout { attempts } => Self::JobTimeout { attempts },
        }
    }
}
