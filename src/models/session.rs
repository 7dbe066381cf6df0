use serde::Serialize;
use std::fmt;

use crate::services::media::MediaKind;

/// Text of the generate trigger. It doubles as the workflow status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StatusText {
    Idle,
    Uploading,
    Ready,
    Submitting,
    Queued,
    Processing(u32),
    Complete,
    Error,
}

impl fmt::Display for StatusText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Generate"),
            Self::Uploading => f.write_str("UPLOADING..."),
            Self::Ready => f.write_str("Generate Effect"),
            Self::Submitting => f.write_str("SUBMITTING JOB..."),
            Self::Queued => f.write_str("JOB QUEUED..."),
            Self::Processing(attempt) => write!(f, "PROCESSING... ({attempt})"),
            Self::Complete => f.write_str("Generate Again"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// A finished generation, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultMedia {
    pub url: String,
    pub kind: MediaKind,
}

impl ResultMedia {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = MediaKind::from_url(&url);
        Self { url, kind }
    }
}

/// Workflow state machine:
/// `Idle → Uploading → Uploaded → Submitting → Polling → Completed | Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Uploading,
    Uploaded,
    Submitting,
    Polling { attempt: u32 },
    Completed { result: ResultMedia },
    Failed { message: String },
}

impl WorkflowPhase {
    /// A remote step is in flight and the trigger must stay disabled.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Uploading | Self::Submitting | Self::Polling { .. })
    }
}

/// Everything the UI shows. Always derived from [`Session`], never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub loading: bool,
    pub status: StatusText,
    pub result: Option<ResultMedia>,
    pub error: Option<String>,
    pub download_url: Option<String>,
    pub trigger_enabled: bool,
}

/// Per-controller session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    uploaded_asset_url: Option<String>,
    phase: WorkflowPhase,
}

impl Session {
    pub fn uploaded_asset_url(&self) -> Option<&str> {
        self.uploaded_asset_url.as_deref()
    }

    pub fn phase(&self) -> &WorkflowPhase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_in_flight()
    }

    pub fn begin_upload(&mut self) {
        self.uploaded_asset_url = None;
        self.phase = WorkflowPhase::Uploading;
    }

    pub fn finish_upload(&mut self, asset_url: String) {
        self.uploaded_asset_url = Some(asset_url);
        self.phase = WorkflowPhase::Uploaded;
    }

    pub fn begin_submit(&mut self) {
        self.phase = WorkflowPhase::Submitting;
    }

    pub fn set_polling(&mut self, attempt: u32) {
        self.phase = WorkflowPhase::Polling { attempt };
    }

    pub fn complete(&mut self, result: ResultMedia) {
        self.phase = WorkflowPhase::Completed { result };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = WorkflowPhase::Failed {
            message: message.into(),
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn presentation(&self) -> Presentation {
        let (loading, status, result, error) = match &self.phase {
            WorkflowPhase::Idle => (false, StatusText::Idle, None, None),
            WorkflowPhase::Uploading => (false, StatusText::Uploading, None, None),
            WorkflowPhase::Uploaded => (false, StatusText::Ready, None, None),
            WorkflowPhase::Submitting => (true, StatusText::Submitting, None, None),
            WorkflowPhase::Polling { attempt: 0 } => (true, StatusText::Queued, None, None),
            WorkflowPhase::Polling { attempt } => {
                (true, StatusText::Processing(*attempt), None, None)
            }
            WorkflowPhase::Completed { result } => {
                (false, StatusText::Complete, Some(result.clone()), None)
            }
            WorkflowPhase::Failed { message } => {
                (false, StatusText::Error, None, Some(message.clone()))
            }
        };

        Presentation {
            loading,
            status,
            download_url: result.as_ref().map(|r| r.url.clone()),
            result,
            error,
            trigger_enabled: !self.is_busy() && self.uploaded_asset_url.is_some(),
        }
    }
}
