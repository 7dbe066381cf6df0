use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use strum::{Display, EnumString};

/// Which effects pipeline a job is submitted to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GenerationMode {
    #[default]
    ImageEffects,
    VideoEffects,
}

impl GenerationMode {
    /// Path segment of the submission and status endpoints.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::ImageEffects => "image-gen",
            Self::VideoEffects => "video-gen",
        }
    }
}

/// Static job parameters. None of these come from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSettings {
    pub mode: GenerationMode,
    pub user_id: String,
    pub effect_id: String,
    pub tool_type: String,
}

/// Body posted to `image-gen`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageJobRequest {
    pub model: GenerationMode,
    pub tool_type: String,
    pub effect_id: String,
    pub image_url: String,
    pub user_id: String,
    pub remove_watermark: bool,
    pub is_private: bool,
}

/// Body posted to `video-gen`. The source image goes in a one-element list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoJobRequest {
    pub image_url: Vec<String>,
    pub effect_id: String,
    pub user_id: String,
    pub remove_watermark: bool,
    pub model: GenerationMode,
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum JobRequest {
    Image(ImageJobRequest),
    Video(VideoJobRequest),
}

impl JobRequest {
    /// Build the mode-appropriate body. Watermark removal and private
    /// visibility are always requested.
    pub fn for_asset(settings: &EffectSettings, asset_url: &str) -> Self {
        match settings.mode {
            GenerationMode::ImageEffects => Self::Image(ImageJobRequest {
                model: settings.mode,
                tool_type: settings.tool_type.clone(),
                effect_id: settings.effect_id.clone(),
                image_url: asset_url.to_string(),
                user_id: settings.user_id.clone(),
                remove_watermark: true,
                is_private: true,
            }),
            GenerationMode::VideoEffects => Self::Video(VideoJobRequest {
                image_url: vec![asset_url.to_string()],
                effect_id: settings.effect_id.clone(),
                user_id: settings.user_id.clone(),
                remove_watermark: true,
                model: settings.mode,
                is_private: true,
            }),
        }
    }
}

/// Response to a job submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedJob {
    pub job_id: String,
    #[serde(default)]
    pub status: String,
}

/// Remote job status. Unrecognised values are kept verbatim and treated as
/// still running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Error,
    Other(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => Self::Queued,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `GET {endpoint}/{user}/{job}/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobStatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Field names that may carry the result media URL, in priority order.
const RESULT_URL_FIELDS: [&str; 3] = ["mediaUrl", "video", "image"];

impl JobStatusResponse {
    pub fn job_status(&self) -> JobStatus {
        JobStatus::parse(&self.status)
    }

    /// Media URL of a completed job. If `result` is a list, only its first
    /// element is consulted. Empty strings count as absent.
    pub fn result_url(&self) -> Option<&str> {
        let item = match self.result.as_ref()? {
            Value::Array(items) => items.first()?,
            other => other,
        };

        RESULT_URL_FIELDS
            .iter()
            .filter_map(|field| item.get(field).and_then(Value::as_str))
            .find(|url| !url.is_empty())
    }
}
