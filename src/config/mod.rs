use garde::Validate;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::job::{EffectSettings, GenerationMode};
use crate::services::poller::PollPolicy;

const ENV_PREFIX: &str = "STUDIO_";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Effects API base URL (signed-URL issuer, job submission and status).
    #[serde(default = "default_api_base_url")]
    #[garde(length(min = 1))]
    pub api_base_url: String,

    /// Public base path of the upload bucket. Uploaded objects are served
    /// from `{content_base_url}/{object_name}`.
    #[serde(default = "default_content_base_url")]
    #[garde(length(min = 1))]
    pub content_base_url: String,

    /// Account identifier sent with every job.
    #[serde(default = "default_user_id")]
    #[garde(length(min = 1))]
    pub user_id: String,

    /// Effect to apply (e.g. "mugshot").
    #[serde(default = "default_effect_id")]
    #[garde(length(min = 1))]
    pub effect_id: String,

    /// Generation mode: "image-effects" or "video-effects".
    #[serde(default)]
    #[garde(skip)]
    pub model: GenerationMode,

    /// Tool type sent with image-effect jobs.
    #[serde(default = "default_tool_type")]
    #[garde(length(min = 1))]
    pub tool_type: String,

    /// Delay between status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    #[garde(range(min = 1))]
    pub poll_interval_ms: u64,

    /// Maximum number of status requests before the job is timed out.
    #[serde(default = "default_max_polls")]
    #[garde(range(min = 1))]
    pub max_polls: u32,

    /// Per-request HTTP timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    #[garde(range(min = 1))]
    pub request_timeout_secs: u64,

    /// Directory downloads are written to.
    #[serde(default = "default_output_dir")]
    #[garde(skip)]
    pub output_dir: PathBuf,

    /// Log the Prometheus exposition text when the binary exits.
    #[serde(default)]
    #[garde(skip)]
    pub print_metrics: bool,
}

fn default_api_base_url() -> String {
    "https://api.chromastudio.ai".to_string()
}

fn default_content_base_url() -> String {
    "https://contents.maxstudio.ai".to_string()
}

fn default_user_id() -> String {
    "DObRu1vyStbUynoQmTcHBlhs55z2".to_string()
}

fn default_effect_id() -> String {
    "mugshot".to_string()
}

fn default_tool_type() -> String {
    "image-effects".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_polls() -> u32 {
    60
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            content_base_url: default_content_base_url(),
            user_id: default_user_id(),
            effect_id: default_effect_id(),
            model: GenerationMode::default(),
            tool_type: default_tool_type(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
            request_timeout_secs: default_request_timeout_secs(),
            output_dir: default_output_dir(),
            print_metrics: false,
        }
    }
}

impl AppConfig {
    /// Load `STUDIO_*` variables (after reading `.env`, if present) and validate them.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::prefixed(ENV_PREFIX).from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn effect_settings(&self) -> EffectSettings {
        EffectSettings {
            mode: self.model,
            user_id: self.user_id.clone(),
            effect_id: self.effect_id.clone(),
            tool_type: self.tool_type.clone(),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_polls,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}
