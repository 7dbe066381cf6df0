use std::sync::Arc;

use crate::config::AppConfig;
use crate::presenter::Presenter;
use crate::services::HttpStudio;
use crate::workflow::WorkflowController;

/// Configuration and HTTP backend shared by the binary.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub studio: Arc<HttpStudio>,
}

impl AppState {
    pub fn new(config: AppConfig, studio: HttpStudio) -> Self {
        Self {
            config: Arc::new(config),
            studio: Arc::new(studio),
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self, reqwest::Error> {
        let studio = HttpStudio::from_config(&config)?;
        Ok(Self::new(config, studio))
    }

    /// A fresh workflow session over the shared backend.
    pub fn controller<P: Presenter>(&self, presenter: P) -> WorkflowController<Arc<HttpStudio>, P> {
        WorkflowController::new(self.studio.clone(), presenter, self.config.poll_policy())
    }
}
