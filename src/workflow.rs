//! Generation workflow: upload → submit → poll → render, plus download.

use std::path::PathBuf;
use std::time::Instant;

use crate::error::WorkflowError;
use crate::models::session::{Presentation, ResultMedia, Session, StatusText};
use crate::models::upload::{object_name, random_token, SourceFile, DOWNLOAD_TOKEN_LEN};
use crate::presenter::Presenter;
use crate::services::media::{self, MediaError};
use crate::services::poller::{poll_until_done, PollPolicy};
use crate::services::StudioBackend;

const UPLOAD_FIRST_NOTICE: &str = "Please upload an image first.";
const MANUAL_DOWNLOAD_NOTICE: &str =
    "Direct download failed. The file will open externally.\nSave it manually from there.";

/// How a download was finally delivered.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Fetched and saved as-is.
    Saved { path: PathBuf },
    /// Fetch failed; the rendered image was re-encoded as PNG and saved.
    Rasterized { path: PathBuf },
    /// Both failed; the URL was handed to an external viewer.
    OpenedExternally { error: WorkflowError },
}

/// Owns the session and drives the remote workflow through a backend,
/// reporting every step to a presenter.
///
/// Every operation takes `&mut self`, so a controller runs one step at a
/// time. Dropping an in-flight future leaves the session busy until
/// [`reset`](Self::reset) is called.
pub struct WorkflowController<B, P> {
    backend: B,
    presenter: P,
    policy: PollPolicy,
    session: Session,
}

impl<B: StudioBackend, P: Presenter> WorkflowController<B, P> {
    pub fn new(backend: B, presenter: P, policy: PollPolicy) -> Self {
        Self {
            backend,
            presenter,
            policy,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn presentation(&self) -> Presentation {
        self.session.presentation()
    }

    fn sync_status(&mut self) {
        let status = self.session.presentation().status;
        self.presenter.set_status(&status);
    }

    /// Upload a user-selected image and remember its public URL.
    pub async fn upload(&mut self, file: SourceFile) -> Result<String, WorkflowError> {
        if self.session.is_busy() {
            return Err(WorkflowError::Busy);
        }

        if !file.is_image() {
            let err = WorkflowError::InvalidInputKind {
                content_type: file.content_type.clone(),
            };
            tracing::warn!(content_type = %file.content_type, "Rejected non-image upload");
            self.presenter.prompt(&err.to_string());
            return Err(err);
        }

        self.presenter.show_preview(&file.preview_data_url());
        self.session.begin_upload();
        self.sync_status();

        match self.transfer(file).await {
            Ok(asset_url) => {
                tracing::info!(asset_url = %asset_url, "Upload complete");
                metrics::counter!("effect_uploads_total").increment(1);
                self.session.finish_upload(asset_url.clone());
                self.sync_status();
                Ok(asset_url)
            }
            Err(e) => {
                tracing::error!(error = %e, "Upload failed");
                self.presenter.set_status(&StatusText::Error);
                self.presenter.show_error(&e.to_string());
                self.reset();
                Err(e)
            }
        }
    }

    async fn transfer(&self, file: SourceFile) -> Result<String, WorkflowError> {
        let name = object_name(&file);
        tracing::debug!(file_name = %name, size = file.bytes.len(), "Requesting signed upload URL");

        let signed_url = self.backend.request_upload_url(&name).await?;
        self.backend
            .put_object(&signed_url, file.bytes, &file.content_type)
            .await?;

        Ok(self.backend.public_url(&name))
    }

    /// Run a generation job for the uploaded asset and render its result.
    ///
    /// Returns `Ok(None)` without touching the network when nothing has been
    /// uploaded yet.
    pub async fn generate(&mut self) -> Result<Option<ResultMedia>, WorkflowError> {
        if self.session.is_busy() {
            return Err(WorkflowError::Busy);
        }

        let Some(asset_url) = self.session.uploaded_asset_url().map(str::to_string) else {
            self.presenter.prompt(UPLOAD_FIRST_NOTICE);
            return Ok(None);
        };

        self.presenter.show_loading();
        let started = Instant::now();

        match self.run_job(&asset_url).await {
            Ok(media) => {
                self.presenter.hide_loading();
                self.presenter.render_result(&media);
                self.presenter.enable_download(&media.url);
                self.session.complete(media.clone());
                self.sync_status();

                metrics::counter!("effect_jobs_completed_total").increment(1);
                metrics::histogram!("effect_job_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(result_url = %media.url, kind = %media.kind, "Generation complete");
                Ok(Some(media))
            }
            Err(e) => {
                self.presenter.hide_loading();
                self.session.fail(e.to_string());
                self.sync_status();
                self.presenter.show_error(&e.to_string());

                metrics::counter!("effect_jobs_failed_total").increment(1);
                tracing::error!(error = %e, "Generation failed");
                Err(e)
            }
        }
    }

    async fn run_job(&mut self, asset_url: &str) -> Result<ResultMedia, WorkflowError> {
        self.session.begin_submit();
        self.sync_status();

        let job = self.backend.submit_job(asset_url).await?;
        metrics::counter!("effect_jobs_submitted_total").increment(1);

        self.session.set_polling(0);
        self.sync_status();

        let session = &mut self.session;
        let presenter = &mut self.presenter;
        let response = poll_until_done(&self.backend, &job.job_id, &self.policy, |attempt| {
            session.set_polling(attempt);
            presenter.set_status(&session.presentation().status);
        })
        .await?;

        match response.result_url() {
            Some(url) => Ok(ResultMedia::from_url(url)),
            None => {
                tracing::error!(job_id = %job.job_id, response = ?response, "Completed job has no media URL");
                Err(WorkflowError::MissingResultUrl)
            }
        }
    }

    /// Save a result. Falls back to re-encoding the rendered image, then to
    /// opening the URL externally. Never fails the session.
    pub async fn download(&mut self, result_url: &str) -> DownloadOutcome {
        self.presenter.set_download_busy(true);
        let outcome = self.deliver(result_url).await;
        self.presenter.set_download_busy(false);
        outcome
    }

    async fn deliver(&mut self, result_url: &str) -> DownloadOutcome {
        let direct_error = match self.save_fetched(result_url).await {
            Ok(path) => {
                metrics::counter!("effect_downloads_total", "path" => "direct").increment(1);
                return DownloadOutcome::Saved { path };
            }
            Err(e) => {
                tracing::warn!(error = %e, url = result_url, "Direct download failed");
                e
            }
        };

        match self.save_rasterized() {
            Ok(path) => {
                metrics::counter!("effect_downloads_total", "path" => "rasterized").increment(1);
                return DownloadOutcome::Rasterized { path };
            }
            Err(e) => tracing::warn!(error = %e, "Rendered image fallback unavailable"),
        }

        metrics::counter!("effect_downloads_total", "path" => "external").increment(1);
        self.presenter.prompt(MANUAL_DOWNLOAD_NOTICE);
        self.presenter.open_external(result_url);
        DownloadOutcome::OpenedExternally {
            error: WorkflowError::DownloadFailed(direct_error.to_string()),
        }
    }

    async fn save_fetched(&mut self, result_url: &str) -> Result<PathBuf, MediaError> {
        let fetched = self.backend.fetch_media(result_url).await?;
        let extension = media::download_extension(fetched.content_type.as_deref(), result_url);
        let file_name = format!("result_{}.{}", random_token(DOWNLOAD_TOKEN_LEN), extension);
        Ok(self.presenter.save_file(&file_name, &fetched.bytes)?)
    }

    fn save_rasterized(&mut self) -> Result<PathBuf, MediaError> {
        let rendered = self
            .presenter
            .rendered_image()
            .ok_or(MediaError::NotRendered)?;
        let png = media::rasterize_png(&rendered)?;
        let file_name = format!("result_{}.png", random_token(DOWNLOAD_TOKEN_LEN));
        Ok(self.presenter.save_file(&file_name, &png)?)
    }

    /// Clear the session and everything shown. Does not reach the network.
    pub fn reset(&mut self) {
        self.session.reset();
        self.presenter.clear();
        self.sync_status();
    }
}
