use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use effect_studio::app_state::AppState;
use effect_studio::config::AppConfig;
use effect_studio::models::upload::SourceFile;
use effect_studio::presenter::TerminalPresenter;
use effect_studio::workflow::DownloadOutcome;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let Some(image_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: effect-studio <image-file>");
        std::process::exit(2);
    };

    let config = AppConfig::from_env()?;

    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("effect_uploads_total", "Images uploaded to storage");
    metrics::describe_counter!("effect_jobs_submitted_total", "Generation jobs submitted");
    metrics::describe_counter!("effect_jobs_completed_total", "Generation jobs completed");
    metrics::describe_counter!(
        "effect_jobs_failed_total",
        "Generation attempts that ended in an error"
    );
    metrics::describe_counter!("effect_status_polls_total", "Job status requests issued");
    metrics::describe_histogram!(
        "effect_job_duration_seconds",
        "Time from job submission to rendered result"
    );
    metrics::describe_counter!("effect_downloads_total", "Result downloads by delivery path");

    tracing::info!(
        api = %config.api_base_url,
        mode = %config.model,
        effect = %config.effect_id,
        "Starting effect-studio"
    );

    let print_metrics = config.print_metrics;
    let state = AppState::from_config(config)?;
    let presenter = TerminalPresenter::new(&state.config.output_dir);
    let mut controller = state.controller(presenter);

    let file = SourceFile::from_path(&image_path)?;
    let outcome = run(&mut controller, file).await;

    if print_metrics {
        tracing::info!(metrics = %prometheus_handle.render(), "Session metrics");
    }

    outcome
}

async fn run<B, P>(
    controller: &mut effect_studio::workflow::WorkflowController<B, P>,
    file: SourceFile,
) -> Result<(), Box<dyn std::error::Error>>
where
    B: effect_studio::services::StudioBackend,
    P: effect_studio::presenter::Presenter,
{
    controller.upload(file).await?;

    let Some(result) = controller.generate().await? else {
        return Ok(());
    };

    match controller.download(&result.url).await {
        DownloadOutcome::Saved { path } | DownloadOutcome::Rasterized { path } => {
            tracing::info!(path = %path.display(), "Result saved");
        }
        DownloadOutcome::OpenedExternally { error } => {
            tracing::warn!(error = %error, url = %result.url, "Result must be saved manually");
        }
    }

    Ok(())
}
