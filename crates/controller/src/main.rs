//! `vidlate` -- submit a video for transcription and translation.
//!
//! Uploads a file through either the proxy API or the backend directly,
//! polls until the job settles, and prints the translation to stdout.
//!
//! # Environment variables
//!
//! | Variable          | Default                 | Description                          |
//! |-------------------|-------------------------|--------------------------------------|
//! | `VIDLATE_API_URL` | `http://localhost:3000` | Proxy API base URL                   |
//! | `BACKEND_URL`     | --                      | Talk to the backend directly instead |
//! | `RUST_LOG`        | `vidlate=info,vidlate_controller=info` | Log filter            |

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidlate_controller::{JobController, JobEvent};
use vidlate_core::job::JobState;
use vidlate_core::language::{DEFAULT_LANGUAGE_CODE, LANGUAGES};
use vidlate_core::upload::VideoFile;
use vidlate_gateway::{GatewayClient, ProxyApiClient};

const DEFAULT_API_URL: &str = "http://localhost:3000";

/// How long to wait for the last notifications to be logged on exit.
const REPORTER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file to upload
    #[arg(required_unless_present = "list_languages")]
    file: Option<PathBuf>,

    /// Target language code
    #[arg(short, long, default_value = DEFAULT_LANGUAGE_CODE)]
    language: String,

    /// Base URL of the proxy API
    #[arg(long, env = "VIDLATE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Base URL of the backend; bypasses the proxy API when set
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,

    /// Print the supported target languages and exit
    #[arg(long)]
    list_languages: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidlate=info,vidlate_controller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if args.list_languages {
        for language in LANGUAGES {
            println!("{}\t{}", language.code, language.name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let path = args.file.context("a video file is required")?;
    let file = read_video(&path).await?;

    let controller = match &args.backend_url {
        Some(url) => {
            tracing::info!(backend_url = %url, "Submitting directly to backend");
            JobController::with_backend(Arc::new(GatewayClient::new(url.clone())))
        }
        None => {
            tracing::info!(api_url = %args.api_url, "Submitting through proxy API");
            JobController::with_backend(Arc::new(ProxyApiClient::new(args.api_url.clone())))
        }
    };

    controller.select_language(&args.language).await?;
    controller.select_file(Some(file)).await;

    let reporter = tokio::spawn(report_events(controller.subscribe()));

    let outcome = tokio::select! {
        result = run(&controller) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, tearing down");
            controller.shutdown().await;
            reporter.abort();
            return Ok(ExitCode::from(130));
        }
    };

    // Dropping the controller closes the event channel once the poll task
    // is gone; the reporter drains what is left and exits.
    controller.shutdown().await;
    drop(controller);
    let _ = tokio::time::timeout(REPORTER_DRAIN_TIMEOUT, reporter).await;

    match outcome {
        Ok(result) => {
            println!("{result}");
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => {
            eprintln!("Error: {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Submit and wait. Returns the translation, or the error message.
async fn run(controller: &JobController) -> Result<String, String> {
    if let Err(e) = controller.submit().await {
        return Err(e.to_string());
    }

    match controller.wait_until_settled().await {
        JobState::Completed { result } => Ok(result),
        JobState::Error { message } => Err(message),
        other => Err(format!("Job ended in unexpected state: {}", other.label())),
    }
}

async fn read_video(path: &Path) -> anyhow::Result<VideoFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video.mp4".to_string());

    let file = VideoFile::new(file_name, bytes);
    let is_mp4 = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));

    Ok(if is_mp4 {
        file.with_content_type("video/mp4")
    } else {
        file
    })
}

/// Log controller notifications until the channel closes.
async fn report_events(mut rx: broadcast::Receiver<JobEvent>) {
    loop {
        match rx.recv().await {
            Ok(JobEvent::ValidationFailed { message }) => {
                tracing::warn!(%message, "Submission rejected");
            }
            Ok(JobEvent::Uploading {
                file_name,
                target_language,
            }) => {
                tracing::info!(%file_name, %target_language, "Uploading");
            }
            Ok(JobEvent::Submitted { job_id }) => {
                tracing::info!(%job_id, "Processing started");
            }
            Ok(JobEvent::StillProcessing { job_id, status }) => {
                tracing::info!(
                    %job_id,
                    status = status.as_deref().unwrap_or("unknown"),
                    "Still processing",
                );
            }
            Ok(JobEvent::Completed { job_id, .. }) => {
                tracing::info!(%job_id, "Translation completed");
            }
            Ok(JobEvent::Failed { job_id, message }) => match job_id {
                Some(job_id) => tracing::error!(%job_id, %message, "Job failed"),
                None => tracing::error!(%message, "Upload failed"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Missed controller notifications");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
