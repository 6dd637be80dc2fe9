//! Render invoker wrapping the external webpage-to-image process.
//!
//! One render call maps a URL to a thumbnail file, with idempotence built in:
//! an existing thumbnail or error marker short-circuits the call without
//! spawning a process. Output is published atomically by rendering into a
//! `.part` file and renaming it only on success, so a half-written image can
//! never appear at the final path.

use crate::{renderer_args, Config, ThumbnailError};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Suffix of the permanent failure marker next to a thumbnail path.
pub const ERROR_SUFFIX: &str = ".error";

/// Suffix of the transient in-progress file; never persists past a job.
pub const PART_SUFFIX: &str = ".part";

/// Outcome of a single render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The thumbnail already exists; no process was spawned.
    AlreadyDone,
    /// An error marker exists from a previous run; no process was spawned.
    AlreadyFailed,
    /// The renderer exited successfully and the thumbnail was published.
    Succeeded,
    /// The renderer failed; the captured diagnostic was persisted as an
    /// error marker suppressing future retries.
    Failed(Vec<u8>),
}

impl std::fmt::Display for RenderOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderOutcome::AlreadyDone => write!(f, "skipped (already done)"),
            RenderOutcome::AlreadyFailed => write!(f, "skipped (previous failure)"),
            RenderOutcome::Succeeded => write!(f, "succeeded"),
            RenderOutcome::Failed(_) => write!(f, "failed"),
        }
    }
}

impl RenderOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(self, RenderOutcome::AlreadyDone | RenderOutcome::AlreadyFailed)
    }
}

/// Seam between the job runner and the external rendering process.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str, target: &Path) -> Result<RenderOutcome, ThumbnailError>;
}

/// Error marker path for a thumbnail target: `<target>.error`.
pub fn error_path(target: &Path) -> PathBuf {
    append_suffix(target, ERROR_SUFFIX)
}

/// In-progress path for a thumbnail target: `<target>.part`.
pub fn part_path(target: &Path) -> PathBuf {
    append_suffix(target, PART_SUFFIX)
}

fn append_suffix(target: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = target.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Renderer backed by the `wkhtmltoimage` executable.
pub struct WkhtmlRenderer {
    config: Config,
}

impl WkhtmlRenderer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Renderer for WkhtmlRenderer {
    async fn render(&self, url: &str, target: &Path) -> Result<RenderOutcome, ThumbnailError> {
        if fs::try_exists(target).await.unwrap_or(false) {
            info!("{}: skipping, thumbnail exists", target.display());
            return Ok(RenderOutcome::AlreadyDone);
        }

        let marker = error_path(target);
        if fs::try_exists(&marker).await.unwrap_or(false) {
            info!("{}: skipping, error marker exists", target.display());
            return Ok(RenderOutcome::AlreadyFailed);
        }

        let part = part_path(target);
        info!("{}: processing", url);

        let output = Command::new(&self.config.renderer_path)
            .args(renderer_args(&self.config))
            .arg(url)
            .arg(&part)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                // Spawn failure is permanent for this URL, same as a
                // non-zero exit: record it and move on.
                warn!(
                    "{}: failed to spawn renderer {}: {}",
                    url, self.config.renderer_path, err
                );
                let diagnostic =
                    format!("failed to spawn {}: {}\n", self.config.renderer_path, err)
                        .into_bytes();
                fs::write(&marker, &diagnostic).await?;
                return Ok(RenderOutcome::Failed(diagnostic));
            }
        };

        if output.status.success() {
            fs::rename(&part, target).await?;
            info!("{}: success", target.display());
            Ok(RenderOutcome::Succeeded)
        } else {
            error!("{}: failed to process", target.display());

            if let Err(err) = fs::remove_file(&part).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!("{}: could not remove partial file: {}", part.display(), err);
                }
            }

            let mut diagnostic =
                Vec::with_capacity(output.stdout.len() + output.stderr.len() + 32);
            diagnostic.extend_from_slice(b"stdout:\n");
            diagnostic.extend_from_slice(&output.stdout);
            diagnostic.extend_from_slice(b"\nstderr:\n");
            diagnostic.extend_from_slice(&output.stderr);

            fs::write(&marker, &diagnostic).await?;
            Ok(RenderOutcome::Failed(diagnostic))
        }
    }
}
