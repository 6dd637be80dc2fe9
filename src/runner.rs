//! Bounded-concurrency job runner, the core of the tool.
//!
//! Schedules one render per distinct URL under a fixed worker budget and
//! reports completions strictly in submission order. A semaphore with
//! `max_workers` permits provides backpressure: the submission loop acquires
//! a permit before spawning a job and the job releases it on completion, so
//! at most `max_workers` renders are ever in flight and the URL list is
//! never buffered as in-flight work all at once.

use crate::{fingerprint::thumbnail_path, RenderOutcome, Renderer, ThumbnailError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Per-job completion report, in submission order.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub url: String,
    pub target: PathBuf,
    pub outcome: RenderOutcome,
}

/// Runs one render job per distinct URL with at most `max_workers` renders
/// in flight.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use thumbnailer::{Config, JobRunner, WkhtmlRenderer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let runner = JobRunner::new(Arc::new(WkhtmlRenderer::new(config.clone())), config.max_workers);
///     let urls = vec!["https://example.com".to_string()];
///     let reports = runner.run(urls, std::path::Path::new("thumbs")).await?;
///     println!("{} jobs completed", reports.len());
///     Ok(())
/// }
/// ```
pub struct JobRunner {
    renderer: Arc<dyn Renderer>,
    max_workers: usize,
}

impl JobRunner {
    pub fn new(renderer: Arc<dyn Renderer>, max_workers: usize) -> Self {
        Self {
            renderer,
            max_workers: max_workers.max(1),
        }
    }

    /// Process every distinct URL, returning per-job reports in submission
    /// order.
    ///
    /// The caller is expected to pass a deterministically ordered list (the
    /// URL sources yield sorted sets); duplicates are submitted at most once.
    /// Job-level failures never abort the run; only worker-pool breakage
    /// surfaces as an error.
    pub async fn run(
        &self,
        urls: Vec<String>,
        output_dir: &Path,
    ) -> Result<Vec<JobReport>, ThumbnailError> {
        let mut seen = HashSet::new();
        let urls: Vec<String> = urls.into_iter().filter(|u| seen.insert(u.clone())).collect();
        let total = urls.len();

        info!("processing {} urls with {} workers", total, self.max_workers);

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut jobs = Vec::with_capacity(total);

        for (idx, url) in urls.into_iter().enumerate() {
            println!("[{}/{}] processing {}", idx + 1, total, url);

            // Backpressure: stall here while all worker slots are busy.
            let permit = semaphore.clone().acquire_owned().await?;
            let renderer = self.renderer.clone();
            let target = thumbnail_path(output_dir, &url);

            let task_url = url.clone();
            let task_target = target.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                renderer.render(&task_url, &task_target).await
            });

            jobs.push((url, target, handle));
        }

        // Await in submission order, not completion order: job i+1 is not
        // reported before job i even if it finishes first.
        let mut reports = Vec::with_capacity(total);
        for (idx, (url, target, handle)) in jobs.into_iter().enumerate() {
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => {
                    error!("{}: {}", url, err);
                    RenderOutcome::Failed(err.to_string().into_bytes())
                }
                Err(err) => {
                    error!("{}: render job panicked: {}", url, err);
                    RenderOutcome::Failed(err.to_string().into_bytes())
                }
            };

            println!("[{}/{}] completed: {}", idx + 1, total, outcome);
            reports.push(JobReport {
                url,
                target,
                outcome,
            });
        }

        let failed = reports
            .iter()
            .filter(|r| matches!(r.outcome, RenderOutcome::Failed(_)))
            .count();
        if failed > 0 {
            warn!("{} of {} jobs failed", failed, total);
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Test double that tracks concurrent invocations and per-URL delays.
    struct FakeRenderer {
        active: AtomicUsize,
        max_active: AtomicUsize,
        invocations: AtomicUsize,
        delay_for: Box<dyn Fn(&str) -> Duration + Send + Sync>,
    }

    impl FakeRenderer {
        fn instant() -> Self {
            Self::with_delays(|_| Duration::from_millis(0))
        }

        fn with_delays(delay_for: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
            Self {
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
                invocations: AtomicUsize::new(0),
                delay_for: Box::new(delay_for),
            }
        }
    }

    #[async_trait]
    impl Renderer for FakeRenderer {
        async fn render(&self, url: &str, _target: &Path) -> Result<RenderOutcome, ThumbnailError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(active, Ordering::SeqCst);

            tokio::time::sleep((self.delay_for)(url)).await;

            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(RenderOutcome::Succeeded)
        }
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        let renderer = Arc::new(FakeRenderer::with_delays(|_| Duration::from_millis(20)));
        let runner = JobRunner::new(renderer.clone(), 2);

        let urls: Vec<String> = (0..8).map(|i| format!("http://host{i}.test")).collect();
        let reports = runner.run(urls, Path::new("/tmp/unused")).await.unwrap();

        assert_eq!(reports.len(), 8);
        assert_eq!(renderer.invocations.load(Ordering::SeqCst), 8);
        assert!(
            renderer.max_active.load(Ordering::SeqCst) <= 2,
            "more than max_workers renders were in flight"
        );
    }

    #[tokio::test]
    async fn test_reports_follow_submission_order() {
        // b finishes last even though submitted between a and c.
        let renderer = Arc::new(FakeRenderer::with_delays(|url| {
            if url.contains("b.test") {
                Duration::from_millis(80)
            } else {
                Duration::from_millis(5)
            }
        }));
        let runner = JobRunner::new(renderer, 3);

        let urls = vec![
            "http://a.test".to_string(),
            "http://b.test".to_string(),
            "http://c.test".to_string(),
        ];
        let reports = runner.run(urls.clone(), Path::new("/tmp/unused")).await.unwrap();

        let reported: Vec<&str> = reports.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(reported, vec!["http://a.test", "http://b.test", "http://c.test"]);
    }

    #[tokio::test]
    async fn test_duplicate_urls_render_once() {
        let renderer = Arc::new(FakeRenderer::instant());
        let runner = JobRunner::new(renderer.clone(), 2);

        let urls = vec![
            "http://x.test".to_string(),
            "http://y.test".to_string(),
            "http://x.test".to_string(),
            "http://x.test".to_string(),
        ];
        let reports = runner.run(urls, Path::new("/tmp/unused")).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(renderer.invocations.load(Ordering::SeqCst), 2);
        assert_eq!(reports[0].url, "http://x.test");
        assert_eq!(reports[1].url, "http://y.test");
    }

    #[tokio::test]
    async fn test_job_failure_does_not_abort_run() {
        struct FailSecond {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl Renderer for FailSecond {
            async fn render(
                &self,
                _url: &str,
                _target: &Path,
            ) -> Result<RenderOutcome, ThumbnailError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
                    Err(ThumbnailError::IoError("rename failed".to_string()))
                } else {
                    Ok(RenderOutcome::Succeeded)
                }
            }
        }

        let runner = JobRunner::new(
            Arc::new(FailSecond {
                calls: AtomicUsize::new(0),
            }),
            1,
        );
        let urls = vec![
            "http://a.test".to_string(),
            "http://b.test".to_string(),
            "http://c.test".to_string(),
        ];
        let reports = runner.run(urls, Path::new("/tmp/unused")).await.unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].outcome, RenderOutcome::Succeeded);
        assert!(matches!(reports[1].outcome, RenderOutcome::Failed(_)));
        assert_eq!(reports[2].outcome, RenderOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_targets_are_fingerprint_paths() {
        let runner = JobRunner::new(Arc::new(FakeRenderer::instant()), 2);
        let reports = runner
            .run(vec!["http://x.test".to_string()], Path::new("/out"))
            .await
            .unwrap();

        assert_eq!(
            reports[0].target,
            Path::new("/out/30b26ce3ea232290c08006d3f00e6087c358afaa.jpg")
        );
    }
}
