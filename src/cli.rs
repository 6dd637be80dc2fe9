use crate::{source, Config, JobRunner, RenderOutcome, WkhtmlRenderer};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

#[derive(Parser)]
#[command(name = "thumbnailer")]
#[command(about = "Webpage thumbnailer for browser bookmarks and history")]
#[command(version)]
pub struct Cli {
    /// Browser history database, or a bookmark JSON export with --bookmarks
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(short, long, value_name = "DIR", help = "Output directory")]
    pub output: PathBuf,

    #[arg(long, help = "Treat FILE as a bookmark JSON export")]
    pub bookmarks: bool,

    #[arg(short = 'j', long, help = "Maximum concurrent render processes")]
    pub concurrency: Option<usize>,

    #[arg(long, help = "Renderer executable path")]
    pub renderer: Option<String>,

    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

pub struct CliRunner {
    pub config: Config,
}

impl CliRunner {
    pub async fn new(args: &Cli) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config {
            let content = fs::read_to_string(config_path)
                .await
                .with_context(|| format!("failed to read config {}", config_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("malformed config {}", config_path.display()))?
        } else {
            Config::default()
        };

        // Override with CLI arguments
        if let Some(concurrency) = args.concurrency {
            config.max_workers = concurrency;
        }
        if let Some(renderer) = &args.renderer {
            config.renderer_path = renderer.clone();
        }

        config.validate()?;

        Ok(Self { config })
    }

    /// Run the whole pipeline: read URLs, render thumbnails, print a summary.
    ///
    /// Individual job failures are recorded as error markers and do not fail
    /// the run; only source-read and output-directory errors propagate.
    pub async fn run(&self, args: &Cli) -> Result<()> {
        let urls = if args.bookmarks {
            source::read_bookmarks(&args.file).await?
        } else {
            source::read_history(&args.file).await?
        };

        fs::create_dir_all(&args.output).await.with_context(|| {
            format!("failed to create output directory {}", args.output.display())
        })?;

        let renderer = Arc::new(WkhtmlRenderer::new(self.config.clone()));
        let runner = JobRunner::new(renderer, self.config.max_workers);

        // BTreeSet iteration yields the sorted submission order.
        let reports = runner
            .run(urls.into_iter().collect(), &args.output)
            .await?;

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut skipped = 0usize;
        for report in &reports {
            match report.outcome {
                RenderOutcome::Succeeded => succeeded += 1,
                RenderOutcome::Failed(_) => failed += 1,
                RenderOutcome::AlreadyDone | RenderOutcome::AlreadyFailed => skipped += 1,
            }
        }

        info!(
            "run complete: {} succeeded, {} failed, {} skipped",
            succeeded, failed, skipped
        );
        println!(
            "done: {} succeeded, {} failed, {} skipped",
            succeeded, failed, skipped
        );

        Ok(())
    }
}

pub fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Progress lines own stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
