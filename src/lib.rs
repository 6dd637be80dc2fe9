//! # Thumbnailer
//!
//! Renders one thumbnail image per URL taken from a browser's history
//! database or bookmark export, by driving an external `wkhtmltoimage`
//! process under a fixed concurrency budget. Output is content-addressed:
//! each URL maps to `<output>/<sha1(url)>.jpg`, a permanent render failure
//! leaves `<sha1(url)>.jpg.error` next to it, and re-running the tool over
//! the same output directory skips everything already done or failed.
//!
//! ## CLI Usage
//!
//! ### History database
//! ```bash
//! thumbnailer ~/.config/chromium/Default/History -o thumbs/
//! ```
//!
//! ### Bookmark export
//! ```bash
//! thumbnailer bookmarks.json --bookmarks -o thumbs/ -j 4
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thumbnailer::{Config, JobRunner, WkhtmlRenderer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let renderer = Arc::new(WkhtmlRenderer::new(config.clone()));
//!     let runner = JobRunner::new(renderer, config.max_workers);
//!
//!     let urls = vec!["https://example.com".to_string()];
//!     let reports = runner.run(urls, std::path::Path::new("thumbs")).await?;
//!     println!("{} jobs completed", reports.len());
//!     Ok(())
//! }
//! ```

/// Configuration and renderer invocation settings
pub mod config;

/// Error types and error handling utilities
pub mod error;

/// URL fingerprinting for content-addressed filenames
pub mod fingerprint;

/// Render invoker wrapping the external rendering process
pub mod render;

/// Bounded-concurrency job runner
pub mod runner;

/// URL sources: history databases and bookmark exports
pub mod source;

/// Command-line interface implementation
pub mod cli;


pub use cli::*;
pub use config::*;
pub use error::*;
pub use fingerprint::*;
pub use render::*;
pub use runner::*;
