//! Configuration management with serde serialization/deserialization
//!
//! This module provides the configuration structure for the thumbnailer,
//! including the worker budget and the fixed renderer invocation parameters.

use crate::ThumbnailError;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the thumbnailer
///
/// Controls the concurrency budget of the job runner and the parameters of
/// the external renderer invocation.
///
/// # Examples
///
/// ```rust
/// use thumbnailer::Config;
///
/// // Use default configuration
/// let config = Config::default();
///
/// // Create custom configuration
/// let config = Config {
///     max_workers: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Maximum number of concurrent render processes (default: 2)
    ///
    /// Each render blocks one worker slot for its full duration; the
    /// submission side stalls while all slots are busy.
    pub max_workers: usize,

    /// Renderer executable invoked per URL (default: "wkhtmltoimage")
    ///
    /// Resolved via PATH unless an absolute path is given.
    pub renderer_path: String,

    /// JPEG quality passed to the renderer (default: 80)
    pub quality: u8,

    /// Render and crop width in pixels (default: 1024)
    pub width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_workers: 2,
            renderer_path: "wkhtmltoimage".to_string(),
            quality: 80,
            width: 1024,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ThumbnailError> {
        if self.max_workers == 0 {
            return Err(ThumbnailError::ConfigurationError(
                "max_workers must be greater than 0".to_string(),
            ));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(ThumbnailError::ConfigurationError(
                "quality must be in 1..=100".to_string(),
            ));
        }

        if self.width == 0 {
            return Err(ThumbnailError::ConfigurationError(
                "width must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Generate the fixed renderer argument list based on configuration
///
/// The URL and the temporary output path are appended separately by the
/// render invoker; this returns only the flags.
///
/// # Examples
///
/// ```rust
/// use thumbnailer::{Config, renderer_args};
///
/// let args = renderer_args(&Config::default());
/// assert!(args.contains(&"--quiet".to_string()));
/// ```
pub fn renderer_args(config: &Config) -> Vec<String> {
    vec![
        "--quiet".to_string(),
        "--format".to_string(),
        "jpeg".to_string(),
        "--quality".to_string(),
        config.quality.to_string(),
        "--load-error-handling".to_string(),
        "abort".to_string(),
        "--load-media-error-handling".to_string(),
        "ignore".to_string(),
        "--width".to_string(),
        config.width.to_string(),
        "--crop-w".to_string(),
        config.width.to_string(),
    ]
}
