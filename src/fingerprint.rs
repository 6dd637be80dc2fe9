//! URL fingerprinting for content-addressed output filenames.
//!
//! URLs are unbounded in length and contain characters unsafe for filenames,
//! so output files are named by a fixed-length digest instead. SHA-1 is fixed
//! (rather than a newer hash) to keep filenames compatible with output
//! directories produced by earlier versions of the tool.

use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

/// Lowercase hex SHA-1 digest of the URL's UTF-8 bytes.
///
/// Stable across runs and platforms; the same URL always maps to the same
/// fingerprint.
///
/// # Examples
///
/// ```rust
/// use thumbnailer::fingerprint;
///
/// let digest = fingerprint("https://example.com");
/// assert_eq!(digest.len(), 40);
/// ```
pub fn fingerprint(url: &str) -> String {
    hex::encode(Sha1::digest(url.as_bytes()))
}

/// Target path for a URL's thumbnail: `<output_dir>/<fingerprint>.jpg`.
pub fn thumbnail_path(output_dir: &Path, url: &str) -> PathBuf {
    output_dir.join(format!("{}.jpg", fingerprint(url)))
}
