//! URL sources: browser history databases and bookmark exports.
//!
//! Both readers yield a `BTreeSet`, which gives the runner the deduplicated,
//! sorted, order-stable URL collection its contract requires. Source-read
//! failures are fatal to the whole run and propagate up with context.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// One node of a Chrome bookmark export tree.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkNode {
    Folder {
        #[serde(default)]
        children: Vec<BookmarkNode>,
    },
    Url {
        url: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct BookmarkRoots {
    bookmark_bar: BookmarkNode,
}

#[derive(Debug, Deserialize)]
struct BookmarkFile {
    roots: BookmarkRoots,
}

fn collect_bookmarks(node: &BookmarkNode, urls: &mut BTreeSet<String>) {
    match node {
        BookmarkNode::Folder { children } => {
            for child in children {
                collect_bookmarks(child, urls);
            }
        }
        BookmarkNode::Url { url } => {
            urls.insert(url.clone());
        }
        BookmarkNode::Unknown => {
            warn!("skipping bookmark node with unknown type");
        }
    }
}

/// Read the distinct URLs under `roots.bookmark_bar` of a bookmark export.
///
/// Malformed JSON is fatal; nodes with an unrecognized `type` are logged and
/// skipped.
pub async fn read_bookmarks(path: &Path) -> Result<BTreeSet<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read bookmark file {}", path.display()))?;

    let file: BookmarkFile = serde_json::from_str(&content)
        .with_context(|| format!("malformed bookmark file {}", path.display()))?;

    let mut urls = BTreeSet::new();
    collect_bookmarks(&file.roots.bookmark_bar, &mut urls);
    info!("{} urls found in bookmarks", urls.len());
    Ok(urls)
}

/// Read the distinct URLs from a browser history database.
///
/// The store is opened read-only; an unreadable database or a missing `urls`
/// table is fatal.
pub async fn read_history(path: &Path) -> Result<BTreeSet<String>> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open history database {}", path.display()))?;

    let rows: Vec<String> = sqlx::query_scalar("SELECT DISTINCT url FROM urls")
        .fetch_all(&pool)
        .await
        .with_context(|| format!("failed to query history database {}", path.display()))?;

    pool.close().await;

    let urls: BTreeSet<String> = rows.into_iter().collect();
    info!("{} urls found in history", urls.len());
    Ok(urls)
}
