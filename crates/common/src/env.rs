//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding `data_file` exists.
///
/// The document itself is not created: a missing document reads as an empty
/// collection. A path with no parent (plain `data.json`) lives in the
/// working directory and needs nothing.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    let parent = match data_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if tokio::fs::metadata(parent).await.is_err() {
        info!(dir = %parent.display(), "creating data directory");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    if tokio::fs::metadata(data_file).await.is_err() {
        warn!(path = %data_file.display(), "data document not found; starting with an empty collection");
    }
    Ok(())
}
