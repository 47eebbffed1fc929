//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can import
//! `service::runtime::ensure_data_dir` without depending directly on `common`.

use std::path::Path;

/// Ensure the directory for the data document exists.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_file).await
}
