use std::{io, marker::PhantomData, path::PathBuf};
use tokio::fs;
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file-backed sequence store.
///
/// The whole collection lives in one JSON array document. Every read parses
/// the full file and every write replaces it; nothing is cached between calls.
/// There is no file locking, so callers that mutate must serialize themselves.
#[derive(Debug)]
pub struct JsonDocStore<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Bind the store to a document path. The file is not touched.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _marker: PhantomData }
    }

    /// Load the full collection. A missing document is an empty collection.
    pub async fn read_all(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "document missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(ServiceError::Storage(format!("read {}: {e}", self.file_path.display()))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Corrupt(format!("{}: {e}", self.file_path.display())))
    }

    /// Serialize the collection and overwrite the document in full.
    pub async fn write_all(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(items).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(format!("write {}: {e}", self.file_path.display())))?;
        debug!(path = %self.file_path.display(), count = items.len(), "document written");
        Ok(())
    }
}
