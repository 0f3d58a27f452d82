//! Reads objects from a local mirror of the database layout.

use std::path::PathBuf;

use tracing::debug;

use super::{ObjectKey, ObjectStore};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore { root: root.into() }
    }

    /// Location of `key` inside the mirror. File names keep the escaped form.
    pub fn file_path(&self, key: &ObjectKey) -> PathBuf {
        key.path()
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl ObjectStore for LocalStore {
    async fn fetch(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        let file_path = self.file_path(key);
        let content = tokio::fs::read(&file_path)
            .await
            .map_err(|e| EngineError::fetch(key.path(), e))?;
        debug!(file = %file_path.display(), bytes = content.len(), "Read object");

        Ok(content)
    }
}

// -- Tests -------------------------------------------------------------------
