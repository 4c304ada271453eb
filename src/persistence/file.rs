//! File-backed gateway.
//!
//! Each key is stored as `<dir>/<key>.json`. Values are written to a
//! temporary sibling first and renamed into place, so a crash mid-write
//! leaves the previous value readable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{PersistenceError, PersistenceGateway};

/// Maximum accepted key length.
const MAX_KEY_LENGTH: usize = 128;

/// Gateway storing one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: PathBuf,
}

impl FileGateway {
    /// Creates a gateway rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory holding the stored values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key onto its file path.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::InvalidKey`] for keys that could escape
    /// the directory or are not portable file names.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key.len() <= MAX_KEY_LENGTH
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::ReadFailed {
                key: key.to_string(),
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let write_failed = |e: std::io::Error| PersistenceError::WriteFailed {
            key: key.to_string(),
            message: format!("{}: {}", path.display(), e),
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(write_failed)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(write_failed)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_failed)?;

        debug!(key, path = %path.display(), "value written");
        Ok(())
    }
}
