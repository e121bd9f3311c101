//! JSON file persistence for cart sessions.
//!
//! Writes go to a sibling temp file first and are renamed over the target,
//! so a crash mid-write never leaves a truncated session behind.

use std::path::{Path, PathBuf};

use menu_cart_core::persistence::{CartStore, PersistenceError, StoredSession};
use tracing::debug;

/// Stores one session as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoredSession>, PersistenceError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, &e)),
        };

        let session: StoredSession = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), "loaded cart session");
        Ok(Some(session))
    }

    fn save(&self, session: &StoredSession) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, &e))?;
        }

        let bytes = serde_json::to_vec_pretty(session)?;
        let temp = self.temp_path();
        std::fs::write(&temp, bytes).map_err(|e| storage_error(&temp, &e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| storage_error(&self.path, &e))?;
        Ok(())
    }
}

fn storage_error(path: &Path, err: &std::io::Error) -> PersistenceError {
    PersistenceError::Storage(format!("{}: {err}", path.display()))
}
