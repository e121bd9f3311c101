//! Persistence adapter contract for cart sessions.
//!
//! The cart engine saves after every successful mutation and loads once at
//! startup. It never knows the storage medium: the storefront crate provides a
//! JSON file store, and [`MemoryStore`] covers tests and ephemeral sessions.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::Favorites;

/// Errors from a [`CartStore`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage medium failed (I/O, lock, remote call).
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data decoded but violates cart invariants.
    #[error("stored cart is corrupt: {0}")]
    DataCorruption(String),
}

/// Everything persisted across sessions: the cart and the favorites list.
///
/// The applied coupon is deliberately not part of this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub cart: Cart,
    #[serde(default)]
    pub favorites: Favorites,
}

impl StoredSession {
    /// Check invariants of a session loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DataCorruption`] if the cart is inconsistent.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        self.cart.validate().map_err(PersistenceError::DataCorruption)
    }
}

/// Storage backend for a [`StoredSession`].
pub trait CartStore {
    /// Load the stored session, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the storage cannot be read or decoded.
    fn load(&self) -> Result<Option<StoredSession>, PersistenceError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the session cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), PersistenceError>;
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<StoredSession>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session.
    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// Snapshot of what is currently stored.
    #[must_use]
    pub fn snapshot(&self) -> Option<StoredSession> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CartStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredSession>, PersistenceError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), PersistenceError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }
}
