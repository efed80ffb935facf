//! Storage abstraction for board persistence.
//!
//! The board document is delegated to an external document store; this
//! module defines the get/set/subscribe contract the core depends on.
//! The serialized [`Note`] union is the wire format; there is no
//! additional schema negotiation.

mod memory;

pub use memory::MemoryStorage;

use crate::note::Note;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Handle for an active change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Listener invoked with the new document on every save of a watched
/// board.
pub type ChangeListener = Box<dyn FnMut(&BoardDocument) + Send>;

/// A persisted board: the note collection keyed by board id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDocument {
    /// Board/session identifier.
    pub id: String,
    /// All notes, serialized as the tagged `Note` union.
    pub notes: Vec<Note>,
}

impl BoardDocument {
    /// Create an empty board document.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            notes: Vec::new(),
        }
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Trait for board storage backends.
///
/// Implementations can store boards in memory, local storage, or behind
/// a remote document database.
pub trait BoardStorage: Send + Sync {
    /// Save a board document.
    fn save(&self, id: &str, document: &BoardDocument) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a board document.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<BoardDocument>>;

    /// Delete a board document.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Check if a board exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;

    /// Subscribe to changes of one board. The listener fires after
    /// every successful save of that board.
    fn subscribe(&self, id: &str, listener: ChangeListener) -> WatchId;

    /// Remove a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, watch: WatchId);
}
