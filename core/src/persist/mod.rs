//! Persistence adapter: keeps the whole note collection in one named slot.
//!
//! - [`Slot`] is the raw storage (a redb entry, or memory).
//! - [`Persistence`] encodes/decodes snapshots and applies the failure policy:
//!   reads degrade to an empty collection, writes never roll anything back.

use crate::store::StoreObserver;
use crate::types::Note;
use crate::types::record;
use error::PersistenceError;
use tracing::{info, warn};

mod slot;

pub use slot::{MemorySlot, RedbSlot};

pub mod error {
    use crate::types::record::error::SnapshotError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum PersistenceError {
        #[error("Database error: {0}")]
        Database(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        Table(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        Storage(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        Transaction(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        Commit(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Encode error: {0}")]
        Encode(#[from] serde_json::Error),

        #[error("Corrupt snapshot: {0}")]
        Corrupt(#[from] SnapshotError),
    }
}

/// Raw durable storage for one serialized snapshot.
pub trait Slot {
    /// Returns `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    fn write(&mut self, payload: &str) -> Result<(), PersistenceError>;
}

/// Result of a successful load.
#[derive(Debug, Default)]
pub struct LoadedNotes {
    pub notes: Vec<Note>,
    /// Records that could not be parsed and were skipped.
    pub dropped: usize,
}

pub struct Persistence<S> {
    slot: S,
}

impl<S: Slot> Persistence<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn load(&self) -> Result<LoadedNotes, PersistenceError> {
        let Some(payload) = self.slot.read()? else {
            return Ok(LoadedNotes::default());
        };

        let decoded = record::decode(&payload)?;

        Ok(LoadedNotes {
            notes: decoded.notes,
            dropped: decoded.dropped,
        })
    }

    /// Startup policy: a failed load yields an empty collection.
    pub fn load_or_empty(&self) -> Vec<Note> {
        match self.load() {
            Ok(loaded) => {
                if loaded.dropped > 0 {
                    warn!(dropped = loaded.dropped, "skipped unreadable note records");
                }
                info!(notes = loaded.notes.len(), "loaded notes");
                loaded.notes
            }
            Err(err) => {
                warn!(error = %err, "could not load notes, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, notes: &[Note]) -> Result<(), PersistenceError> {
        let payload = record::encode(notes)?;
        self.slot.write(&payload)
    }
}

/// Saves a full snapshot after every change. A failed save is logged and left for
/// the next change to overwrite.
impl<S: Slot> StoreObserver for Persistence<S> {
    fn notes_changed(&mut self, notes: &[Note]) {
        if let Err(err) = self.save(notes) {
            warn!(error = %err, notes = notes.len(), "failed to save notes");
        }
    }
}

#[cfg(test)]
mod tests;
