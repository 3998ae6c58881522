//! Persisted snapshot format.
//!
//! A snapshot is a JSON envelope `{"version": N, "notes": [...]}`. A bare JSON
//! array of records is read as version 1, which is how the browser build of the
//! app kept its collection.

use crate::types::note::Note;
use serde::Serialize;
use serde_json::Value as Json;
use tracing::warn;

pub use v1 as latest;

pub mod v1;

pub trait RecordVariant {
    const VERSION: u64;
}

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum SnapshotError {
        #[error("invalid JSON: {0}")]
        Json(#[from] serde_json::Error),

        #[error("unsupported snapshot version: {0}")]
        UnsupportedVersion(u64),

        #[error("payload is not a note snapshot")]
        NotASnapshot,
    }
}

use error::SnapshotError;

/// Notes recovered from a snapshot, plus how many records had to be skipped.
#[derive(Debug, Default)]
pub struct Decoded {
    pub notes: Vec<Note>,
    pub dropped: usize,
}

#[derive(Serialize)]
struct Envelope {
    version: u64,
    notes: Vec<latest::NoteRecord>,
}

pub fn encode(notes: &[Note]) -> Result<String, serde_json::Error> {
    let envelope = Envelope {
        version: latest::NoteRecord::VERSION,
        notes: notes.iter().map(latest::NoteRecord::from).collect(),
    };
    serde_json::to_string(&envelope)
}

/// Decodes a snapshot. Records that fail to parse are dropped, not fatal.
pub fn decode(payload: &str) -> Result<Decoded, SnapshotError> {
    let records = match serde_json::from_str::<Json>(payload)? {
        Json::Array(records) => records,
        Json::Object(mut envelope) => {
            let version = envelope
                .get("version")
                .and_then(Json::as_u64)
                .ok_or(SnapshotError::NotASnapshot)?;
            if version != v1::NoteRecord::VERSION {
                return Err(SnapshotError::UnsupportedVersion(version));
            }
            match envelope.remove("notes") {
                Some(Json::Array(records)) => records,
                _ => return Err(SnapshotError::NotASnapshot),
            }
        }
        _ => return Err(SnapshotError::NotASnapshot),
    };

    let mut decoded = Decoded::default();
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<v1::NoteRecord>(record) {
            Ok(record) => decoded.notes.push(record.into_note()),
            Err(err) => {
                warn!(index, error = %err, "dropping malformed note record");
                decoded.dropped += 1;
            }
        }
    }
    Ok(decoded)
}
