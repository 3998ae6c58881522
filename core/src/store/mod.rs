//! The note store: sole owner and writer of the note collection.
//!
//! Every mutation goes through [`NoteStore::mutate`], which checks the session gate
//! first and notifies observers after a change. An unknown note id is never an
//! error; the operation simply reports that nothing was applied.

use crate::persist::{Persistence, Slot};
use crate::types::{Attachment, Note, NoteColor, NoteDraft, NoteId, NotePatch};
use error::StoreError;
use session::SessionGate;
use std::time::SystemTime;
use tracing::{debug, info, warn};

pub mod session;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum StoreError {
        #[error("authorization required: sign in to modify notes")]
        AuthorizationRequired,
    }
}

/// Receives the full collection after every mutation that changed it.
pub trait StoreObserver {
    fn notes_changed(&mut self, notes: &[Note]);
}

pub struct NoteStore {
    notes: Vec<Note>,
    gate: Box<dyn SessionGate>,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl NoteStore {
    pub fn new(notes: Vec<Note>, gate: impl SessionGate + 'static) -> Self {
        Self {
            notes,
            gate: Box::new(gate),
            observers: Vec::new(),
        }
    }

    /// Loads the persisted collection and keeps it saved after every change.
    ///
    /// A missing or unreadable snapshot starts the store empty.
    pub fn open<S: Slot + 'static>(
        persistence: Persistence<S>,
        gate: impl SessionGate + 'static,
    ) -> Self {
        let notes = persistence.load_or_empty();
        let mut store = Self::new(notes, gate);
        store.subscribe(persistence);
        store
    }

    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) {
        self.observers.push(Box::new(observer));
    }
}

/// Read operations.
impl NoteStore {
    /// All notes in storage order (most recently created first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Finds a note by full id or by an unambiguous id prefix.
    ///
    /// An exact match wins as typed; otherwise the input is trimmed before the
    /// prefix search.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&Note> {
        if let Some(exact) = self.notes.iter().find(|n| n.id.as_str() == prefix) {
            return Some(exact);
        }
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        if let Some(exact) = self.notes.iter().find(|n| n.id.as_str() == prefix) {
            return Some(exact);
        }

        let mut matches = self.notes.iter().filter(|n| n.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(note), None) => Some(note),
            _ => None,
        }
    }
}

/// Create operations.
impl NoteStore {
    /// Creates a note and puts it at the front of the collection.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        now: SystemTime,
    ) -> Result<NoteId, StoreError> {
        let note = Note::new(title.into(), content.into(), now);
        self.mutate("create", |notes| {
            let id = note.id.clone();
            notes.insert(0, note);
            (id, true)
        })
    }

    /// Saves what an editor produced.
    ///
    /// A blank draft is discarded. With `editing` set, the draft's title, content,
    /// due date and attachments replace the note's and `updated_at` becomes `now`;
    /// notes in the trash are not editable. Otherwise a new note is created.
    ///
    /// Returns the id of the saved note, or `None` when nothing was saved.
    pub fn commit_draft(
        &mut self,
        editing: Option<&NoteId>,
        draft: NoteDraft,
        now: SystemTime,
    ) -> Result<Option<NoteId>, StoreError> {
        if draft.is_blank() {
            debug!("discarding blank draft");
            return Ok(None);
        }

        let NoteDraft {
            title,
            content,
            due_date,
            attachments,
        } = draft;

        match editing {
            Some(id) => self.mutate("commit_draft", |notes| {
                let Some(note) = notes.iter_mut().find(|n| &n.id == id && !n.is_deleted) else {
                    return (None, false);
                };
                NotePatch {
                    title: Some(title),
                    content: Some(content),
                    due_date: Some(due_date),
                    attachments: Some(attachments),
                    updated_at: Some(now),
                    ..Default::default()
                }
                .apply(note);
                (Some(note.id.clone()), true)
            }),
            None => self.mutate("commit_draft", |notes| {
                let mut note = Note::new(title, content, now);
                note.due_date = due_date;
                note.attachments = attachments;
                let id = note.id.clone();
                notes.insert(0, note);
                (Some(id), true)
            }),
        }
    }
}

/// Update operations.
///
/// Each returns `Ok(true)` when the note exists and `Ok(false)` otherwise.
/// None of these refresh `updated_at` unless the patch says so.
impl NoteStore {
    pub fn update(&mut self, id: &NoteId, patch: NotePatch) -> Result<bool, StoreError> {
        self.modify("update", id, |note| {
            let before = note.clone();
            patch.apply(note);
            *note != before
        })
    }

    pub fn toggle_pin(&mut self, id: &NoteId) -> Result<bool, StoreError> {
        self.modify("toggle_pin", id, |note| {
            note.is_pinned = !note.is_pinned;
            true
        })
    }

    pub fn toggle_archive(&mut self, id: &NoteId) -> Result<bool, StoreError> {
        self.modify("toggle_archive", id, |note| {
            note.is_archived = !note.is_archived;
            true
        })
    }

    pub fn set_color(&mut self, id: &NoteId, color: NoteColor) -> Result<bool, StoreError> {
        self.modify("set_color", id, |note| {
            std::mem::replace(&mut note.color, color) != color
        })
    }

    pub fn set_labels(&mut self, id: &NoteId, labels: Vec<String>) -> Result<bool, StoreError> {
        self.modify("set_labels", id, |note| {
            let changed = note.labels != labels;
            note.labels = labels;
            changed
        })
    }

    pub fn set_attachments(
        &mut self,
        id: &NoteId,
        attachments: Vec<Attachment>,
    ) -> Result<bool, StoreError> {
        self.modify("set_attachments", id, |note| {
            let changed = note.attachments != attachments;
            note.attachments = attachments;
            changed
        })
    }

    pub fn set_due_date(
        &mut self,
        id: &NoteId,
        due_date: Option<SystemTime>,
    ) -> Result<bool, StoreError> {
        self.modify("set_due_date", id, |note| {
            std::mem::replace(&mut note.due_date, due_date) != due_date
        })
    }
}

/// Trash operations.
impl NoteStore {
    /// Moves a note to the trash. Idempotent.
    pub fn soft_delete(&mut self, id: &NoteId) -> Result<bool, StoreError> {
        self.modify("soft_delete", id, |note| {
            !std::mem::replace(&mut note.is_deleted, true)
        })
    }

    /// Takes a note back out of the trash. Idempotent.
    pub fn restore(&mut self, id: &NoteId) -> Result<bool, StoreError> {
        self.modify("restore", id, |note| {
            std::mem::replace(&mut note.is_deleted, false)
        })
    }

    /// Permanently removes every note in the trash. Returns how many were removed.
    pub fn purge(&mut self) -> Result<usize, StoreError> {
        let purged = self.mutate("purge", |notes| {
            let before = notes.len();
            notes.retain(|n| !n.is_deleted);
            let purged = before - notes.len();
            (purged, purged > 0)
        })?;
        if purged > 0 {
            info!(purged, "emptied trash");
        }
        Ok(purged)
    }
}

/// Internal helpers.
impl NoteStore {
    /// Authorization guard shared by all mutations.
    ///
    /// `f` returns the operation's output and whether the collection changed.
    fn mutate<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Vec<Note>) -> (T, bool),
    ) -> Result<T, StoreError> {
        if !self.gate.is_authenticated() {
            warn!(op, "mutation rejected without an active session");
            return Err(StoreError::AuthorizationRequired);
        }

        let (output, changed) = f(&mut self.notes);
        if changed {
            debug!(op, notes = self.notes.len(), "notes changed");
            for observer in &mut self.observers {
                observer.notes_changed(&self.notes);
            }
        }
        Ok(output)
    }

    fn modify(
        &mut self,
        op: &'static str,
        id: &NoteId,
        f: impl FnOnce(&mut Note) -> bool,
    ) -> Result<bool, StoreError> {
        self.mutate(op, |notes| match notes.iter_mut().find(|n| &n.id == id) {
            Some(note) => (true, f(note)),
            None => {
                debug!(op, note = %id, "note not found, nothing to do");
                (false, false)
            }
        })
    }
}
