//! Note and attachment types.
//!
//! These are the in-memory shapes the store owns. The persisted shape lives in
//! [`crate::types::record`].

use crate::types::id::{AttachmentId, NoteId};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use thiserror::Error;

/// A single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub labels: Vec<String>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub due_date: Option<SystemTime>,
    pub attachments: Vec<Attachment>,
}

impl Note {
    pub(crate) fn new(title: String, content: String, now: SystemTime) -> Self {
        Self {
            id: NoteId::generate(),
            title,
            content,
            color: NoteColor::Default,
            is_pinned: false,
            is_archived: false,
            is_deleted: false,
            labels: vec![],
            created_at: now,
            updated_at: now,
            due_date: None,
            attachments: vec![],
        }
    }

    /// True when the note is neither archived nor in the trash.
    pub fn is_active(&self) -> bool {
        !self.is_archived && !self.is_deleted
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Fixed color palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NoteColor {
    #[default]
    Default,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
}

impl NoteColor {
    pub const ALL: [NoteColor; 8] = [
        NoteColor::Default,
        NoteColor::Red,
        NoteColor::Orange,
        NoteColor::Yellow,
        NoteColor::Green,
        NoteColor::Blue,
        NoteColor::Purple,
        NoteColor::Gray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NoteColor::Default => "default",
            NoteColor::Red => "red",
            NoteColor::Orange => "orange",
            NoteColor::Yellow => "yellow",
            NoteColor::Green => "green",
            NoteColor::Blue => "blue",
            NoteColor::Purple => "purple",
            NoteColor::Gray => "gray",
        }
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown note color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for NoteColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteColor::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// A file attached to a note. Owned by its note; no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: AttachmentId,
    pub kind: AttachmentKind,
    pub name: String,
    /// Opaque locator produced by whatever stores the bytes.
    pub url: String,
    pub size: u64,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, name: String, url: String, size: u64) -> Self {
        Self {
            id: AttachmentId::generate(),
            kind,
            name,
            url,
            size,
        }
    }

    /// Builds an attachment for an uploaded file, classifying it by MIME type.
    pub fn from_upload(name: String, mime_type: &str, url: String, size: u64) -> Self {
        let kind = if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        };
        Self::new(kind, name, url, size)
    }

    /// Size rounded to the nearest KiB, as shown next to the file name.
    pub fn size_kib(&self) -> u64 {
        (self.size + 512) / 1024
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Image,
    #[default]
    File,
}

impl AttachmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::File => "file",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown attachment type: {0}")]
pub struct UnknownAttachmentKind(pub String);

impl FromStr for AttachmentKind {
    type Err = UnknownAttachmentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(AttachmentKind::Image),
            "file" => Ok(AttachmentKind::File),
            other => Err(UnknownAttachmentKind(other.to_string())),
        }
    }
}

/// Partial update merged into an existing note.
///
/// `None` leaves a field untouched. `id` and `created_at` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<NoteColor>,
    pub is_pinned: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_deleted: Option<bool>,
    pub labels: Option<Vec<String>>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<SystemTime>>,
    pub attachments: Option<Vec<Attachment>>,
    pub updated_at: Option<SystemTime>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, note: &mut Note) {
        let NotePatch {
            title,
            content,
            color,
            is_pinned,
            is_archived,
            is_deleted,
            labels,
            due_date,
            attachments,
            updated_at,
        } = self;

        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        if let Some(color) = color {
            note.color = color;
        }
        if let Some(is_pinned) = is_pinned {
            note.is_pinned = is_pinned;
        }
        if let Some(is_archived) = is_archived {
            note.is_archived = is_archived;
        }
        if let Some(is_deleted) = is_deleted {
            note.is_deleted = is_deleted;
        }
        if let Some(labels) = labels {
            note.labels = labels;
        }
        if let Some(due_date) = due_date {
            note.due_date = due_date;
        }
        if let Some(attachments) = attachments {
            note.attachments = attachments;
        }
        if let Some(updated_at) = updated_at {
            note.updated_at = updated_at;
        }
    }
}

/// What an editor hands back on save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub due_date: Option<SystemTime>,
    pub attachments: Vec<Attachment>,
}

impl NoteDraft {
    /// A draft with neither title nor content produces no note.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }
}
