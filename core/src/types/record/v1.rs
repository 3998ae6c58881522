use super::RecordVariant;
use crate::types::id::{AttachmentId, NoteId};
use crate::types::note::{Attachment, AttachmentKind, Note, NoteColor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
}

impl RecordVariant for NoteRecord {
    const VERSION: u64 = 1;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: AttachmentId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            color: Some(note.color.as_str().to_string()),
            is_pinned: note.is_pinned,
            is_archived: note.is_archived,
            is_deleted: note.is_deleted,
            labels: note.labels.clone(),
            created_at: to_utc(note.created_at),
            updated_at: Some(to_utc(note.updated_at)),
            due_date: note.due_date.map(to_utc),
            attachments: note.attachments.iter().map(AttachmentRecord::from).collect(),
        }
    }
}

impl From<&Attachment> for AttachmentRecord {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.clone(),
            kind: Some(attachment.kind.as_str().to_string()),
            name: attachment.name.clone(),
            url: attachment.url.clone(),
            size: attachment.size,
        }
    }
}

/// Converts to a chrono timestamp. Instants beyond chrono's range (roughly
/// ±262,000 years) are clamped to its nearest bound.
pub(super) fn to_utc(time: SystemTime) -> DateTime<Utc> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (i64::try_from(after.as_secs()).ok(), after.subsec_nanos()),
        Err(err) => {
            let before = err.duration();
            let secs = i64::try_from(before.as_secs()).ok().map(|secs| -secs);
            match before.subsec_nanos() {
                0 => (secs, 0),
                nanos => (secs.and_then(|s| s.checked_sub(1)), 1_000_000_000 - nanos),
            }
        }
    };

    match secs.and_then(|secs| DateTime::from_timestamp(secs, nanos)) {
        Some(utc) => utc,
        None => {
            let bound = if time > UNIX_EPOCH {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            };
            warn!(%bound, "timestamp out of range, clamping");
            bound
        }
    }
}

impl NoteRecord {
    /// Converts to the in-memory note, coercing unknown enum tags to their defaults.
    pub fn into_note(self) -> Note {
        let color = match self.color.as_deref() {
            None | Some("") => NoteColor::Default,
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!(note = %self.id, %err, "coercing note color to default");
                NoteColor::Default
            }),
        };

        let created_at = SystemTime::from(self.created_at);
        let updated_at = self.updated_at.map(SystemTime::from).unwrap_or(created_at);

        Note {
            attachments: self
                .attachments
                .into_iter()
                .map(AttachmentRecord::into_attachment)
                .collect(),
            id: self.id,
            title: self.title,
            content: self.content,
            color,
            is_pinned: self.is_pinned,
            is_archived: self.is_archived,
            is_deleted: self.is_deleted,
            labels: self.labels,
            created_at,
            updated_at,
            due_date: self.due_date.map(SystemTime::from),
        }
    }
}

impl AttachmentRecord {
    pub fn into_attachment(self) -> Attachment {
        let kind = match self.kind.as_deref() {
            None => AttachmentKind::File,
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!(attachment = %self.id, %err, "coercing attachment type to file");
                AttachmentKind::File
            }),
        };

        Attachment {
            id: self.id,
            kind,
            name: self.name,
            url: self.url,
            size: self.size,
        }
    }
}
