pub(crate) mod config;
pub use config::{
    AppConfig, AppConfigError, Config, GeneralConfig, SessionConfig, StorageConfig, Theme,
};

pub(crate) mod id;
pub use id::{AttachmentId, Id, IdError, NoteId};

pub(crate) mod note;
pub use note::{
    Attachment, AttachmentKind, Note, NoteColor, NoteDraft, NotePatch, UnknownAttachmentKind,
    UnknownColor,
};

pub mod record;
