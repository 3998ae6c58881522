use nutype::nutype;
use uuid::Uuid;

/// Opaque identifier shared by notes and attachments.
///
/// Stored ids are kept byte for byte; only the empty string is rejected.
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct Id(String);

pub type NoteId = Id;
pub type AttachmentId = Id;

impl Id {
    /// Generates a fresh random (v4 UUID) identifier.
    pub fn generate() -> Self {
        Self::try_new(Uuid::new_v4().to_string()).expect("a UUID is always a valid id")
    }
}

#[cfg(test)]
mod tests;
