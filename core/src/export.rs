//! Plain-text and markdown export of notes.

use crate::types::Note;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    #[default]
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            ExportFormat::Text => "\n\n\n",
            ExportFormat::Markdown => "\n\n---\n\n",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported export format: {0} (expected txt or md)")]
pub struct UnsupportedFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" | "text" => Ok(ExportFormat::Text),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

/// Renders one note. Title and content are written through unchanged.
pub fn render_note(note: &Note, format: ExportFormat) -> String {
    match format {
        ExportFormat::Text => format!("{}\n\n{}", note.title, note.content),
        ExportFormat::Markdown => format!("# {}\n\n{}", note.title, note.content),
    }
}

/// Suggested download name, e.g. `Groceries.md`, or `note.txt` for an untitled note.
pub fn file_name(note: &Note, format: ExportFormat) -> String {
    let stem: String = note
        .title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "note" } else { stem.as_str() };
    format!("{stem}.{}", format.extension())
}

/// Renders every note that is not in the trash, in the given order.
pub fn render_collection(notes: &[Note], format: ExportFormat) -> String {
    notes
        .iter()
        .filter(|note| !note.is_deleted)
        .map(|note| render_note(note, format))
        .collect::<Vec<_>>()
        .join(format.separator())
}
