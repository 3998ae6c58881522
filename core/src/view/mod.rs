//! Derived views over the note collection.
//!
//! Pure functions; nothing here mutates or stores notes. A view is computed in three
//! stages: section filter, then search, then sort (pinned first, newest update
//! first).

use crate::types::Note;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The top-level views a user can browse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Notes,
    Archive,
    Labels,
    Trash,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Notes,
        Section::Archive,
        Section::Labels,
        Section::Trash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Notes => "notes",
            Section::Archive => "archive",
            Section::Labels => "labels",
            Section::Trash => "trash",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Current UI filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub section: Section,
    /// Empty means no search.
    pub query: String,
    /// Only consulted in [`Section::Labels`].
    pub label: Option<String>,
}

impl ViewFilter {
    pub fn section(section: Section) -> Self {
        Self {
            section,
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Computes the ordered list of notes to display.
pub fn derive<'a>(notes: &'a [Note], filter: &ViewFilter) -> Vec<&'a Note> {
    let query = filter.query.to_lowercase();

    let mut view: Vec<&Note> = notes
        .iter()
        .filter(|note| in_section(note, filter.section, filter.label.as_deref()))
        .filter(|note| query.is_empty() || matches_query(note, &query))
        .collect();

    // `sort_by` is stable, so equal notes keep storage order.
    view.sort_by(|a, b| display_order(a, b));
    view
}

/// Every distinct label on any note, whatever its state. Sorted ascending.
pub fn label_index(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .flat_map(|note| note.labels.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn in_section(note: &Note, section: Section, label: Option<&str>) -> bool {
    match section {
        Section::Notes => note.is_active(),
        Section::Archive => note.is_archived && !note.is_deleted,
        // With no label picked this falls back to the notes view rather than
        // showing everything, so archived and trashed notes stay out.
        Section::Labels => match label {
            Some(label) => note.has_label(label) && note.is_active(),
            None => note.is_active(),
        },
        Section::Trash => note.is_deleted,
    }
}

/// `query` must already be lowercased.
fn matches_query(note: &Note, query: &str) -> bool {
    note.title.to_lowercase().contains(query)
        || note.content.to_lowercase().contains(query)
        || note
            .labels
            .iter()
            .any(|label| label.to_lowercase().contains(query))
}

fn display_order(a: &Note, b: &Note) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

#[cfg(test)]
mod tests;
