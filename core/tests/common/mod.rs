#![allow(dead_code)]

use quill_core::types::{Note, NoteId};
use quill_core::{NoteStore, Section, ViewFilter, view};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

pub fn signed_in_store() -> NoteStore {
    NoteStore::new(vec![], true)
}

pub fn ids_in(store: &NoteStore, section: Section) -> Vec<NoteId> {
    view::derive(store.notes(), &ViewFilter::section(section))
        .into_iter()
        .map(|note| note.id.clone())
        .collect()
}

pub fn titles(view: &[&Note]) -> Vec<String> {
    view.iter().map(|note| note.title.clone()).collect()
}
