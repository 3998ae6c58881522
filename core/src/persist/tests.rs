use super::*;
use crate::store::NoteStore;
use crate::types::{Attachment, AttachmentKind, Config, NoteColor};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

mod common {
    use super::*;

    pub(super) fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    pub(super) fn create_redb_slot() -> (RedbSlot, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            base_path: temp_dir.path().to_path_buf(),
        };
        let slot = RedbSlot::open(&config, "notes").unwrap();
        (slot, temp_dir)
    }

    pub(super) fn sample_notes() -> Vec<Note> {
        let mut first = Note::new("first".into(), "one".into(), at(10));
        first.color = NoteColor::Yellow;
        first.labels = vec!["a".into(), "b".into()];
        first.attachments = vec![Attachment::new(
            AttachmentKind::File,
            "doc.pdf".into(),
            "blob:doc".into(),
            1234,
        )];
        let mut second = Note::new("second".into(), String::new(), at(20));
        second.is_deleted = true;
        second.due_date = Some(UNIX_EPOCH + Duration::new(30, 999));
        vec![first, second]
    }

    /// Slot whose writes fail while `failing` is set.
    #[derive(Clone, Default)]
    pub(super) struct FlakySlot {
        pub inner: MemorySlot,
        pub failing: Rc<Cell<bool>>,
    }

    impl Slot for FlakySlot {
        fn read(&self) -> Result<Option<String>, PersistenceError> {
            self.inner.read()
        }

        fn write(&mut self, payload: &str) -> Result<(), PersistenceError> {
            if self.failing.get() {
                return Err(std::io::Error::other("quota exceeded").into());
            }
            self.inner.write(payload)
        }
    }
}

mod load {
    use super::common::*;
    use super::*;

    #[test]
    fn test_empty_slot_loads_nothing() {
        let persistence = Persistence::new(MemorySlot::new());

        let loaded = persistence.load().unwrap();

        assert!(loaded.notes.is_empty());
        assert_eq!(loaded.dropped, 0);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let slot = MemorySlot::new();
        let mut persistence = Persistence::new(slot.clone());
        let notes = sample_notes();

        persistence.save(&notes).unwrap();
        let loaded = Persistence::new(slot).load().unwrap();

        assert_eq!(loaded.notes, notes);
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let persistence = Persistence::new(MemorySlot::with_payload("{{{"));

        assert!(matches!(
            persistence.load(),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn test_corrupt_payload_degrades_to_empty() {
        let persistence = Persistence::new(MemorySlot::with_payload("{{{"));

        assert!(persistence.load_or_empty().is_empty());
    }

    #[test]
    fn test_malformed_records_are_counted() {
        let payload = r#"[{"id": "ok", "createdAt": "2024-01-01T00:00:00Z"}, {"id": "broken"}]"#;
        let persistence = Persistence::new(MemorySlot::with_payload(payload));

        let loaded = persistence.load().unwrap();

        assert_eq!(loaded.notes.len(), 1);
        assert_eq!(loaded.dropped, 1);
        assert_eq!(persistence.load_or_empty().len(), 1);
    }
}

mod redb_slot {
    use super::common::*;
    use super::*;

    #[test]
    fn test_fresh_database_reads_none() {
        let (slot, _temp) = create_redb_slot();

        assert_eq!(slot.read().unwrap(), None);
        assert_eq!(slot.name(), "notes");
    }

    #[test]
    fn test_write_overwrites_previous_payload() {
        let (mut slot, _temp) = create_redb_slot();

        slot.write("[]").unwrap();
        slot.write("[1]").unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            base_path: temp_dir.path().join("data"),
        };
        let notes = sample_notes();

        {
            let slot = RedbSlot::open(&config, "notes").unwrap();
            Persistence::new(slot).save(&notes).unwrap();
        }

        let slot = RedbSlot::open(&config, "notes").unwrap();
        assert_eq!(Persistence::new(slot).load().unwrap().notes, notes);
    }

    #[test]
    fn test_slots_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            base_path: temp_dir.path().to_path_buf(),
        };

        {
            let mut work = RedbSlot::open(&config, "work").unwrap();
            work.write("[]").unwrap();
        }

        let home = RedbSlot::open(&config, "home").unwrap();
        assert_eq!(home.read().unwrap(), None);
    }
}

mod observer {
    use super::common::*;
    use super::*;

    #[test]
    fn test_store_saves_after_each_mutation() {
        let slot = MemorySlot::new();
        let mut store = NoteStore::open(Persistence::new(slot.clone()), true);

        let id = store.create("hello", "world", at(1)).unwrap();
        let saved = Persistence::new(slot.clone()).load().unwrap().notes;
        assert_eq!(saved, store.notes());

        store.toggle_pin(&id).unwrap();
        let saved = Persistence::new(slot).load().unwrap().notes;
        assert!(saved[0].is_pinned);
    }

    #[test]
    fn test_store_open_loads_existing_snapshot() {
        let slot = MemorySlot::new();
        let notes = sample_notes();
        Persistence::new(slot.clone()).save(&notes).unwrap();

        let store = NoteStore::open(Persistence::new(slot), true);

        assert_eq!(store.notes(), notes.as_slice());
    }

    #[test]
    fn test_failed_save_keeps_memory_and_next_save_catches_up() {
        let slot = FlakySlot::default();
        let mut store = NoteStore::open(Persistence::new(slot.clone()), true);

        slot.failing.set(true);
        let first = store.create("unsaved", "", at(1)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(slot.inner.payload(), None);

        slot.failing.set(false);
        store.create("second", "", at(2)).unwrap();

        let saved = Persistence::new(slot.inner.clone()).load().unwrap().notes;
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().any(|n| n.id == first));
    }

    #[test]
    fn test_rejected_mutation_does_not_save() {
        let slot = MemorySlot::new();
        let mut store = NoteStore::open(Persistence::new(slot.clone()), false);

        store.create("nope", "", at(1)).unwrap_err();

        assert_eq!(slot.payload(), None);
    }
}
