use super::Slot;
use super::error::PersistenceError;
use crate::types::Config;
use redb::{ReadableDatabase, TableDefinition};
use std::cell::RefCell;
use std::rc::Rc;

/// Slot table: slot name → serialized snapshot
const SLOT_TABLE: TableDefinition<&str, &str> = TableDefinition::new("slots");

/// A named entry in the redb database under the data directory.
pub struct RedbSlot {
    db: redb::Database,
    name: String,
}

impl RedbSlot {
    /// Creates or opens the database at `config.db_path()`.
    pub fn open(config: &Config, name: impl Into<String>) -> Result<Self, PersistenceError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SLOT_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db,
            name: name.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Slot for RedbSlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOT_TABLE)?;

        Ok(table
            .get(self.name.as_str())?
            .map(|guard| guard.value().to_string()))
    }

    fn write(&mut self, payload: &str) -> Result<(), PersistenceError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SLOT_TABLE)?;
            table.insert(self.name.as_str(), payload)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// In-process slot. Clones share the same payload.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    payload: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Rc::new(RefCell::new(Some(payload.into()))),
        }
    }

    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.payload())
    }

    fn write(&mut self, payload: &str) -> Result<(), PersistenceError> {
        *self.payload.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}
