pub mod error;
pub mod export;
pub mod persist;
pub mod store;
pub mod types;
pub mod view;

pub use error::{Error, Result};
pub use persist::{MemorySlot, Persistence, RedbSlot, Slot};
pub use store::session::{Session, SessionGate, User};
pub use store::{NoteStore, StoreObserver};
pub use view::{Section, ViewFilter};
