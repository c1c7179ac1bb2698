//! fieldnote-core - Core library for Fieldnote
//!
//! This crate contains the shared models, the cross-component note
//! cache, and the note synchronization engine used by all Fieldnote
//! editing surfaces.

pub mod collection;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod sync;
mod util;

pub use collection::SharedNoteCollection;
pub use error::{Error, Result};
pub use models::{Note, NoteId};
pub use session::{Roles, Session};
pub use sync::{NoteChange, NoteSyncEngine, SaveState, SyncConfig};
