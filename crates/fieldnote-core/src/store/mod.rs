//! Remote document store contract.
//!
//! The sync engine only depends on this narrow trait; the actual
//! transport (HTTP, websocket, embedded replica) lives behind it and
//! is out of scope for this crate.

mod memory;

pub use memory::MemoryNoteStore;

use crate::models::{Note, NoteId};
use crate::Result;

/// Filter for querying notes from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    /// Restrict to notes authored by this user
    pub author_id: Option<String>,
    /// Restrict to published notes
    pub published_only: bool,
    /// Include archived notes (excluded by default)
    pub include_archived: bool,
}

/// Trait for remote note storage operations.
///
/// `overwrite` is assumed idempotent, and `create` returns a stable ID
/// usable for subsequent overwrite/query calls.
#[allow(async_fn_in_trait)]
pub trait NoteStore {
    /// Persist a draft for the first time, returning its assigned ID.
    async fn create(&self, note: &Note) -> Result<NoteId>;

    /// Overwrite a previously created note with the full given state.
    async fn overwrite(&self, note: &Note) -> Result<()>;

    /// Query notes matching the filter.
    async fn query(&self, query: &NoteQuery) -> Result<Vec<Note>>;
}
