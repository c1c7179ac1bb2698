//! Shared in-memory note collection.
//!
//! All open views of notes (editor, list, map, story feed) read from
//! and write to one collection instance. Whichever component last wrote
//! to it is trusted to have confirmed that write with the remote store,
//! so the collection acts as the local source of truth between fetches.
//!
//! Observers subscribe to a version counter instead of hooking into a
//! framework reactivity system; dropping the receiver is the
//! unsubscribe.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::models::{Note, NoteId};

/// Cross-component in-memory note cache.
#[derive(Clone)]
pub struct SharedNoteCollection {
    inner: Arc<Inner>,
}

struct Inner {
    notes: Mutex<Vec<Note>>,
    version: watch::Sender<u64>,
}

impl SharedNoteCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                notes: Mutex::new(Vec::new()),
                version,
            }),
        }
    }

    /// Snapshot of all active (non-archived) notes.
    #[must_use]
    pub fn notes(&self) -> Vec<Note> {
        self.lock()
            .iter()
            .filter(|note| !note.is_archived)
            .cloned()
            .collect()
    }

    /// Look up an active note by ID, tolerating URL-embedded forms.
    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<Note> {
        self.lock()
            .iter()
            .filter(|note| !note.is_archived)
            .find(|note| note.id.as_ref().is_some_and(|note_id| note_id.matches(id)))
            .cloned()
    }

    /// Add a note to the collection.
    pub fn append(&self, note: Note) {
        self.lock().push(note);
        self.bump();
    }

    /// Apply a mutation to the note matching `id`.
    ///
    /// Returns `false` without notifying subscribers when no active
    /// note matches.
    pub fn upsert(&self, id: &NoteId, apply: impl FnOnce(&mut Note)) -> bool {
        let found = {
            let mut notes = self.lock();
            let entry = notes.iter_mut().filter(|note| !note.is_archived).find(|note| {
                note.id.as_ref().is_some_and(|note_id| note_id.matches(id))
            });
            match entry {
                Some(note) => {
                    apply(note);
                    true
                }
                None => false,
            }
        };

        if found {
            self.bump();
        }
        found
    }

    /// Subscribe to collection updates.
    ///
    /// The receiver observes a monotonically increasing version; each
    /// mutation bumps it once.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    /// The current collection version.
    #[must_use]
    pub fn version(&self) -> u64 {
        *self.inner.version.borrow()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Note>> {
        self.inner
            .notes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn bump(&self) {
        self.inner.version.send_modify(|version| *version += 1);
    }
}

impl Default for SharedNoteCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note_with_id(raw: &str) -> Note {
        let mut note = Note::draft("user-1");
        note.id = Some(NoteId::new(raw).unwrap());
        note.title = format!("note {raw}");
        note
    }

    #[test]
    fn append_and_get() {
        let collection = SharedNoteCollection::new();
        collection.append(note_with_id("abc123"));

        let fetched = collection.get(&NoteId::new("abc123").unwrap()).unwrap();
        assert_eq!(fetched.title, "note abc123");
    }

    #[test]
    fn get_matches_url_embedded_id() {
        let collection = SharedNoteCollection::new();
        collection.append(note_with_id("abc123"));

        let embedded = NoteId::new("https://store/v1/id/abc123").unwrap();
        assert!(collection.get(&embedded).is_some());
    }

    #[test]
    fn archived_notes_are_excluded() {
        let collection = SharedNoteCollection::new();
        let mut note = note_with_id("abc123");
        note.archive();
        collection.append(note);

        assert!(collection.notes().is_empty());
        assert!(collection.get(&NoteId::new("abc123").unwrap()).is_none());
    }

    #[test]
    fn upsert_bumps_version_only_on_match() {
        let collection = SharedNoteCollection::new();
        collection.append(note_with_id("abc123"));
        let version = collection.version();

        let updated = collection.upsert(&NoteId::new("abc123").unwrap(), |note| {
            note.published = true;
        });
        assert!(updated);
        assert_eq!(collection.version(), version + 1);
        assert!(collection.get(&NoteId::new("abc123").unwrap()).unwrap().published);

        let missing = collection.upsert(&NoteId::new("nope").unwrap(), |note| {
            note.published = false;
        });
        assert!(!missing);
        assert_eq!(collection.version(), version + 1);
    }

    #[tokio::test]
    async fn subscribers_observe_mutations() {
        let collection = SharedNoteCollection::new();
        let mut updates = collection.subscribe();

        collection.append(note_with_id("abc123"));
        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow_and_update(), 1);
    }
}
