//! In-memory note store.
//!
//! A complete in-process `NoteStore` implementation, used by the test
//! suite and by hosts running without a remote backend.

use std::sync::Mutex;

use uuid::Uuid;

use crate::models::{Note, NoteId};
use crate::store::{NoteQuery, NoteStore};
use crate::{Error, Result};

/// In-memory implementation of [`NoteStore`].
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<Vec<Note>>,
}

impl MemoryNoteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing note (test convenience).
    pub fn seed(&self, note: Note) {
        self.lock().push(note);
    }

    /// Fetch a note by ID, tolerating URL-embedded forms.
    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<Note> {
        self.lock()
            .iter()
            .find(|note| note.id.as_ref().is_some_and(|note_id| note_id.matches(id)))
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Note>> {
        self.notes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl NoteStore for MemoryNoteStore {
    async fn create(&self, note: &Note) -> Result<NoteId> {
        if note.id.is_some() {
            return Err(Error::InvalidInput(
                "Cannot create a note that already has an ID".to_string(),
            ));
        }

        let id = NoteId::new(Uuid::now_v7().to_string())?;
        let mut stored = note.clone();
        stored.id = Some(id.clone());
        self.lock().push(stored);
        Ok(id)
    }

    async fn overwrite(&self, note: &Note) -> Result<()> {
        let Some(id) = note.id.clone() else {
            return Err(Error::InvalidInput(
                "Cannot overwrite a note without an ID".to_string(),
            ));
        };

        let mut notes = self.lock();
        let entry = notes
            .iter_mut()
            .find(|stored| stored.id.as_ref().is_some_and(|note_id| note_id.matches(&id)));
        match entry {
            Some(stored) => {
                *stored = note.clone();
                Ok(())
            }
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    async fn query(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let notes = self
            .lock()
            .iter()
            .filter(|note| query.include_archived || !note.is_archived)
            .filter(|note| !query.published_only || note.published)
            .filter(|note| {
                query
                    .author_id
                    .as_deref()
                    .map_or(true, |author| note.author_id == author)
            })
            .cloned()
            .collect();
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft(title: &str) -> Note {
        let mut note = Note::draft("user-1");
        note.title = title.to_string();
        note
    }

    #[tokio::test]
    async fn create_assigns_stable_id() {
        let store = MemoryNoteStore::new();
        let id = store.create(&draft("First")).await.unwrap();

        let fetched = store.get(&id).unwrap();
        assert_eq!(fetched.title, "First");
        assert_eq!(fetched.id, Some(id));
    }

    #[tokio::test]
    async fn create_rejects_existing_id() {
        let store = MemoryNoteStore::new();
        let mut note = draft("First");
        note.id = Some(NoteId::new("abc123").unwrap());
        assert!(store.create(&note).await.is_err());
    }

    #[tokio::test]
    async fn overwrite_is_idempotent() {
        let store = MemoryNoteStore::new();
        let id = store.create(&draft("First")).await.unwrap();

        let mut updated = store.get(&id).unwrap();
        updated.title = "Renamed".to_string();
        store.overwrite(&updated).await.unwrap();
        store.overwrite(&updated).await.unwrap();

        assert_eq!(store.get(&id).unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn overwrite_unknown_note_fails() {
        let store = MemoryNoteStore::new();
        let mut note = draft("Ghost");
        note.id = Some(NoteId::new("missing").unwrap());
        assert!(matches!(
            store.overwrite(&note).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn query_filters() {
        let store = MemoryNoteStore::new();
        let id = store.create(&draft("Mine")).await.unwrap();

        let mut published = store.get(&id).unwrap();
        published.published = true;
        store.overwrite(&published).await.unwrap();

        let mut other = Note::draft("user-2");
        other.title = "Theirs".to_string();
        store.create(&other).await.unwrap();

        let mut archived = draft("Gone");
        archived.archive();
        store.create(&archived).await.unwrap();

        let all = store.query(&NoteQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let mine = store
            .query(&NoteQuery {
                author_id: Some("user-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Mine");

        let published = store
            .query(&NoteQuery {
                published_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(published.len(), 1);

        let with_archived = store
            .query(&NoteQuery {
                include_archived: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(with_archived.len(), 3);
    }
}
