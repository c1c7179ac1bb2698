//! Edit buffer for the note currently open in the editor.

use tokio::time::{Duration, Instant};

use crate::models::{GeoPoint, MediaRef, Note, NoteId, Tag};

/// A single user-initiated mutation of one editable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteChange {
    /// Replace the title
    Title(String),
    /// Replace the body markup
    Body(String),
    /// Replace the tag list
    Tags(Vec<Tag>),
    /// Set or clear the capture location
    Location(Option<GeoPoint>),
    /// Set the capture timestamp (Unix ms)
    CapturedAt(i64),
    /// Toggle the publish flag
    Published(bool),
    /// Toggle the review-request flag
    ReviewRequested(bool),
    /// Replace the attached media list
    Media(Vec<MediaRef>),
}

/// The locally-held, per-field-mutable copy of the note being edited.
///
/// Exactly one buffer exists per open note. User edits go through
/// [`EditBuffer::apply`], which stamps the last-local-edit instant;
/// mutations made by reconciliation or by the autosave bookkeeping do
/// not touch that stamp.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    note: Note,
    last_local_edit: Option<Instant>,
}

impl EditBuffer {
    /// Load a buffer from an authoritative note.
    ///
    /// Used on initial open; the edit stamp starts clear so an
    /// immediately-arriving remote change is not deferred.
    #[must_use]
    pub fn load(note: Note) -> Self {
        Self {
            note,
            last_local_edit: None,
        }
    }

    /// Apply a user edit and stamp the last-local-edit instant.
    ///
    /// Synchronous with no side effects beyond the buffer itself;
    /// persisting is the scheduler's job.
    pub fn apply(&mut self, change: NoteChange) {
        match change {
            NoteChange::Title(title) => self.note.title = title,
            NoteChange::Body(body) => self.note.body = body,
            NoteChange::Tags(tags) => self.note.tags = tags,
            NoteChange::Location(location) => self.note.location = location,
            NoteChange::CapturedAt(captured_at) => self.note.captured_at = captured_at,
            NoteChange::Published(published) => self.note.published = published,
            NoteChange::ReviewRequested(requested) => self.note.review_requested = requested,
            NoteChange::Media(media) => self.note.media = media,
        }
        self.last_local_edit = Some(Instant::now());
    }

    /// Record the comment count pushed in by reconciliation.
    ///
    /// Not a user edit; the edit stamp is left alone.
    pub fn set_comment_count(&mut self, count: usize) {
        self.note.comment_count = count;
    }

    /// Assign the store-issued ID after a successful create write.
    pub fn set_id(&mut self, id: NoteId) {
        self.note.id = Some(id);
    }

    /// Borrow the current note state.
    #[must_use]
    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Immutable copy of the current note state.
    #[must_use]
    pub fn snapshot(&self) -> Note {
        self.note.clone()
    }

    /// How long the buffer has been idle since the last user edit.
    ///
    /// `None` means no user edit has happened yet in this session.
    #[must_use]
    pub fn idle_for(&self) -> Option<Duration> {
        self.last_local_edit.map(|at| Instant::now() - at)
    }

    /// Overwrite the low-conflict field class from a remote note.
    ///
    /// These fields are toggled or picked rather than typed character
    /// by character, so they sync as soon as the short grace window has
    /// passed. Does not stamp the edit instant.
    pub fn apply_remote_metadata(&mut self, remote: &Note) {
        self.note.published = remote.published;
        self.note.review_requested = remote.review_requested;
        self.note.tags = remote.tags.clone();
        self.note.comment_count = remote.comment_count;
        self.note.media = remote.media.clone();
        self.note.location = remote.location.clone();
        self.note.captured_at = remote.captured_at;
    }

    /// Overwrite the high-conflict text fields from a remote note.
    ///
    /// Title and body are typed continuously; overwriting them
    /// mid-keystroke is the primary bug the grace windows prevent, so
    /// this only runs once the long grace window has passed.
    pub fn apply_remote_text(&mut self, remote: &Note) {
        self.note.title = remote.title.clone();
        self.note.body = remote.body.clone();
    }
}
