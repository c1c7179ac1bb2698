//! Sync fingerprint computation.

use serde::Serialize;

use crate::models::{Note, NoteId, Tag};

/// Order-sensitive summary of the fields relevant to change detection.
///
/// Deliberately a subset of the note: low-churn fields (location,
/// media, capture time) are left out and never trigger a merge on
/// their own, though they still ride along when a tracked field
/// changes. Two fingerprints are equal iff every included field is
/// deep-equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFingerprint(String);

/// Serialization order is part of the fingerprint contract; reordering
/// these fields invalidates stored markers.
#[derive(Serialize)]
struct TrackedFields<'a> {
    id: Option<String>,
    published: bool,
    review_requested: bool,
    tags: &'a [Tag],
    comment_count: usize,
    body: &'a str,
    title: &'a str,
}

impl SyncFingerprint {
    /// Compute the fingerprint of a note.
    #[must_use]
    pub fn of(note: &Note) -> Self {
        let fields = TrackedFields {
            id: note.id.as_ref().map(NoteId::normalized),
            published: note.published,
            review_requested: note.review_requested,
            tags: &note.tags,
            comment_count: note.comment_count,
            body: &note.body,
            title: &note.title,
        };
        // Plain structs of strings and bools cannot fail to serialize.
        Self(serde_json::to_string(&fields).unwrap_or_default())
    }
}
