//! Comment model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::note::NoteId;

/// A unique identifier for a comment, using UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Create a new unique comment ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID.
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A character range within a note body that a comment is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    /// Range start offset (inclusive)
    pub start: usize,
    /// Range end offset (exclusive)
    pub end: usize,
}

impl TextRange {
    /// Create a validated text range.
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "Text range end {end} before start {start}"
            )));
        }
        Ok(Self { start, end })
    }
}

/// A comment attached to a note.
///
/// Comments are append-only from the editing surface; the only local
/// mutations are the resolved and archive flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Note this comment belongs to
    pub note_id: NoteId,
    /// Author identity
    pub author_id: String,
    /// Author display name
    pub author_name: String,
    /// Comment text
    pub text: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Optional anchor range within the note body
    pub range: Option<TextRange>,
    /// Parent comment for threaded replies
    pub parent_id: Option<CommentId>,
    /// Whether the comment has been resolved
    pub resolved: bool,
    /// Soft delete flag
    pub is_archived: bool,
}

impl Comment {
    /// Create a new top-level comment.
    pub fn new(
        note_id: NoteId,
        author_id: impl Into<String>,
        author_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self> {
        let author_id = author_id.into().trim().to_string();
        let author_name = author_name.into().trim().to_string();
        let text = text.into().trim().to_string();

        if author_id.is_empty() {
            return Err(Error::InvalidInput(
                "Comment author_id cannot be empty".to_string(),
            ));
        }
        if text.is_empty() {
            return Err(Error::InvalidInput(
                "Comment text cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: CommentId::new(),
            note_id,
            author_id,
            author_name,
            text,
            created_at: chrono::Utc::now().timestamp_millis(),
            range: None,
            parent_id: None,
            resolved: false,
            is_archived: false,
        })
    }

    /// Anchor this comment to a range of the note body.
    #[must_use]
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Thread this comment under a parent comment.
    #[must_use]
    pub fn in_reply_to(mut self, parent: CommentId) -> Self {
        self.parent_id = Some(parent);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_id() -> NoteId {
        NoteId::new("note-1").unwrap()
    }

    #[test]
    fn comment_id_unique() {
        assert_ne!(CommentId::new(), CommentId::new());
    }

    #[test]
    fn comment_id_parse() {
        let id = CommentId::new();
        let parsed: CommentId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn text_range_rejects_inverted() {
        assert!(TextRange::new(10, 4).is_err());
        assert!(TextRange::new(4, 4).is_ok());
    }

    #[test]
    fn comment_new_validation() {
        assert!(Comment::new(note_id(), "", "Prof. Stone", "Nice section").is_err());
        assert!(Comment::new(note_id(), "user-2", "Prof. Stone", "  ").is_err());

        let comment = Comment::new(note_id(), "user-2", "Prof. Stone", "Nice section").unwrap();
        assert!(!comment.resolved);
        assert!(!comment.is_archived);
        assert!(comment.range.is_none());
        assert!(comment.parent_id.is_none());
    }

    #[test]
    fn comment_threading() {
        let parent = Comment::new(note_id(), "user-2", "Prof. Stone", "Check this").unwrap();
        let reply = Comment::new(note_id(), "user-1", "Sam", "Done")
            .unwrap()
            .in_reply_to(parent.id)
            .with_range(TextRange::new(0, 5).unwrap());

        assert_eq!(reply.parent_id, Some(parent.id));
        assert_eq!(reply.range, Some(TextRange { start: 0, end: 5 }));
    }
}
