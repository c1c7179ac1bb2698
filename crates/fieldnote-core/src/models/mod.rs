//! Data models for Fieldnote

mod comment;
mod media;
mod note;
mod tag;

pub use comment::{Comment, CommentId, TextRange};
pub use media::{MediaKind, MediaRef};
pub use note::{GeoPoint, Note, NoteId};
pub use tag::{is_valid_label, Tag, TagOrigin};
