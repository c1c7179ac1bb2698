//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

use super::media::MediaRef;
use super::tag::Tag;

/// An opaque identifier assigned by the remote document store.
///
/// The store hands IDs back in more than one shape: sometimes a bare
/// value, sometimes embedded at the tail of a resource URL. Matching
/// therefore succeeds when either the raw values or the normalized
/// values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap a raw ID value received from the store.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = normalize_text_option(Some(raw.into()))
            .ok_or_else(|| Error::InvalidInput("Note ID cannot be empty".to_string()))?;
        Ok(Self(raw))
    }

    /// Get the raw string representation of this ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reduce this ID to its canonical bare form.
    ///
    /// Strips any URL prefix down to the last path segment and
    /// percent-decodes it, so `"abc123"` and
    /// `"https://store/v1/id/abc123"` normalize to the same value.
    #[must_use]
    pub fn normalized(&self) -> String {
        let raw = self.0.trim().trim_end_matches('/');
        let tail = raw.rsplit('/').next().unwrap_or(raw);
        urlencoding::decode(tail).map_or_else(|_| tail.to_string(), |decoded| decoded.into_owned())
    }

    /// Check whether two IDs refer to the same note.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0 == other.0 || self.normalized() == other.normalized()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic point captured with a note.
///
/// Coordinates are kept as decimal strings, matching how the capture
/// surface records them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude as a decimal string
    pub lat: String,
    /// Longitude as a decimal string
    pub lon: String,
}

impl GeoPoint {
    /// Create a validated geographic point.
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Result<Self> {
        let lat = lat.into().trim().to_string();
        let lon = lon.into().trim().to_string();

        let lat_value: f64 = lat
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid latitude: {lat}")))?;
        let lon_value: f64 = lon
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid longitude: {lon}")))?;

        if !(-90.0..=90.0).contains(&lat_value) {
            return Err(Error::InvalidInput(format!(
                "Latitude out of range: {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lon_value) {
            return Err(Error::InvalidInput(format!(
                "Longitude out of range: {lon}"
            )));
        }

        Ok(Self { lat, lon })
    }
}

/// A note in the system.
///
/// A note without an ID is a draft that has never been written to the
/// remote store; drafts are excluded from remote-change detection until
/// the first create write assigns them an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier; `None` for an unsaved draft
    pub id: Option<NoteId>,
    /// Note title
    pub title: String,
    /// Rich-text body markup, treated as an opaque blob
    pub body: String,
    /// Ordered tags
    pub tags: Vec<Tag>,
    /// Optional capture location
    pub location: Option<GeoPoint>,
    /// Capture timestamp (Unix ms)
    pub captured_at: i64,
    /// Whether the note is published
    pub published: bool,
    /// Whether the author requested instructor review
    pub review_requested: bool,
    /// Author identity
    pub author_id: String,
    /// Ordered attached media references
    pub media: Vec<MediaRef>,
    /// Number of comments attached to this note
    pub comment_count: usize,
    /// Soft delete flag; archiving is terminal
    pub is_archived: bool,
}

impl Note {
    /// Create an empty draft authored by the given user.
    #[must_use]
    pub fn draft(author_id: impl Into<String>) -> Self {
        Self {
            id: None,
            title: String::new(),
            body: String::new(),
            tags: Vec::new(),
            location: None,
            captured_at: chrono::Utc::now().timestamp_millis(),
            published: false,
            review_requested: false,
            author_id: author_id.into(),
            media: Vec::new(),
            comment_count: 0,
            is_archived: false,
        }
    }

    /// Check whether the note carries meaningful content.
    ///
    /// A note qualifies with a non-blank title or body, or at least one
    /// attached media item. Autosave never persists notes without it.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.title.trim().is_empty() || !self.body.trim().is_empty() || !self.media.is_empty()
    }

    /// Soft-delete this note. There is no unarchive operation.
    pub fn archive(&mut self) {
        self.is_archived = true;
    }
}
