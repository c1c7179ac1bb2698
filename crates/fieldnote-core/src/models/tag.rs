//! Tag model

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagOrigin {
    /// Typed by the author
    User,
    /// Suggested by the tag-generation service and accepted
    Generated,
}

/// A tag attached to a note.
///
/// Labels are stored lowercase and must match `[a-z][a-z0-9 _-]*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag label (stored in lowercase)
    pub label: String,
    /// Tag origin
    pub origin: TagOrigin,
}

impl Tag {
    /// Create a user-authored tag.
    pub fn user(label: impl Into<String>) -> Result<Self> {
        Self::new(label, TagOrigin::User)
    }

    /// Create a service-generated tag.
    pub fn generated(label: impl Into<String>) -> Result<Self> {
        Self::new(label, TagOrigin::Generated)
    }

    fn new(label: impl Into<String>, origin: TagOrigin) -> Result<Self> {
        let label = label.into().trim().to_lowercase();
        if !is_valid_label(&label) {
            return Err(Error::InvalidInput(format!("Invalid tag label: {label}")));
        }
        Ok(Self { label, origin })
    }
}

/// Check whether a (lowercased) label is a valid tag label.
#[must_use]
pub fn is_valid_label(label: &str) -> bool {
    let re = Regex::new(r"^[a-z][a-z0-9 _-]*$").expect("Invalid regex");
    re.is_match(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_lowercases_label() {
        let tag = Tag::user("Geology").unwrap();
        assert_eq!(tag.label, "geology");
        assert_eq!(tag.origin, TagOrigin::User);
    }

    #[test]
    fn tag_trims_label() {
        let tag = Tag::generated("  river delta ").unwrap();
        assert_eq!(tag.label, "river delta");
        assert_eq!(tag.origin, TagOrigin::Generated);
    }

    #[test]
    fn tag_rejects_invalid_labels() {
        assert!(Tag::user("").is_err());
        assert!(Tag::user("   ").is_err());
        assert!(Tag::user("9lives").is_err());
        assert!(Tag::user("#hash").is_err());
    }

    #[test]
    fn valid_label_accepts_dashes_underscores() {
        assert!(is_valid_label("my-tag"));
        assert!(is_valid_label("another_tag"));
        assert!(!is_valid_label("-leading"));
    }
}
