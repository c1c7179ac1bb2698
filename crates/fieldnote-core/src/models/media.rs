//! Media reference model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// Media type and its kind-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image
    Image {
        /// Pixel width, when known
        width: Option<u32>,
        /// Pixel height, when known
        height: Option<u32>,
    },
    /// Video clip
    Video {
        /// Duration in milliseconds, when known
        duration_ms: Option<u64>,
    },
    /// Audio recording
    Audio {
        /// Duration in milliseconds, when known
        duration_ms: Option<u64>,
    },
}

/// A reference to an uploaded media object attached to a note.
///
/// The upload backend is out of scope here; a reference only carries
/// the URI handed back by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Object URI
    pub uri: String,
    /// Media kind with type-specific metadata
    #[serde(flatten)]
    pub kind: MediaKind,
}

impl MediaRef {
    /// Create a media reference with explicit kind metadata.
    pub fn new(uri: impl Into<String>, kind: MediaKind) -> Result<Self> {
        let uri = normalize_text_option(Some(uri.into()))
            .ok_or_else(|| Error::InvalidInput("Media URI cannot be empty".to_string()))?;
        Ok(Self { uri, kind })
    }

    /// Create an image reference without dimension metadata.
    pub fn image(uri: impl Into<String>) -> Result<Self> {
        Self::new(
            uri,
            MediaKind::Image {
                width: None,
                height: None,
            },
        )
    }

    /// Create a video reference without duration metadata.
    pub fn video(uri: impl Into<String>) -> Result<Self> {
        Self::new(uri, MediaKind::Video { duration_ms: None })
    }

    /// Create an audio reference without duration metadata.
    pub fn audio(uri: impl Into<String>) -> Result<Self> {
        Self::new(uri, MediaKind::Audio { duration_ms: None })
    }
}
