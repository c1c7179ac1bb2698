//! Session and role information injected into the sync engine.
//!
//! The session is passed explicitly to consumers instead of living in a
//! global singleton, so tests can construct fake sessions freely.

use serde::{Deserialize, Serialize};

use crate::models::Note;

/// Roles granted to a signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    /// Instructor/administrator role; may review other users' notes
    pub administrator: bool,
    /// Regular contributor role; may author notes
    pub contributor: bool,
}

/// An authenticated (or anonymous) session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
    roles: Option<Roles>,
}

impl Session {
    /// Create a signed-in session.
    #[must_use]
    pub fn signed_in(user_id: impl Into<String>, roles: Roles) -> Self {
        Self {
            user_id: Some(user_id.into()),
            roles: Some(roles),
        }
    }

    /// Create an anonymous session with no identity or roles.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The signed-in user's identity, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The signed-in user's roles, if any.
    #[must_use]
    pub fn roles(&self) -> Option<Roles> {
        self.roles
    }

    /// Whether this session may edit the given note.
    ///
    /// Only the note's author edits it; everyone else gets a read-only
    /// view regardless of roles.
    #[must_use]
    pub fn can_edit(&self, note: &Note) -> bool {
        self.user_id
            .as_deref()
            .is_some_and(|user_id| note.author_id == user_id)
    }

    /// Whether this session is viewing the note in review mode.
    ///
    /// Review mode is an administrator looking at someone else's note;
    /// the autosave update path is hard-skipped for it.
    #[must_use]
    pub fn is_reviewing(&self, note: &Note) -> bool {
        self.roles.is_some_and(|roles| roles.administrator) && !self.can_edit(note)
    }
}
