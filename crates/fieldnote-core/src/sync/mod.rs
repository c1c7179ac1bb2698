//! Note synchronization engine.
//!
//! Two writers converge on one shared mutable document: the local user
//! typing into the edit buffer, and the remote system (instructor
//! comments, collaborator edits) landing in the shared collection.
//! This module holds the pieces that keep them from clobbering each
//! other: the edit buffer, the debounced autosave scheduler, the
//! remote change detector, and the grace-window reconciler.

mod buffer;
mod debounce;
mod engine;
mod fingerprint;

pub use buffer::{EditBuffer, NoteChange};
pub use debounce::DebounceSlot;
pub use engine::{NoteSyncEngine, SaveState};
pub use fingerprint::SyncFingerprint;

use tokio::time::Duration;

/// Timing parameters for autosave and reconciliation.
///
/// The grace thresholds are tuning parameters, not semantic constants;
/// the only requirement is `short_grace <= long_grace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period before an update write fires
    pub update_debounce: Duration,
    /// Quiet period before the first-time create write fires
    pub create_debounce: Duration,
    /// Fixed interval between remote polls while foregrounded
    pub poll_interval: Duration,
    /// Minimum idle time before any remote overwrite is allowed
    pub short_grace: Duration,
    /// Minimum idle time before title/body may be overwritten
    pub long_grace: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            update_debounce: Duration::from_millis(500),
            create_debounce: Duration::from_millis(300),
            poll_interval: Duration::from_secs(15),
            short_grace: Duration::from_secs(2),
            long_grace: Duration::from_secs(5),
        }
    }
}

impl SyncConfig {
    /// Set the update debounce window.
    #[must_use]
    pub const fn with_update_debounce(mut self, delay: Duration) -> Self {
        self.update_debounce = delay;
        self
    }

    /// Set the create debounce window.
    #[must_use]
    pub const fn with_create_debounce(mut self, delay: Duration) -> Self {
        self.create_debounce = delay;
        self
    }

    /// Set the remote poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set both grace windows.
    #[must_use]
    pub const fn with_grace_windows(mut self, short: Duration, long: Duration) -> Self {
        self.short_grace = short;
        self.long_grace = long;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_orders_grace_windows() {
        let config = SyncConfig::default();
        assert!(config.short_grace <= config.long_grace);
        assert!(config.create_debounce <= config.update_debounce);
    }

    #[test]
    fn builder_overrides() {
        let config = SyncConfig::default()
            .with_poll_interval(Duration::from_secs(5))
            .with_grace_windows(Duration::from_secs(1), Duration::from_secs(3));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.short_grace, Duration::from_secs(1));
        assert_eq!(config.long_grace, Duration::from_secs(3));
    }
}
