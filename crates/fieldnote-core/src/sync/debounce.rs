//! Single-slot debounce timer.

use tokio::time::{Duration, Instant};

/// A single-slot timer handle owned by the autosave scheduler.
///
/// At most one deadline is pending at any time; re-arming replaces the
/// previous deadline rather than stacking timers.
#[derive(Debug, Default)]
pub struct DebounceSlot {
    deadline: Option<Instant>,
}

impl DebounceSlot {
    /// Create an unarmed slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the slot to fire after `delay`.
    pub fn reset(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    /// Disarm the slot.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed.
    pub fn take_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
