//! Debounced save scheduling.
//!
//! Mutations coalesce into at most one network write per debounce window,
//! with a single save in flight at any time. The flow is an explicit state
//! machine (`Idle -> Scheduled -> Saving -> Idle`, with a pending branch
//! while a save is in flight) instead of nested timeouts and boolean flags,
//! so the race-prone transitions are ordinary match arms that unit tests can
//! walk through.

use std::time::Duration;

/// Coalescing window for debounced saves.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);
/// Backoff before retrying a failed save.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(5);
/// Delay before running a save that queued up behind an in-flight one.
pub const PENDING_RETRY: Duration = Duration::from_millis(100);

/// Where the save pipeline currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    /// Nothing to save.
    Idle,
    /// A save is armed and waiting for its debounce timer.
    Scheduled,
    /// A save is on the wire.
    Saving,
    /// A save is on the wire and another mutation arrived meanwhile.
    SavingPending,
}

/// Pure state machine deciding when the save loop should write.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    phase: SavePhase,
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self {
            phase: SavePhase::Idle,
        }
    }
}

impl SaveScheduler {
    /// Current phase.
    pub fn phase(&self) -> SavePhase {
        self.phase
    }

    /// A mutation happened. Returns the delay to (re)arm the timer with, or
    /// `None` when a save is already in flight and the mutation was queued
    /// behind it.
    pub fn request_save(&mut self) -> Option<Duration> {
        match self.phase {
            SavePhase::Idle | SavePhase::Scheduled => {
                self.phase = SavePhase::Scheduled;
                Some(SAVE_DEBOUNCE)
            }
            SavePhase::Saving | SavePhase::SavingPending => {
                self.phase = SavePhase::SavingPending;
                None
            }
        }
    }

    /// The armed timer fired. Returns `true` when a save should start now.
    pub fn timer_fired(&mut self) -> bool {
        match self.phase {
            SavePhase::Scheduled => {
                self.phase = SavePhase::Saving;
                true
            }
            _ => false,
        }
    }

    /// Bypass the debounce (break entry/exit, match lock, shutdown).
    /// Returns `true` when a save should start immediately; when one is
    /// already in flight the request is queued behind it instead.
    pub fn flush(&mut self) -> bool {
        match self.phase {
            SavePhase::Idle | SavePhase::Scheduled => {
                self.phase = SavePhase::Saving;
                true
            }
            SavePhase::Saving | SavePhase::SavingPending => {
                self.phase = SavePhase::SavingPending;
                false
            }
        }
    }

    /// The in-flight save finished. Returns the delay to re-arm the timer
    /// with: a short pending delay when mutations queued up, the retry
    /// backoff on failure, or `None` when the pipeline drained.
    pub fn save_finished(&mut self, success: bool) -> Option<Duration> {
        match (self.phase, success) {
            (SavePhase::Saving, true) => {
                self.phase = SavePhase::Idle;
                None
            }
            (SavePhase::SavingPending, true) => {
                self.phase = SavePhase::Scheduled;
                Some(PENDING_RETRY)
            }
            // Failure keeps the state dirty regardless of queued mutations.
            (SavePhase::Saving | SavePhase::SavingPending, false) => {
                self.phase = SavePhase::Scheduled;
                Some(RETRY_BACKOFF)
            }
            (phase, _) => {
                debug_assert!(
                    false,
                    "save_finished called while not saving (phase {phase:?})"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_coalesce_into_one_save() {
        let mut scheduler = SaveScheduler::default();

        assert_eq!(scheduler.request_save(), Some(SAVE_DEBOUNCE));
        // Further mutations only restart the window.
        assert_eq!(scheduler.request_save(), Some(SAVE_DEBOUNCE));
        assert_eq!(scheduler.request_save(), Some(SAVE_DEBOUNCE));
        assert_eq!(scheduler.phase(), SavePhase::Scheduled);

        assert!(scheduler.timer_fired());
        assert_eq!(scheduler.phase(), SavePhase::Saving);

        assert_eq!(scheduler.save_finished(true), None);
        assert_eq!(scheduler.phase(), SavePhase::Idle);
    }

    #[test]
    fn mutation_during_save_queues_exactly_one_follow_up() {
        let mut scheduler = SaveScheduler::default();
        scheduler.request_save();
        scheduler.timer_fired();

        // Two mutations arrive while the save is on the wire.
        assert_eq!(scheduler.request_save(), None);
        assert_eq!(scheduler.request_save(), None);
        assert_eq!(scheduler.phase(), SavePhase::SavingPending);

        // Completion re-arms a short follow-up save.
        assert_eq!(scheduler.save_finished(true), Some(PENDING_RETRY));
        assert_eq!(scheduler.phase(), SavePhase::Scheduled);
        assert!(scheduler.timer_fired());
        assert_eq!(scheduler.save_finished(true), None);
    }

    #[test]
    fn failed_save_retries_with_backoff() {
        let mut scheduler = SaveScheduler::default();
        scheduler.request_save();
        scheduler.timer_fired();

        assert_eq!(scheduler.save_finished(false), Some(RETRY_BACKOFF));
        assert_eq!(scheduler.phase(), SavePhase::Scheduled);

        // The retry fires like a regular scheduled save.
        assert!(scheduler.timer_fired());
        assert_eq!(scheduler.save_finished(true), None);
        assert_eq!(scheduler.phase(), SavePhase::Idle);
    }

    #[test]
    fn timer_is_ignored_outside_scheduled() {
        let mut scheduler = SaveScheduler::default();
        assert!(!scheduler.timer_fired());

        scheduler.request_save();
        scheduler.timer_fired();
        // A stale timer firing during the save does not start a second one.
        assert!(!scheduler.timer_fired());
    }

    #[test]
    fn flush_bypasses_the_debounce() {
        let mut scheduler = SaveScheduler::default();
        scheduler.request_save();

        assert!(scheduler.flush());
        assert_eq!(scheduler.phase(), SavePhase::Saving);
        assert_eq!(scheduler.save_finished(true), None);
    }

    #[test]
    fn flush_during_save_queues_instead_of_racing() {
        let mut scheduler = SaveScheduler::default();
        scheduler.request_save();
        scheduler.timer_fired();

        assert!(!scheduler.flush());
        assert_eq!(scheduler.phase(), SavePhase::SavingPending);
    }
}
