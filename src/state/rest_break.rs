//! Rest break countdown sub-state.
//!
//! A break suspends scoring while it is active. The controller only tracks
//! the countdown and the queued follow-up; enforcement (blocking
//! `add_point`) and persistence live in the match engine, which persists
//! break entry and exit immediately so remote displays pick them up within
//! one poll.

/// The two mandated pause kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// One-minute break when a score first reaches 11 points in a set.
    MidGame,
    /// Two-minute interval between sets.
    BetweenSets,
}

impl BreakKind {
    /// Countdown length in seconds.
    pub fn duration_secs(self) -> u32 {
        match self {
            BreakKind::MidGame => 60,
            BreakKind::BetweenSets => 120,
        }
    }

    /// Title shown on control panels and remote displays while the break
    /// runs.
    pub fn title(self) -> &'static str {
        match self {
            BreakKind::MidGame => "Rest Break - 1 Minute",
            BreakKind::BetweenSets => "Break Between Sets - 2 Minutes",
        }
    }
}

/// Action queued to run once a break ends, whether it expires or is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakFollowUp {
    /// Zero both scores and swap sides for the next set.
    ResetAndSwitch,
}

/// Result of advancing or skipping the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakTick {
    /// No break is active.
    Idle,
    /// Break still running with this many seconds left.
    Running(u32),
    /// Break just ended; the queued follow-up (if any) must run exactly once.
    Finished(Option<BreakFollowUp>),
}

#[derive(Debug, Clone)]
struct ActiveBreak {
    kind: BreakKind,
    seconds_left: u32,
    follow_up: Option<BreakFollowUp>,
}

/// Countdown controller cycling `Idle -> Active -> Idle`.
#[derive(Debug, Clone, Default)]
pub struct RestBreakController {
    current: Option<ActiveBreak>,
}

impl RestBreakController {
    /// Whether a break is currently suspending play.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Kind of the running break, if any.
    pub fn kind(&self) -> Option<BreakKind> {
        self.current.as_ref().map(|b| b.kind)
    }

    /// Seconds remaining, or 0 when idle.
    pub fn seconds_left(&self) -> u32 {
        self.current.as_ref().map_or(0, |b| b.seconds_left)
    }

    /// Title of the running break, or `None` when idle.
    pub fn title(&self) -> Option<&'static str> {
        self.current.as_ref().map(|b| b.kind.title())
    }

    /// Enter the `Active` state. A break already in progress is left
    /// untouched; the new request is ignored.
    pub fn begin(&mut self, kind: BreakKind, follow_up: Option<BreakFollowUp>) {
        if self.current.is_some() {
            return;
        }
        self.current = Some(ActiveBreak {
            kind,
            seconds_left: kind.duration_secs(),
            follow_up,
        });
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> BreakTick {
        let Some(active) = self.current.as_mut() else {
            return BreakTick::Idle;
        };

        active.seconds_left = active.seconds_left.saturating_sub(1);
        let remaining = active.seconds_left;
        if remaining == 0 {
            let finished = self.current.take().expect("active break present");
            BreakTick::Finished(finished.follow_up)
        } else {
            BreakTick::Running(remaining)
        }
    }

    /// End the break immediately, handing back the queued follow-up.
    pub fn skip(&mut self) -> BreakTick {
        match self.current.take() {
            Some(active) => BreakTick::Finished(active.follow_up),
            None => BreakTick::Idle,
        }
    }

    /// Drop any running break without handing out the follow-up. Used when
    /// remote state replaces local state wholesale.
    pub fn cancel(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_controller_ticks_idle() {
        let mut breaks = RestBreakController::default();
        assert!(!breaks.is_active());
        assert_eq!(breaks.tick(), BreakTick::Idle);
        assert_eq!(breaks.skip(), BreakTick::Idle);
    }

    #[test]
    fn countdown_strictly_decreases_to_finished() {
        let mut breaks = RestBreakController::default();
        breaks.begin(BreakKind::MidGame, None);
        assert_eq!(breaks.seconds_left(), 60);
        assert_eq!(breaks.title(), Some("Rest Break - 1 Minute"));

        let mut previous = 60;
        for _ in 0..59 {
            match breaks.tick() {
                BreakTick::Running(left) => {
                    assert!(left < previous);
                    previous = left;
                }
                other => panic!("expected running break, got {other:?}"),
            }
        }
        assert_eq!(breaks.tick(), BreakTick::Finished(None));
        assert!(!breaks.is_active());
    }

    #[test]
    fn skip_hands_back_follow_up_once() {
        let mut breaks = RestBreakController::default();
        breaks.begin(BreakKind::BetweenSets, Some(BreakFollowUp::ResetAndSwitch));
        assert_eq!(breaks.seconds_left(), 120);

        assert_eq!(
            breaks.skip(),
            BreakTick::Finished(Some(BreakFollowUp::ResetAndSwitch))
        );
        // A second skip finds nothing; the follow-up cannot run twice.
        assert_eq!(breaks.skip(), BreakTick::Idle);
    }

    #[test]
    fn begin_while_active_is_ignored() {
        let mut breaks = RestBreakController::default();
        breaks.begin(BreakKind::MidGame, None);
        breaks.tick();
        breaks.begin(BreakKind::BetweenSets, Some(BreakFollowUp::ResetAndSwitch));

        assert_eq!(breaks.kind(), Some(BreakKind::MidGame));
        assert_eq!(breaks.seconds_left(), 59);
    }

    #[test]
    fn cancel_discards_follow_up() {
        let mut breaks = RestBreakController::default();
        breaks.begin(BreakKind::BetweenSets, Some(BreakFollowUp::ResetAndSwitch));
        breaks.cancel();
        assert_eq!(breaks.tick(), BreakTick::Idle);
    }
}
