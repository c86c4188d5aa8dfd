//! Scoring engine for a single court.
//!
//! The engine owns the [`MatchState`] and the rest break countdown and is the
//! only writer of either. Every mutator returns the list of [`Effect`]s the
//! caller must carry out (persist, notify, start a countdown); the engine
//! itself performs no I/O, which keeps the whole ruleset testable without a
//! network or a display.

use time::OffsetDateTime;

use crate::config::PlaceholderNames;
use crate::dao::models::GameStateEntity;
use crate::state::match_state::{GameModePolicy, MatchState, Side};
use crate::state::rest_break::{BreakFollowUp, BreakKind, BreakTick, RestBreakController};
use crate::state::timer;

/// Grace delay before a reset court drops off the TV display, keeping the
/// final score visible for a moment.
pub const NEW_MATCH_INACTIVE_GRACE_SECS: u16 = 20;

/// Side effects emitted by engine mutations, to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The match clock started: `matchStartTime` was stamped.
    TimerStarted,
    /// The match clock stopped: `matchEndTime` was stamped.
    TimerStopped,
    /// An undo cleared `matchEndTime`; the clock is running again.
    TimerResumed,
    /// The two slots were relabelled (manual switch, set rollover, decider).
    SidesSwitched,
    /// Sides were swapped at 11 points in the deciding game; surface a
    /// notice to the operator.
    DecidingGameSwitch,
    /// A rest break began; persist immediately so remote displays see it.
    RestBreakStarted(BreakKind),
    /// The rest break ended (expired or skipped); persist immediately.
    RestBreakEnded,
    /// A set was won but the match is still open; surface the continue/undo
    /// confirmation.
    SetWon {
        /// Slot that took the set.
        winner: Side,
    },
    /// The match-winning set was taken; surface the confirm/undo dialog.
    MatchWon {
        /// Slot that took the match.
        winner: Side,
    },
    /// The match result was confirmed and the state is now locked; push the
    /// outcome to the match history.
    MatchLocked(MatchOutcome),
    /// Schedule a debounced save of the current state.
    ScheduleSave,
    /// Persist the current state immediately, bypassing the debounce.
    SaveNow,
    /// Ask the backend to mark this court inactive after the given delay.
    MarkInactive {
        /// Seconds to wait before flipping the flag; 0 means immediately.
        delay_secs: u16,
    },
}

/// Completed-match summary pushed to the match history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Name of the winning player/pair.
    pub winner_name: String,
    /// Name of the losing player/pair.
    pub loser_name: String,
    /// Sets tally as `"2-0"` or `"2-1"`.
    pub games_won: String,
    /// Formatted match duration.
    pub duration: String,
    /// Concatenated per-set scores, e.g. `"Anna 21-10 Bo, Bo 21-19 Anna"`.
    pub set_scores: String,
}

/// Result of a minus-button tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovePointOutcome {
    /// Nothing to do: match locked, break running, or score already at 0.
    Ignored,
    /// Score decremented by one.
    Removed(Vec<Effect>),
    /// Score is 0 but the player holds sets: the operator is asking to
    /// unwind the last completed set. Confirm, then call
    /// [`MatchEngine::undo_last_set`].
    UndoRequested,
}

/// Decide whether either slot has won the current set under `policy`.
///
/// A set is won by reaching the win score with a two-point margin, or by
/// hitting the hard cap outright. At most one side can satisfy this for any
/// reachable score pair.
pub fn evaluate_set_win(score1: u8, score2: u8, policy: GameModePolicy) -> Option<Side> {
    let wins = |own: u8, other: u8| {
        (own >= policy.win_score && own.saturating_sub(other) >= 2) || own == policy.max_score
    };

    if wins(score1, score2) {
        Some(Side::One)
    } else if wins(score2, score1) {
        Some(Side::Two)
    } else {
        None
    }
}

/// State container and rule engine for one court's match.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    state: MatchState,
    breaks: RestBreakController,
    placeholders: PlaceholderNames,
}

impl MatchEngine {
    /// Fresh engine with placeholder names and an idle break controller.
    pub fn new(placeholders: PlaceholderNames) -> Self {
        Self {
            state: MatchState::with_placeholders(&placeholders),
            breaks: RestBreakController::default(),
            placeholders,
        }
    }

    /// Engine resuming from previously loaded state.
    pub fn from_state(state: MatchState, placeholders: PlaceholderNames) -> Self {
        Self {
            state,
            breaks: RestBreakController::default(),
            placeholders,
        }
    }

    /// Read access to the owned state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Mutable access for reconciliation actions that adopt remote fields.
    pub(crate) fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    /// Replace the owned state wholesale, e.g. when adopting a remote reset.
    /// Any running break is cancelled without its follow-up.
    pub fn replace_state(&mut self, state: MatchState) {
        self.breaks.cancel();
        self.state = state;
    }

    /// The rest break countdown owned by this engine.
    pub fn breaks(&self) -> &RestBreakController {
        &self.breaks
    }

    /// Award a point to `side`.
    ///
    /// No-op while the match is locked or a rest break is running. `now` is
    /// used to stamp `matchStartTime` on the very first point of the match
    /// and `matchEndTime` when the winning set falls.
    pub fn add_point(&mut self, side: Side, now: OffsetDateTime) -> Vec<Effect> {
        if self.state.match_completed || self.breaks.is_active() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        let first_point = !self.state.has_activity();

        let slot = self.state.player_mut(side);
        slot.score = slot.score.saturating_add(1);

        if first_point {
            self.state.match_start = Some(now);
            effects.push(Effect::TimerStarted);
        }

        let policy = self.state.game_mode.policy();
        let at_eleven = self.state.player1.score == 11 || self.state.player2.score == 11;

        // One-minute break the first time either score reaches 11 in a set.
        if policy.eleven_point_break && at_eleven && !self.state.rest_break_taken {
            self.state.rest_break_taken = true;
            self.breaks.begin(BreakKind::MidGame, None);
            effects.push(Effect::RestBreakStarted(BreakKind::MidGame));
            effects.push(Effect::SaveNow);
        }

        // In a 1-1 decider, swap ends the first time either score reaches 11.
        let deciding = self.state.player1.games == 1 && self.state.player2.games == 1;
        if deciding && at_eleven && !self.state.deciding_game_switched {
            self.state.deciding_game_switched = true;
            self.state.swap_sides();
            effects.push(Effect::SidesSwitched);
            effects.push(Effect::DecidingGameSwitch);
        }

        if let Some(winner) =
            evaluate_set_win(self.state.player1.score, self.state.player2.score, policy)
        {
            effects.extend(self.complete_set(winner, now));
        }

        effects.push(Effect::ScheduleSave);
        effects
    }

    /// Record the set that just ended and either close out the match or
    /// surface the set-won confirmation.
    fn complete_set(&mut self, winner: Side, now: OffsetDateTime) -> Vec<Effect> {
        self.state.player_mut(winner).games += 1;
        self.state.record_current_set();

        if self.state.player(winner).games >= 2 {
            self.state.match_end = Some(now);
            vec![Effect::TimerStopped, Effect::MatchWon { winner }]
        } else {
            vec![Effect::SetWon { winner }]
        }
    }

    /// Take a point back from `side`.
    pub fn remove_point(&mut self, side: Side) -> RemovePointOutcome {
        if self.state.match_completed || self.breaks.is_active() {
            return RemovePointOutcome::Ignored;
        }

        let player = self.state.player(side);
        if player.score == 0 {
            if player.games > 0 {
                return RemovePointOutcome::UndoRequested;
            }
            return RemovePointOutcome::Ignored;
        }

        self.state.player_mut(side).score -= 1;
        RemovePointOutcome::Removed(vec![Effect::ScheduleSave])
    }

    /// Continue play after a won set: start the two-minute interval break in
    /// 21-mode, or reset scores and swap ends immediately in 15-mode.
    pub fn continue_after_set(&mut self) -> Vec<Effect> {
        if self.state.match_completed || self.breaks.is_active() {
            return Vec::new();
        }

        if self.state.game_mode.policy().interval_break {
            self.breaks
                .begin(BreakKind::BetweenSets, Some(BreakFollowUp::ResetAndSwitch));
            vec![
                Effect::RestBreakStarted(BreakKind::BetweenSets),
                Effect::SaveNow,
            ]
        } else {
            self.apply_reset_and_switch();
            vec![Effect::SidesSwitched, Effect::ScheduleSave]
        }
    }

    /// Zero both scores for a new set and swap ends.
    fn apply_reset_and_switch(&mut self) {
        self.state.player1.score = 0;
        self.state.player2.score = 0;
        self.state.rest_break_taken = false;
        self.state.deciding_game_switched = false;
        self.state.swap_sides();
    }

    /// Lock the match after the operator confirmed the result.
    ///
    /// Returns the outcome to push to the match history; empty when no slot
    /// actually holds two sets or the match is already locked.
    pub fn confirm_match_won(&mut self) -> Vec<Effect> {
        if self.state.match_completed {
            return Vec::new();
        }
        let winner = if self.state.player1.games >= 2 {
            Side::One
        } else if self.state.player2.games >= 2 {
            Side::Two
        } else {
            return Vec::new();
        };

        self.state.match_completed = true;

        let loser = winner.opponent();
        let duration_secs = timer::elapsed_seconds(
            self.state.match_start,
            self.state.match_end,
            self.state.match_end.unwrap_or(OffsetDateTime::UNIX_EPOCH),
        );
        let set_scores = self
            .state
            .set_history
            .iter()
            .map(|set| format!("{} {} {}", set.player1_name, set.score, set.player2_name))
            .collect::<Vec<_>>()
            .join(", ");

        let outcome = MatchOutcome {
            winner_name: self.state.player(winner).name.clone(),
            loser_name: self.state.player(loser).name.clone(),
            games_won: format!(
                "{}-{}",
                self.state.player(winner).games,
                self.state.player(loser).games
            ),
            duration: timer::format_clock(duration_secs),
            set_scores,
        };

        vec![Effect::MatchLocked(outcome), Effect::SaveNow]
    }

    /// Unwind the most recently completed set.
    ///
    /// Restores both scores to the values just before the winning point (the
    /// winner is re-credited all but the final point), takes the set back
    /// from the winner, and reopens a locked match. No-op when the history
    /// is empty.
    pub fn undo_last_set(&mut self) -> Vec<Effect> {
        let Some(record) = self.state.set_history.pop() else {
            return Vec::new();
        };
        let Some((recorded1, recorded2)) = record.parse_score() else {
            // Malformed record from a foreign writer; keep it rather than guess.
            self.state.set_history.push(record);
            return Vec::new();
        };

        // The record is oriented as the slots were when the set ended; sides
        // may have been swapped since. Locate the winner by name first and
        // fall back to the recorded orientation when names were edited.
        let record_winner_is_p1 = recorded1 > recorded2;
        let record_winner_name = if record_winner_is_p1 {
            &record.player1_name
        } else {
            &record.player2_name
        };
        let winner = if *record_winner_name == self.state.player1.name {
            Side::One
        } else if *record_winner_name == self.state.player2.name {
            Side::Two
        } else if record_winner_is_p1 {
            Side::One
        } else {
            Side::Two
        };

        let same_orientation = (winner == Side::One) == record_winner_is_p1;
        let (score1, score2) = if same_orientation {
            (recorded1, recorded2)
        } else {
            (recorded2, recorded1)
        };

        self.state.player1.score = score1;
        self.state.player2.score = score2;
        let winning_slot = self.state.player_mut(winner);
        winning_slot.score = winning_slot.score.saturating_sub(1);
        winning_slot.games = winning_slot.games.saturating_sub(1);

        let mut effects = Vec::new();
        if self.state.match_end.take().is_some() {
            effects.push(Effect::TimerResumed);
        }
        self.state.match_completed = false;
        effects.push(Effect::ScheduleSave);
        effects
    }

    /// Rename a player; blank input falls back to the slot's placeholder.
    pub fn set_player_name(&mut self, side: Side, name: String) -> Vec<Effect> {
        let fallback = match side {
            Side::One => &self.placeholders.player1,
            Side::Two => &self.placeholders.player2,
        };
        let name = if name.trim().is_empty() {
            fallback.clone()
        } else {
            name
        };
        self.state.player_mut(side).name = name;
        vec![Effect::ScheduleSave]
    }

    /// Rename a doubles partner; blank input falls back to the placeholder.
    pub fn set_partner_name(&mut self, side: Side, partner: String) -> Vec<Effect> {
        let fallback = match side {
            Side::One => &self.placeholders.partner1,
            Side::Two => &self.placeholders.partner2,
        };
        let partner = if partner.trim().is_empty() {
            fallback.clone()
        } else {
            partner
        };
        self.state.player_mut(side).partner = Some(partner);
        vec![Effect::ScheduleSave]
    }

    /// Toggle between singles and doubles display.
    pub fn set_doubles(&mut self, is_doubles: bool) -> Vec<Effect> {
        self.state.is_doubles = is_doubles;
        vec![Effect::ScheduleSave]
    }

    /// Swap ends manually.
    pub fn switch_sides(&mut self) -> Vec<Effect> {
        self.state.swap_sides();
        vec![Effect::SidesSwitched, Effect::ScheduleSave]
    }

    /// Zero both scores for a fresh set, re-arming the 11-point break.
    pub fn reset_scores(&mut self) -> Vec<Effect> {
        self.state.player1.score = 0;
        self.state.player2.score = 0;
        self.state.rest_break_taken = false;
        vec![Effect::ScheduleSave]
    }

    /// Full reset for a new match on the same court: scores, sets, history,
    /// timestamps and the completion lock, keeping the entered names. The
    /// court stays visible on displays for a short grace period before going
    /// inactive.
    pub fn start_new_match(&mut self) -> Vec<Effect> {
        self.reset_match_fields();
        vec![
            Effect::ScheduleSave,
            Effect::MarkInactive {
                delay_secs: NEW_MATCH_INACTIVE_GRACE_SECS,
            },
        ]
    }

    /// Clear the court entirely: everything a new match resets, plus player
    /// names back to placeholders and an immediate inactive flag.
    pub fn clear_court(&mut self) -> Vec<Effect> {
        self.reset_match_fields();
        let fresh = MatchState::with_placeholders(&self.placeholders);
        self.state.player1 = fresh.player1;
        self.state.player2 = fresh.player2;
        vec![Effect::SaveNow, Effect::MarkInactive { delay_secs: 0 }]
    }

    fn reset_match_fields(&mut self) {
        self.breaks.cancel();
        self.state.player1.score = 0;
        self.state.player1.games = 0;
        self.state.player2.score = 0;
        self.state.player2.games = 0;
        self.state.set_history.clear();
        self.state.match_start = None;
        self.state.match_end = None;
        self.state.deciding_game_switched = false;
        self.state.rest_break_taken = false;
        self.state.match_completed = false;
    }

    /// Advance the rest break countdown by one second (1 Hz driver).
    pub fn tick_rest_break(&mut self) -> Vec<Effect> {
        match self.breaks.tick() {
            BreakTick::Idle => Vec::new(),
            // Keep remote displays in sync while the countdown runs.
            BreakTick::Running(_) => vec![Effect::ScheduleSave],
            BreakTick::Finished(follow_up) => self.finish_break(follow_up),
        }
    }

    /// End a running rest break early.
    pub fn skip_rest_break(&mut self) -> Vec<Effect> {
        match self.breaks.skip() {
            BreakTick::Finished(follow_up) => self.finish_break(follow_up),
            _ => Vec::new(),
        }
    }

    fn finish_break(&mut self, follow_up: Option<BreakFollowUp>) -> Vec<Effect> {
        let mut effects = vec![Effect::RestBreakEnded];
        if let Some(BreakFollowUp::ResetAndSwitch) = follow_up {
            self.apply_reset_and_switch();
            effects.push(Effect::SidesSwitched);
        }
        effects.push(Effect::SaveNow);
        effects
    }

    /// Serialize the full state for persistence, deriving the display timer
    /// from the timestamps.
    pub fn snapshot(&self, now: OffsetDateTime) -> GameStateEntity {
        GameStateEntity {
            player1: self.state.player1.clone().into(),
            player2: self.state.player2.clone().into(),
            timer_seconds: timer::elapsed_seconds(
                self.state.match_start,
                self.state.match_end,
                now,
            ),
            match_start: self.state.match_start,
            match_end: self.state.match_end,
            deciding_game_switched: self.state.deciding_game_switched,
            is_doubles: self.state.is_doubles,
            set_history: self
                .state
                .set_history
                .iter()
                .cloned()
                .map(Into::into)
                .collect(),
            rest_break_active: self.breaks.is_active(),
            rest_break_seconds_left: self.breaks.seconds_left(),
            rest_break_title: self.breaks.title().map(str::to_owned),
            rest_break_taken: self.state.rest_break_taken,
            match_completed: self.state.match_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::state::match_state::GameMode;

    fn now() -> OffsetDateTime {
        datetime!(2025-03-01 18:00 UTC)
    }

    fn engine() -> MatchEngine {
        MatchEngine::new(PlaceholderNames::default())
    }

    fn score_to(engine: &mut MatchEngine, side: Side, points: u8) {
        for _ in 0..points {
            engine.add_point(side, now());
        }
    }

    /// Run the set-won continue plus the interval break in one go.
    fn continue_and_skip_break(engine: &mut MatchEngine) {
        engine.continue_after_set();
        engine.skip_rest_break();
    }

    #[test]
    fn win_requires_two_point_margin_or_cap() {
        let p21 = GameMode::TwentyOne.policy();
        assert_eq!(evaluate_set_win(21, 10, p21), Some(Side::One));
        assert_eq!(evaluate_set_win(21, 20, p21), None);
        assert_eq!(evaluate_set_win(22, 20, p21), Some(Side::One));
        assert_eq!(evaluate_set_win(29, 28, p21), None);
        assert_eq!(evaluate_set_win(28, 30, p21), Some(Side::Two));
        assert_eq!(evaluate_set_win(10, 21, p21), Some(Side::Two));

        let p15 = GameMode::Fifteen.policy();
        assert_eq!(evaluate_set_win(15, 13, p15), Some(Side::One));
        assert_eq!(evaluate_set_win(15, 14, p15), None);
        assert_eq!(evaluate_set_win(14, 21, p15), Some(Side::Two));
    }

    #[test]
    fn win_is_symmetric_and_exclusive() {
        let policy = GameMode::TwentyOne.policy();
        for leader in 0..=30u8 {
            for trailer in 0..leader {
                let forward = evaluate_set_win(leader, trailer, policy);
                let reverse = evaluate_set_win(trailer, leader, policy);
                assert_ne!(forward, Some(Side::Two));
                assert_ne!(reverse, Some(Side::One));
                assert_eq!(forward == Some(Side::One), reverse == Some(Side::Two));
            }
        }
    }

    #[test]
    fn first_point_stamps_match_start_once() {
        let mut engine = engine();
        let effects = engine.add_point(Side::One, now());
        assert!(effects.contains(&Effect::TimerStarted));
        assert_eq!(engine.state().match_start, Some(now()));

        let later = now() + time::Duration::minutes(1);
        let effects = engine.add_point(Side::Two, later);
        assert!(!effects.contains(&Effect::TimerStarted));
        assert_eq!(engine.state().match_start, Some(now()));
    }

    #[test]
    fn straight_set_records_history_and_breaks() {
        let mut engine = engine();
        engine.state.player1.name = "Anna".into();
        engine.state.player2.name = "Bo".into();

        score_to(&mut engine, Side::Two, 10);
        for point in 1..=21u8 {
            let effects = engine.add_point(Side::One, now());
            if point == 11 {
                assert!(effects.contains(&Effect::RestBreakStarted(BreakKind::MidGame)));
                engine.skip_rest_break();
            }
            if point == 21 {
                assert!(effects.contains(&Effect::SetWon { winner: Side::One }));
            }
        }

        assert_eq!(engine.state().player1.games, 1);
        assert_eq!(engine.state().set_history.len(), 1);
        let record = &engine.state().set_history[0];
        assert_eq!(record.score, "21-10");
        assert_eq!(record.player1_name, "Anna");
        assert_eq!(record.player2_name, "Bo");

        // Continue starts the two-minute interval break in 21-mode.
        let effects = engine.continue_after_set();
        assert!(effects.contains(&Effect::RestBreakStarted(BreakKind::BetweenSets)));
        assert_eq!(engine.breaks().seconds_left(), 120);

        // Expiry resets scores and swaps ends.
        let effects = engine.skip_rest_break();
        assert!(effects.contains(&Effect::SidesSwitched));
        assert_eq!(engine.state().player1.name, "Bo");
        assert_eq!(engine.state().player1.score, 0);
        assert_eq!(engine.state().player2.score, 0);
        assert!(!engine.state().rest_break_taken);
    }

    #[test]
    fn fifteen_mode_has_no_breaks() {
        let mut engine = engine();
        engine.state.game_mode = GameMode::Fifteen;

        for _ in 0..15 {
            let effects = engine.add_point(Side::One, now());
            assert!(
                !effects
                    .iter()
                    .any(|e| matches!(e, Effect::RestBreakStarted(_)))
            );
        }

        // Continue resets and switches immediately, no countdown.
        let effects = engine.continue_after_set();
        assert!(effects.contains(&Effect::SidesSwitched));
        assert!(!engine.breaks().is_active());
        assert_eq!(engine.state().player1.score, 0);
        assert_eq!(engine.state().player2.score, 0);
    }

    #[test]
    fn rest_break_blocks_scoring() {
        let mut engine = engine();
        score_to(&mut engine, Side::One, 11);
        assert!(engine.breaks().is_active());

        let before = engine.state().player1.score;
        assert!(engine.add_point(Side::One, now()).is_empty());
        assert_eq!(engine.state().player1.score, before);
        assert_eq!(engine.remove_point(Side::One), RemovePointOutcome::Ignored);

        engine.skip_rest_break();
        assert!(!engine.add_point(Side::One, now()).is_empty());
    }

    #[test]
    fn eleven_point_break_fires_once_per_set() {
        let mut engine = engine();
        score_to(&mut engine, Side::One, 11);
        assert!(engine.state().rest_break_taken);
        engine.skip_rest_break();

        // The opponent reaching 11 later in the same set does not re-trigger.
        let mut saw_break = false;
        for _ in 0..11 {
            let effects = engine.add_point(Side::Two, now());
            saw_break |= effects
                .iter()
                .any(|e| matches!(e, Effect::RestBreakStarted(_)));
        }
        assert!(!saw_break);
    }

    #[test]
    fn deciding_game_switch_fires_exactly_once() {
        let mut engine = engine();
        engine.state.player1.name = "Anna".into();
        engine.state.player2.name = "Bo".into();
        engine.state.player1.games = 1;
        engine.state.player2.games = 1;
        engine.state.rest_break_taken = true; // keep the countdown out of the way

        score_to(&mut engine, Side::One, 10);
        let effects = engine.add_point(Side::One, now());
        assert!(effects.contains(&Effect::DecidingGameSwitch));
        assert!(engine.state().deciding_game_switched);
        // The scoring player moved to the other slot along with the score.
        assert_eq!(engine.state().player2.name, "Anna");
        assert_eq!(engine.state().player2.score, 11);

        // Bo (now slot one) reaching 11 later does not re-trigger the swap.
        score_to(&mut engine, Side::One, 11);
        assert_eq!(engine.state().player1.name, "Bo");
        assert_eq!(engine.state().player1.score, 11);
    }

    #[test]
    fn match_win_stamps_end_and_waits_for_confirmation() {
        let mut engine = engine();
        engine.state.player1.games = 1;
        engine.state.rest_break_taken = true;

        score_to(&mut engine, Side::One, 20);
        let effects = engine.add_point(Side::One, now());
        assert!(effects.contains(&Effect::TimerStopped));
        assert!(effects.contains(&Effect::MatchWon { winner: Side::One }));
        assert!(engine.state().match_end.is_some());

        // Not locked yet: scoring still works until the operator confirms.
        assert!(!engine.state().match_completed);
        assert!(!engine.add_point(Side::Two, now()).is_empty());

        let effects = engine.confirm_match_won();
        assert!(engine.state().match_completed);
        let outcome = effects
            .iter()
            .find_map(|e| match e {
                Effect::MatchLocked(outcome) => Some(outcome.clone()),
                _ => None,
            })
            .expect("match outcome");
        assert_eq!(outcome.games_won, "2-0");

        // Locked: every score mutation is refused.
        assert!(engine.add_point(Side::One, now()).is_empty());
        assert_eq!(engine.remove_point(Side::One), RemovePointOutcome::Ignored);
    }

    #[test]
    fn undo_is_left_inverse_of_set_win() {
        let mut engine = engine();
        engine.state.rest_break_taken = true;
        score_to(&mut engine, Side::Two, 15);
        score_to(&mut engine, Side::One, 20);

        let before = engine.state().clone();
        engine.add_point(Side::One, now());

        assert_eq!(engine.state().player1.games, 1);
        assert_eq!(engine.state().set_history.len(), 1);

        let effects = engine.undo_last_set();
        assert!(effects.contains(&Effect::ScheduleSave));
        assert_eq!(engine.state().player1.score, before.player1.score);
        assert_eq!(engine.state().player2.score, before.player2.score);
        assert_eq!(engine.state().player1.games, 0);
        assert!(engine.state().set_history.is_empty());
    }

    #[test]
    fn undo_reopens_a_won_match() {
        let mut engine = engine();
        engine.state.player2.games = 1;
        engine.state.rest_break_taken = true;

        score_to(&mut engine, Side::Two, 21);
        engine.confirm_match_won();
        assert!(engine.state().match_completed);
        assert!(engine.state().match_end.is_some());

        let effects = engine.undo_last_set();
        assert!(effects.contains(&Effect::TimerResumed));
        assert!(!engine.state().match_completed);
        assert!(engine.state().match_end.is_none());
        assert_eq!(engine.state().player2.games, 1);
        assert_eq!(engine.state().player2.score, 20);
    }

    #[test]
    fn undo_with_empty_history_is_a_no_op() {
        let mut engine = engine();
        score_to(&mut engine, Side::One, 5);
        let before = engine.state().clone();

        assert!(engine.undo_last_set().is_empty());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn undo_maps_winner_across_a_side_switch() {
        let mut engine = engine();
        engine.state.player1.name = "Anna".into();
        engine.state.player2.name = "Bo".into();
        engine.state.rest_break_taken = true;

        score_to(&mut engine, Side::Two, 10);
        score_to(&mut engine, Side::One, 21); // Anna takes the set 21-10
        continue_and_skip_break(&mut engine); // ends swapped: Bo is slot one

        assert_eq!(engine.state().player1.name, "Bo");
        engine.undo_last_set();

        // Anna, now in slot two, gets back 20 points and loses the set.
        assert_eq!(engine.state().player2.name, "Anna");
        assert_eq!(engine.state().player2.score, 20);
        assert_eq!(engine.state().player2.games, 0);
        assert_eq!(engine.state().player1.score, 10);
    }

    #[test]
    fn remove_point_at_zero_with_sets_requests_undo() {
        let mut engine = engine();
        engine.state.rest_break_taken = true;
        score_to(&mut engine, Side::One, 21);
        continue_and_skip_break(&mut engine);

        // Slot two now holds the set with a zeroed score.
        assert_eq!(
            engine.remove_point(Side::Two),
            RemovePointOutcome::UndoRequested
        );
        // A side with no sets and no points stays put.
        assert_eq!(engine.remove_point(Side::One), RemovePointOutcome::Ignored);
    }

    #[test]
    fn remove_point_floors_at_zero() {
        let mut engine = engine();
        score_to(&mut engine, Side::One, 2);
        assert!(matches!(
            engine.remove_point(Side::One),
            RemovePointOutcome::Removed(_)
        ));
        assert_eq!(engine.state().player1.score, 1);
        engine.remove_point(Side::One);
        assert_eq!(engine.remove_point(Side::One), RemovePointOutcome::Ignored);
    }

    #[test]
    fn new_match_keeps_names_and_delays_inactive() {
        let mut engine = engine();
        engine.state.player1.name = "Anna".into();
        score_to(&mut engine, Side::One, 21);
        continue_and_skip_break(&mut engine);

        let effects = engine.start_new_match();
        assert!(effects.contains(&Effect::MarkInactive {
            delay_secs: NEW_MATCH_INACTIVE_GRACE_SECS
        }));
        // Names survive a new match, everything else is zeroed.
        assert!(engine.state().player1.name == "Anna" || engine.state().player2.name == "Anna");
        assert_eq!(engine.state().player1.games, 0);
        assert!(engine.state().set_history.is_empty());
        assert!(engine.state().match_start.is_none());
        assert!(!engine.state().match_completed);
    }

    #[test]
    fn clear_court_restores_placeholders_immediately() {
        let mut engine = engine();
        engine.state.player1.name = "Anna".into();
        score_to(&mut engine, Side::One, 3);

        let effects = engine.clear_court();
        assert!(effects.contains(&Effect::SaveNow));
        assert!(effects.contains(&Effect::MarkInactive { delay_secs: 0 }));
        assert_eq!(engine.state().player1.name, "Player 1");
        assert_eq!(engine.state().player1.score, 0);
        assert!(engine.state().match_start.is_none());
    }

    #[test]
    fn snapshot_derives_timer_from_timestamps() {
        let mut engine = engine();
        engine.add_point(Side::One, now());

        let later = now() + time::Duration::seconds(90);
        let snapshot = engine.snapshot(later);
        assert_eq!(snapshot.timer_seconds, 90);
        assert_eq!(snapshot.match_start, Some(now()));
        assert!(!snapshot.rest_break_active);
    }
}
