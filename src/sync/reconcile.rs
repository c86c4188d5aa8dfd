//! Reconciliation of local state against the periodically polled backend
//! state.
//!
//! The backend is written by more than one actor (the scorer, the admin
//! panel, resets from the overview page), so every poll result is diffed
//! against local state and a list of adoption actions is derived. The diff
//! is one-directional: remote admin edits flow into the scorer, local
//! gameplay state is never clobbered except by an explicit remote reset.

use time::OffsetDateTime;

use crate::dao::models::GameStateEntity;
use crate::dto::game_state::GameStateResponse;
use crate::state::match_state::{GameMode, MatchState, Side};
use crate::state::state_machine::MatchEngine;

/// Which name inputs the operator is currently editing. Focused fields are
/// never overwritten by remote values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFocus {
    /// `player1` name input has focus.
    pub player1_name: bool,
    /// `player1` partner input has focus.
    pub player1_partner: bool,
    /// `player2` name input has focus.
    pub player2_name: bool,
    /// `player2` partner input has focus.
    pub player2_partner: bool,
}

impl FieldFocus {
    fn name_focused(&self, side: Side) -> bool {
        match side {
            Side::One => self.player1_name,
            Side::Two => self.player2_name,
        }
    }

    fn partner_focused(&self, side: Side) -> bool {
        match side {
            Side::One => self.player1_partner,
            Side::Two => self.player2_partner,
        }
    }
}

/// One adoption step derived from a poll result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileAction {
    /// The backend was reset by another actor: replace local state with the
    /// fetched defaults, stop timers and clear any running break.
    AdoptReset,
    /// An administrator reopened a locked match; re-enable the controls.
    UnlockMatch,
    /// Adopt a remotely edited player name.
    AdoptName {
        /// Slot to update.
        side: Side,
        /// New name.
        name: String,
    },
    /// Adopt a remotely edited partner name.
    AdoptPartner {
        /// Slot to update.
        side: Side,
        /// New partner name, if any.
        partner: Option<String>,
    },
    /// Adopt a remotely toggled doubles mode.
    AdoptDoubles(bool),
    /// Adopt a remotely changed scoring mode.
    AdoptGameMode(GameMode),
    /// A start timestamp appeared remotely; run the clock from it.
    TimerStarted(OffsetDateTime),
    /// An end timestamp appeared remotely; freeze the clock at it.
    TimerStopped(OffsetDateTime),
    /// The end timestamp was cleared remotely; the clock runs again.
    TimerResumed,
    /// The start timestamp was cleared remotely without a full reset.
    TimerCleared,
}

/// Diff local state against a polled backend snapshot.
pub fn diff(
    local: &MatchState,
    remote: &GameStateResponse,
    focus: FieldFocus,
) -> Vec<ReconcileAction> {
    let remote_is_blank = remote.player1.score == 0
        && remote.player2.score == 0
        && remote.player1.games == 0
        && remote.player2.games == 0
        && remote.match_start_time.is_none();

    // An external reset supersedes every field-level adoption.
    if remote_is_blank && local.has_activity() {
        return vec![ReconcileAction::AdoptReset];
    }

    let mut actions = Vec::new();

    if local.match_completed && !remote.match_completed {
        actions.push(ReconcileAction::UnlockMatch);
    }

    diff_names(local, remote, focus, &mut actions);

    if remote.is_doubles != local.is_doubles {
        actions.push(ReconcileAction::AdoptDoubles(remote.is_doubles));
    }
    if remote.game_mode != local.game_mode {
        actions.push(ReconcileAction::AdoptGameMode(remote.game_mode));
    }

    match (local.match_start, remote.match_start_time) {
        (None, Some(started)) => actions.push(ReconcileAction::TimerStarted(started)),
        (Some(_), None) => actions.push(ReconcileAction::TimerCleared),
        _ => {}
    }
    match (local.match_end, remote.match_end_time) {
        (None, Some(ended)) => actions.push(ReconcileAction::TimerStopped(ended)),
        (Some(_), None) => actions.push(ReconcileAction::TimerResumed),
        _ => {}
    }

    actions
}

fn diff_names(
    local: &MatchState,
    remote: &GameStateResponse,
    focus: FieldFocus,
    actions: &mut Vec<ReconcileAction>,
) {
    let remote_slot = |side: Side| match side {
        Side::One => &remote.player1,
        Side::Two => &remote.player2,
    };

    for side in [Side::One, Side::Two] {
        let local_slot = local.player(side);
        let remote_slot = remote_slot(side);

        if !focus.name_focused(side) && remote_slot.name != local_slot.name {
            actions.push(ReconcileAction::AdoptName {
                side,
                name: remote_slot.name.clone(),
            });
        }
        if !focus.partner_focused(side) && remote_slot.name2 != local_slot.partner {
            actions.push(ReconcileAction::AdoptPartner {
                side,
                partner: remote_slot.name2.clone(),
            });
        }
    }
}

/// Apply a derived action list to the engine.
pub fn apply(engine: &mut MatchEngine, remote: &GameStateResponse, actions: &[ReconcileAction]) {
    for action in actions {
        match action {
            ReconcileAction::AdoptReset => {
                let entity: GameStateEntity = remote.clone().into();
                let state = MatchState::from_entity(
                    entity,
                    remote.is_active,
                    remote.is_doubles,
                    remote.game_mode,
                );
                engine.replace_state(state);
            }
            ReconcileAction::UnlockMatch => {
                engine.state_mut().match_completed = false;
            }
            ReconcileAction::AdoptName { side, name } => {
                engine.state_mut().player_mut(*side).name = name.clone();
            }
            ReconcileAction::AdoptPartner { side, partner } => {
                engine.state_mut().player_mut(*side).partner = partner.clone();
            }
            ReconcileAction::AdoptDoubles(is_doubles) => {
                engine.state_mut().is_doubles = *is_doubles;
            }
            ReconcileAction::AdoptGameMode(game_mode) => {
                engine.state_mut().game_mode = *game_mode;
            }
            ReconcileAction::TimerStarted(started) => {
                engine.state_mut().match_start = Some(*started);
            }
            ReconcileAction::TimerStopped(ended) => {
                engine.state_mut().match_end = Some(*ended);
            }
            ReconcileAction::TimerResumed => {
                engine.state_mut().match_end = None;
            }
            ReconcileAction::TimerCleared => {
                engine.state_mut().match_start = None;
                engine.state_mut().match_end = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::config::PlaceholderNames;
    use crate::dao::models::CourtEntity;

    fn engine_with_score(score: u8) -> MatchEngine {
        let mut engine = MatchEngine::new(PlaceholderNames::default());
        for _ in 0..score.min(10) {
            engine.add_point(Side::One, datetime!(2025-03-01 18:00 UTC));
        }
        for _ in 10..score {
            engine.add_point(Side::One, datetime!(2025-03-01 18:00 UTC));
            engine.skip_rest_break();
        }
        engine
    }

    fn blank_remote() -> GameStateResponse {
        let placeholders = PlaceholderNames::default();
        let state = crate::dao::models::GameStateEntity::placeholder(
            crate::dao::models::PlayerEntity {
                name: placeholders.player1.clone(),
                partner: None,
                score: 0,
                games: 0,
            },
            crate::dao::models::PlayerEntity {
                name: placeholders.player2.clone(),
                partner: None,
                score: 0,
                games: 0,
            },
        );
        GameStateResponse::from_parts(state, &CourtEntity::new(1))
    }

    fn matching_remote(engine: &MatchEngine) -> GameStateResponse {
        let state = engine.state();
        let entity = engine.snapshot(datetime!(2025-03-01 18:05 UTC));
        let mut court = CourtEntity::new(1);
        court.is_doubles = state.is_doubles;
        court.game_mode = state.game_mode;
        GameStateResponse::from_parts(entity, &court)
    }

    #[test]
    fn remote_reset_supersedes_everything() {
        let engine = engine_with_score(15);
        assert_eq!(engine.state().player1.score, 15);

        let actions = diff(engine.state(), &blank_remote(), FieldFocus::default());
        assert_eq!(actions, vec![ReconcileAction::AdoptReset]);

        let mut engine = engine;
        let remote = blank_remote();
        apply(&mut engine, &remote, &actions);

        assert_eq!(engine.state().player1.score, 0);
        assert!(engine.state().match_start.is_none());
        assert!(!engine.state().match_completed);
        assert!(!engine.breaks().is_active());
    }

    #[test]
    fn matching_states_produce_no_actions() {
        let engine = engine_with_score(5);
        let remote = matching_remote(&engine);
        // The remote snapshot carries placeholder partners; align for the diff.
        assert_eq!(diff(engine.state(), &remote, FieldFocus::default()), vec![]);
    }

    #[test]
    fn blank_remote_with_blank_local_is_not_a_reset() {
        let engine = MatchEngine::new(PlaceholderNames::default());
        let remote = blank_remote();
        let actions = diff(engine.state(), &remote, FieldFocus::default());
        assert!(!actions.contains(&ReconcileAction::AdoptReset));
    }

    #[test]
    fn admin_unlock_is_adopted() {
        let mut engine = engine_with_score(3);
        engine.state_mut().match_completed = true;

        let mut remote = matching_remote(&engine);
        remote.match_completed = false;

        let actions = diff(engine.state(), &remote, FieldFocus::default());
        assert!(actions.contains(&ReconcileAction::UnlockMatch));

        apply(&mut engine, &remote, &actions);
        assert!(!engine.state().match_completed);
    }

    #[test]
    fn remote_names_are_adopted_unless_focused() {
        let mut engine = engine_with_score(3);
        let mut remote = matching_remote(&engine);
        remote.player1.name = "Anna".into();
        remote.player2.name2 = Some("Celine".into());

        let actions = diff(engine.state(), &remote, FieldFocus::default());
        assert!(actions.contains(&ReconcileAction::AdoptName {
            side: Side::One,
            name: "Anna".into()
        }));
        assert!(actions.contains(&ReconcileAction::AdoptPartner {
            side: Side::Two,
            partner: Some("Celine".into())
        }));

        apply(&mut engine, &remote, &actions);
        assert_eq!(engine.state().player1.name, "Anna");

        // With the input focused, the same remote edit is ignored.
        remote.player1.name = "Overwritten".into();
        let focus = FieldFocus {
            player1_name: true,
            ..Default::default()
        };
        let actions = diff(engine.state(), &remote, focus);
        assert!(
            !actions
                .iter()
                .any(|a| matches!(a, ReconcileAction::AdoptName { side: Side::One, .. }))
        );
    }

    #[test]
    fn doubles_and_game_mode_follow_the_court_record() {
        let mut engine = engine_with_score(2);
        let mut remote = matching_remote(&engine);
        remote.is_doubles = true;
        remote.game_mode = GameMode::Fifteen;

        let actions = diff(engine.state(), &remote, FieldFocus::default());
        assert!(actions.contains(&ReconcileAction::AdoptDoubles(true)));
        assert!(actions.contains(&ReconcileAction::AdoptGameMode(GameMode::Fifteen)));

        apply(&mut engine, &remote, &actions);
        assert!(engine.state().is_doubles);
        assert_eq!(engine.state().game_mode, GameMode::Fifteen);
    }

    #[test]
    fn remote_timestamps_adjust_the_clock_without_reset() {
        let mut engine = engine_with_score(3);
        let ended = datetime!(2025-03-01 18:30 UTC);
        let mut remote = matching_remote(&engine);
        remote.match_end_time = Some(ended);

        let actions = diff(engine.state(), &remote, FieldFocus::default());
        assert_eq!(actions, vec![ReconcileAction::TimerStopped(ended)]);
        apply(&mut engine, &remote, &actions);
        assert_eq!(engine.state().match_end, Some(ended));

        // And the reverse: the admin cleared the end timestamp.
        remote.match_end_time = None;
        let actions = diff(engine.state(), &remote, FieldFocus::default());
        assert_eq!(actions, vec![ReconcileAction::TimerResumed]);
        apply(&mut engine, &remote, &actions);
        assert!(engine.state().match_end.is_none());
    }
}
