//! Reads, upserts and resets of per-court game state.
//!
//! The server trusts client-computed state: no badminton rule is
//! re-validated here. The one piece of server-side derivation is the court
//! activity flag, which is set (never cleared) whenever a write carries any
//! gameplay activity.

use crate::{
    config::PlaceholderNames,
    dao::models::{CourtUpdateEntity, GameStateEntity, PlayerEntity},
    dto::game_state::{GameStateResponse, GameStateUpdate},
    error::ServiceError,
    state::SharedState,
};

/// Full game state for a court, merged with the court record. Courts without
/// a stored game yet answer with placeholder defaults.
pub async fn get_game_state(
    state: &SharedState,
    court_number: u16,
) -> Result<GameStateResponse, ServiceError> {
    let store = state.require_court_store().await?;
    let Some(court) = store.find_court(court_number).await? else {
        return Err(ServiceError::NotFound(format!(
            "court {court_number} not found"
        )));
    };

    let entity = match store.find_game_state(court_number).await? {
        Some(entity) => entity,
        None => placeholder_state(state.config().placeholders()),
    };

    Ok(GameStateResponse::from_parts(entity, &court))
}

/// Upsert the game state pushed by a scorer or the admin panel.
///
/// Unless `skip_auto_active` is set (admin edits), a write carrying any
/// score, set or timer activity marks the court active. Activity never
/// clears the flag; only an explicit court update or a reset does.
pub async fn upsert_game_state(
    state: &SharedState,
    court_number: u16,
    update: GameStateUpdate,
    skip_auto_active: bool,
) -> Result<(), ServiceError> {
    let store = state.require_court_store().await?;
    if store.find_court(court_number).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "court {court_number} not found"
        )));
    }

    let mut entity: GameStateEntity = update.into();
    fill_missing_names(&mut entity, state.config().placeholders());

    store.save_game_state(court_number, entity.clone()).await?;

    // Scorer writes keep the court record's doubles flag fresh and derive
    // activity; admin edits (skip_auto_active) leave the record alone.
    if !skip_auto_active {
        let court_update = CourtUpdateEntity {
            is_active: entity.has_activity().then_some(true),
            is_doubles: Some(entity.is_doubles),
            game_mode: None,
        };
        store.update_court(court_number, court_update).await?;
    }

    Ok(())
}

/// Administrator reset: drop the stored state and mark the court inactive.
pub async fn delete_game_state(
    state: &SharedState,
    court_number: u16,
) -> Result<(), ServiceError> {
    let store = state.require_court_store().await?;
    if store.find_court(court_number).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "court {court_number} not found"
        )));
    }

    store.delete_game_state(court_number).await?;
    store
        .update_court(
            court_number,
            CourtUpdateEntity {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;

    Ok(())
}

/// Default state served for a court with nothing stored yet.
fn placeholder_state(names: &PlaceholderNames) -> GameStateEntity {
    GameStateEntity::placeholder(
        PlayerEntity {
            name: names.player1.clone(),
            partner: Some(names.partner1.clone()),
            score: 0,
            games: 0,
        },
        PlayerEntity {
            name: names.player2.clone(),
            partner: Some(names.partner2.clone()),
            score: 0,
            games: 0,
        },
    )
}

/// Blank names in a write fall back to the court placeholders so displays
/// never render an empty label.
fn fill_missing_names(entity: &mut GameStateEntity, names: &PlaceholderNames) {
    if entity.player1.name.trim().is_empty() {
        entity.player1.name = names.player1.clone();
    }
    if entity.player2.name.trim().is_empty() {
        entity.player2.name = names.player2.clone();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::court_store::memory::MemoryCourtStore;
    use crate::dto::game_state::PlayerPayload;
    use crate::state::{AppState, SharedState};

    async fn test_state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .install_court_store(Arc::new(MemoryCourtStore::new(4)))
            .await;
        state
    }

    fn update(score1: u8, score2: u8) -> GameStateUpdate {
        GameStateUpdate {
            player1: PlayerPayload {
                name: "Anna".into(),
                name2: None,
                score: score1,
                games: 0,
            },
            player2: PlayerPayload {
                name: "Bo".into(),
                name2: None,
                score: score2,
                games: 0,
            },
            timer_seconds: 0,
            match_start_time: None,
            match_end_time: None,
            deciding_game_switched: false,
            is_doubles: false,
            set_scores_history: Vec::new(),
            rest_break_active: false,
            rest_break_seconds_left: 0,
            rest_break_title: None,
            rest_break_taken: false,
            match_completed: false,
        }
    }

    #[tokio::test]
    async fn fresh_court_answers_with_placeholders() {
        let state = test_state().await;
        let response = get_game_state(&state, 1).await.unwrap();

        assert_eq!(response.player1.name, "Player 1");
        assert_eq!(response.player2.name, "Player 2");
        assert_eq!(response.timer_seconds, 0);
        assert!(!response.is_active);
    }

    #[tokio::test]
    async fn unknown_court_is_not_found() {
        let state = test_state().await;
        assert!(matches!(
            get_game_state(&state, 99).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            upsert_game_state(&state, 99, update(0, 0), false).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn activity_marks_court_active_but_never_clears_it() {
        let state = test_state().await;

        upsert_game_state(&state, 1, update(5, 3), false)
            .await
            .unwrap();
        assert!(get_game_state(&state, 1).await.unwrap().is_active);

        // A later write with zeroed scores must not clear the flag.
        upsert_game_state(&state, 1, update(0, 0), false)
            .await
            .unwrap();
        assert!(get_game_state(&state, 1).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn skip_auto_active_leaves_flag_untouched() {
        let state = test_state().await;
        upsert_game_state(&state, 2, update(7, 7), true)
            .await
            .unwrap();
        assert!(!get_game_state(&state, 2).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn scorer_writes_propagate_doubles_to_the_court_record() {
        let state = test_state().await;
        let mut payload = update(1, 0);
        payload.is_doubles = true;

        upsert_game_state(&state, 1, payload, false).await.unwrap();
        assert!(get_game_state(&state, 1).await.unwrap().is_doubles);

        // Admin edits do not clobber the record.
        let mut admin_payload = update(1, 0);
        admin_payload.is_doubles = false;
        upsert_game_state(&state, 1, admin_payload, true)
            .await
            .unwrap();
        assert!(get_game_state(&state, 1).await.unwrap().is_doubles);
    }

    #[tokio::test]
    async fn delete_resets_state_and_deactivates() {
        let state = test_state().await;
        upsert_game_state(&state, 1, update(9, 4), false)
            .await
            .unwrap();

        delete_game_state(&state, 1).await.unwrap();
        let response = get_game_state(&state, 1).await.unwrap();
        assert_eq!(response.player1.score, 0);
        assert_eq!(response.player1.name, "Player 1");
        assert!(!response.is_active);
    }

    #[tokio::test]
    async fn blank_names_fall_back_to_placeholders() {
        let state = test_state().await;
        let mut payload = update(1, 0);
        payload.player2.name = "  ".into();

        upsert_game_state(&state, 1, payload, false).await.unwrap();
        let response = get_game_state(&state, 1).await.unwrap();
        assert_eq!(response.player1.name, "Anna");
        assert_eq!(response.player2.name, "Player 2");
    }

    #[tokio::test]
    async fn degraded_mode_refuses_writes() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            upsert_game_state(&state, 1, update(1, 0), false).await,
            Err(ServiceError::Degraded)
        ));
    }
}
