use axum::Router;

use crate::state::SharedState;

pub mod courts;
pub mod docs;
pub mod game_states;
pub mod health;
pub mod match_history;
pub mod settings;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(game_states::router())
        .merge(courts::router())
        .merge(match_history::router())
        .merge(settings::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
