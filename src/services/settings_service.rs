//! Global settings: court count and client-facing configuration flags.

use tracing::warn;

use crate::{
    dto::settings::{CourtCountUpdate, SettingsResponse},
    error::ServiceError,
    state::SharedState,
};

/// Current settings. Falls back to the configured defaults when the store is
/// unreachable so clients can still validate court numbers while degraded.
pub async fn get_settings(state: &SharedState) -> Result<SettingsResponse, ServiceError> {
    let court_count = match state.court_store().await {
        Some(store) => match store.court_count().await {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "falling back to configured court count");
                state.config().court_count()
            }
        },
        None => state.config().court_count(),
    };

    Ok(SettingsResponse {
        court_count,
        show_reset_button: state.config().show_reset_button(),
    })
}

/// Provision or remove courts so exactly the requested number exist.
pub async fn set_court_count(
    state: &SharedState,
    update: CourtCountUpdate,
) -> Result<SettingsResponse, ServiceError> {
    let store = state.require_court_store().await?;
    store.set_court_count(update.court_count).await?;

    Ok(SettingsResponse {
        court_count: update.court_count,
        show_reset_button: state.config().show_reset_button(),
    })
}
