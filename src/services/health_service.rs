use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Current health, pinging the storage backend and reporting degraded mode.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.court_store().await {
        Some(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        None => warn!("storage unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
