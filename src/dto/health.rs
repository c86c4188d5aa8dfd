use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether a storage backend is currently installed.
    pub store_connected: bool,
}

impl HealthResponse {
    /// Health response indicating the system is fully operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            store_connected: true,
        }
    }

    /// Health response indicating the system runs without storage.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            store_connected: false,
        }
    }
}
