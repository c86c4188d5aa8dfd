/// Court administration operations.
pub mod court_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game state reads, upserts and resets.
pub mod game_state_service;
/// Health check service.
pub mod health_service;
/// Match history recording and listing.
pub mod match_history_service;
/// Global settings and court provisioning.
pub mod settings_service;
/// Storage connection supervision and degraded-mode handling.
pub mod storage_supervisor;
