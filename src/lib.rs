//! Live badminton scoreboard: match engine, court-control sync client, and
//! the backend game-state store they share.

/// Runtime configuration loading.
pub mod config;
/// Storage backends and persisted models.
pub mod dao;
/// Wire contract shared by server routes and the sync client.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Server-side service operations.
pub mod services;
/// Match engine, timer model, rest breaks, and shared server state.
pub mod state;
/// Court-control client: debounced saves and polling reconciliation.
pub mod sync;
