/// Court, game state and match history storage backends.
pub mod court_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
