//! Persistence layer: entities, the storage trait, and its backends.

/// Game state storage backends and the `GameStore` trait.
pub mod game_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
