//! Storage backends and the trait the state machine consumes.

pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{GameEntity, RoundPatch, ScoreEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for games and the current-game slot.
///
/// The slot is store-level state, not a process-wide static: saving a game
/// claims it, completing (or resetting) releases it. Backends keep at most
/// one non-completed game current at a time.
pub trait GameStore: Send + Sync {
    /// Game occupying the current slot, if any.
    ///
    /// Defensive: a slot pointing at a missing or completed game yields the
    /// most recently created non-completed game instead, ordered by creation
    /// time descending so the answer is deterministic.
    fn find_current_game(&self) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Upsert a game and claim the current slot for it.
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Load a game by id.
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Apply a partial round update; `None` when the id is unknown.
    ///
    /// Patching `completed = true` releases the current slot.
    fn update_round(
        &self,
        id: Uuid,
        patch: RoundPatch,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Replace every score recorded for `hole_number` with `scores`
    /// (delete-then-insert, not a merge) and move the hole cursor there.
    fn replace_hole_scores(
        &self,
        id: Uuid,
        hole_number: u8,
        scores: Vec<ScoreEntity>,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Mark a game completed and release the current slot. Idempotent.
    fn complete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Upsert a per-hole par override.
    fn set_hole_par(
        &self,
        id: Uuid,
        hole_number: u8,
        par: u8,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Release the current slot without mutating stored games.
    fn clear_current_game(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a game and its child records; `true` when something was removed.
    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Probe backend connectivity.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a lost backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
