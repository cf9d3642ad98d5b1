//! Persistence entities shared across storage backends.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::game::{GameSession, HolePar, Player, Score};

/// Representation of a roster player stored with its game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name chosen at setup.
    pub name: String,
}

/// A single recorded score, keyed by `(player_id, hole_number)` within a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Player the strokes belong to.
    pub player_id: Uuid,
    /// Hole the strokes were taken on.
    pub hole_number: u8,
    /// Strokes taken, strictly positive.
    pub strokes: u32,
}

/// Per-game par override for one hole, keyed by `hole_number`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoleParEntity {
    /// Hole the override applies to.
    pub hole_number: u8,
    /// Replacement par value.
    pub par: u8,
}

/// Aggregate game entity persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Catalog course identifier, or `custom`.
    pub course_id: String,
    /// Display name of the course.
    pub course_name: String,
    /// Number of holes played, 9 or 18.
    pub hole_count: u8,
    /// Participating players in display order.
    pub players: Vec<PlayerEntity>,
    /// Score log, unique per `(player_id, hole_number)`.
    pub scores: Vec<ScoreEntity>,
    /// Par overrides entered during play on a custom course.
    pub hole_pars: Vec<HoleParEntity>,
    /// Hole currently being played.
    pub current_hole: u8,
    /// Explicit completion flag.
    pub completed: bool,
    /// Creation timestamp, orders current-game fallback queries.
    pub created_at: SystemTime,
    /// Last time the game was updated.
    pub updated_at: SystemTime,
}

/// Partial update applied to a game's round cursor.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundPatch {
    /// New hole cursor, already validated against the game's range.
    pub current_hole: Option<u8>,
    /// New completion flag; `Some(true)` also releases the current slot.
    pub completed: Option<bool>,
}

impl From<GameSession> for GameEntity {
    fn from(session: GameSession) -> Self {
        Self {
            id: session.id,
            course_id: session.course_id,
            course_name: session.course_name,
            hole_count: session.hole_count,
            players: session
                .players
                .into_iter()
                .map(|player| PlayerEntity {
                    id: player.id,
                    name: player.name,
                })
                .collect(),
            scores: session
                .scores
                .into_iter()
                .map(|score| ScoreEntity {
                    player_id: score.player_id,
                    hole_number: score.hole_number,
                    strokes: score.strokes,
                })
                .collect(),
            hole_pars: session
                .hole_pars
                .into_iter()
                .map(|entry| HoleParEntity {
                    hole_number: entry.hole_number,
                    par: entry.par,
                })
                .collect(),
            current_hole: session.current_hole,
            completed: session.completed,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

impl From<GameEntity> for GameSession {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            course_name: entity.course_name,
            hole_count: entity.hole_count,
            players: entity
                .players
                .into_iter()
                .map(|player| Player {
                    id: player.id,
                    name: player.name,
                })
                .collect(),
            scores: entity
                .scores
                .into_iter()
                .map(|score| Score {
                    player_id: score.player_id,
                    hole_number: score.hole_number,
                    strokes: score.strokes,
                })
                .collect(),
            hole_pars: entity
                .hole_pars
                .into_iter()
                .map(|entry| HolePar {
                    hole_number: entry.hole_number,
                    par: entry.par,
                })
                .collect(),
            current_hole: entity.current_hole,
            completed: entity.completed,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
