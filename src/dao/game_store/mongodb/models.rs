use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{GameEntity, HoleParEntity, PlayerEntity, ScoreEntity};

/// `_id` of the singleton current-game slot document.
pub const CURRENT_SESSION_ID: &str = "current";

/// Game document; scores and hole overrides live in child collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    course_id: String,
    course_name: String,
    hole_count: u8,
    players: Vec<PlayerEntity>,
    current_hole: u8,
    #[serde(default)]
    completed: bool,
    created_at: DateTime,
    updated_at: DateTime,
}

impl MongoGameDocument {
    /// Primary key of the documented game.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Assemble the full entity from this document plus its child records.
    pub fn into_entity(
        self,
        scores: Vec<ScoreEntity>,
        hole_pars: Vec<HoleParEntity>,
    ) -> GameEntity {
        GameEntity {
            id: self.id,
            course_id: self.course_id,
            course_name: self.course_name,
            hole_count: self.hole_count,
            players: self.players,
            scores,
            hole_pars,
            current_hole: self.current_hole,
            completed: self.completed,
            created_at: self.created_at.to_system_time(),
            updated_at: self.updated_at.to_system_time(),
        }
    }
}

impl From<&GameEntity> for MongoGameDocument {
    fn from(value: &GameEntity) -> Self {
        Self {
            id: value.id,
            course_id: value.course_id.clone(),
            course_name: value.course_name.clone(),
            hole_count: value.hole_count,
            players: value.players.clone(),
            current_hole: value.current_hole,
            completed: value.completed,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

/// One recorded score, keyed by `(game_id, player_id, hole_number)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub hole_number: u8,
    pub strokes: u32,
}

impl MongoScoreDocument {
    pub fn new(game_id: Uuid, score: &ScoreEntity) -> Self {
        Self {
            game_id,
            player_id: score.player_id,
            hole_number: score.hole_number,
            strokes: score.strokes,
        }
    }
}

impl From<MongoScoreDocument> for ScoreEntity {
    fn from(value: MongoScoreDocument) -> Self {
        Self {
            player_id: value.player_id,
            hole_number: value.hole_number,
            strokes: value.strokes,
        }
    }
}

/// One par override, keyed by `(game_id, hole_number)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoHoleParDocument {
    pub game_id: Uuid,
    pub hole_number: u8,
    pub par: u8,
}

impl From<MongoHoleParDocument> for HoleParEntity {
    fn from(value: MongoHoleParDocument) -> Self {
        Self {
            hole_number: value.hole_number,
            par: value.par,
        }
    }
}

/// Singleton document recording which game holds the current slot.
///
/// `game_id: None` means the slot was explicitly released (reset); a missing
/// document means no pointer was ever written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub game_id: Option<Uuid>,
}

impl SessionDocument {
    pub fn pointing_at(game_id: Option<Uuid>) -> Self {
        Self {
            id: CURRENT_SESSION_ID.to_owned(),
            game_id,
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
