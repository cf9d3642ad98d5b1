//! Domain types for a scored round of golf.

use std::time::SystemTime;

use uuid::Uuid;

/// Course identifier reserved for rounds played without a catalog entry.
pub const CUSTOM_COURSE_ID: &str = "custom";

/// Par assigned to synthesized holes on a custom course.
pub const DEFAULT_PAR: u8 = 4;
/// Yardage assigned to synthesized holes on a custom course.
pub const DEFAULT_YARDS: u16 = 400;

/// A participant in a round. Roster order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier assigned when the game is created.
    pub id: Uuid,
    /// Display name entered during setup.
    pub name: String,
}

/// One segment of a course with its expected stroke count and length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hole {
    /// Position within the course, starting at 1.
    pub number: u8,
    /// Expected stroke count.
    pub par: u8,
    /// Distance from tee to pin.
    pub yards: u16,
}

/// Recorded stroke count for one player on one hole.
///
/// `(player_id, hole_number)` is the natural key; a new entry for the same
/// key replaces the old one, never accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Player the strokes belong to.
    pub player_id: Uuid,
    /// Hole the strokes were taken on.
    pub hole_number: u8,
    /// Strokes taken, strictly positive.
    pub strokes: u32,
}

/// Per-game par override for one hole of a custom course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolePar {
    /// Hole the override applies to.
    pub hole_number: u8,
    /// Replacement par value.
    pub par: u8,
}

/// One scored round: course configuration, roster, score log, and the
/// hole/completion cursor driven by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    /// Primary key of the round.
    pub id: Uuid,
    /// Catalog course identifier, or [`CUSTOM_COURSE_ID`].
    pub course_id: String,
    /// Display name of the course.
    pub course_name: String,
    /// Number of holes played, 9 or 18.
    pub hole_count: u8,
    /// Participants in display order (1 to 4).
    pub players: Vec<Player>,
    /// Score log, unique per `(player_id, hole_number)`.
    pub scores: Vec<Score>,
    /// Hole currently being played, within `[1, hole_count]`.
    pub current_hole: u8,
    /// Explicit completion flag; authoritative for the current-game slot.
    pub completed: bool,
    /// Par overrides entered during play on a custom course.
    pub hole_pars: Vec<HolePar>,
    /// Creation timestamp, also orders current-game fallback queries.
    pub created_at: SystemTime,
    /// Last mutation timestamp.
    pub updated_at: SystemTime,
}

impl GameSession {
    /// Start a fresh round on hole 1 with an empty score log.
    pub fn new(
        course_id: String,
        course_name: String,
        hole_count: u8,
        players: Vec<Player>,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            course_id,
            course_name,
            hole_count,
            players,
            scores: Vec::new(),
            current_hole: 1,
            completed: false,
            hole_pars: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `player_id` belongs to this round's roster.
    pub fn has_player(&self, player_id: Uuid) -> bool {
        self.players.iter().any(|player| player.id == player_id)
    }

    /// Whether the round uses a custom (non-catalog) course.
    pub fn is_custom_course(&self) -> bool {
        self.course_id == CUSTOM_COURSE_ID
    }

    /// Compute the outcome of moving the hole cursor without mutating it.
    pub fn step_hole(&self, direction: HoleStep) -> StepOutcome {
        match direction {
            HoleStep::Prev if self.current_hole <= 1 => StepOutcome::Clamped,
            HoleStep::Prev => StepOutcome::Moved(self.current_hole - 1),
            HoleStep::Next if self.current_hole >= self.hole_count => StepOutcome::Finish,
            HoleStep::Next => StepOutcome::Moved(self.current_hole + 1),
        }
    }
}

/// Direction of a hole-cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleStep {
    /// Towards the next hole.
    Next,
    /// Back towards hole 1.
    Prev,
}

/// Result of stepping the hole cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Cursor moves to the given hole.
    Moved(u8),
    /// Backing up below hole 1 stays put without error.
    Clamped,
    /// Advancing past the final hole ends the round instead of moving.
    Finish,
}
