//! Game setup, mutation, and summary DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{
        format_system_time,
        validation::{validate_hole_count, validate_player_name},
    },
    state::{
        game::{GameSession, HoleStep},
        scoring::{self, ScoreboardRow},
    },
};

/// Payload used to set up a brand-new round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Catalog course identifier, or `custom`.
    #[validate(length(min = 1, message = "Course is required"))]
    pub course_id: String,
    /// Display name shown on score views.
    #[validate(length(min = 1, message = "Course name is required"))]
    pub course_name: String,
    /// 9 or 18.
    #[validate(custom(function = validate_hole_count))]
    pub hole_count: u8,
    /// Roster in display order, 1 to 4 players.
    #[validate(
        length(min = 1, max = 4, message = "A round takes 1 to 4 players"),
        nested
    )]
    pub players: Vec<PlayerInput>,
}

/// Incoming player definition for the round setup.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayerInput {
    /// Display name; must not be blank.
    pub name: String,
}

impl Validate for PlayerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_player_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial round update backing `PUT /api/game/{id}`.
///
/// Fields left out keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateGameRequest {
    /// New hole cursor; validated against the game's hole range.
    #[serde(default)]
    pub current_hole: Option<u8>,
    /// New completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Score replacement for one hole.
///
/// Entries replace everything recorded for the hole; a player absent from
/// the list loses their score for it.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScorePatchRequest {
    /// Hole the entries apply to.
    pub hole_number: u8,
    /// Stroke counts per player.
    #[validate(nested)]
    pub scores: Vec<ScoreEntryInput>,
}

/// One player's stroke count within a score patch.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScoreEntryInput {
    /// Player the strokes belong to; must be on the game roster.
    pub player_id: Uuid,
    /// Strokes taken, between 1 and 99.
    #[validate(range(min = 1, max = 99, message = "Strokes must be between 1 and 99"))]
    pub strokes: u32,
}

/// Hole navigation request: either step the cursor or jump to a hole.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum HoleNavigationRequest {
    /// Move one hole forwards or backwards.
    Step {
        /// Direction of the move.
        direction: StepDirection,
    },
    /// Jump straight to a hole number.
    Jump {
        /// Target hole, validated against the game's range.
        hole: u8,
    },
}

/// Direction of a hole-cursor step.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    /// Towards the next hole; completes the round on the last one.
    Next,
    /// Back towards hole 1; clamped there.
    Prev,
}

impl From<StepDirection> for HoleStep {
    fn from(value: StepDirection) -> Self {
        match value {
            StepDirection::Next => HoleStep::Next,
            StepDirection::Prev => HoleStep::Prev,
        }
    }
}

/// Par override for one hole of a custom course.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct HoleParRequest {
    /// Replacement par value.
    #[validate(range(min = 1, max = 10, message = "Par must be between 1 and 10"))]
    pub par: u8,
}

/// Full projection of a round returned by game endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Round identifier.
    pub id: Uuid,
    /// Catalog course identifier, or `custom`.
    pub course_id: String,
    /// Display name of the course.
    pub course_name: String,
    /// 9 or 18.
    pub hole_count: u8,
    /// Roster in display order.
    pub players: Vec<PlayerSummary>,
    /// The score log.
    pub scores: Vec<ScoreSnapshot>,
    /// Par overrides recorded for a custom course.
    pub hole_pars: Vec<HoleParSnapshot>,
    /// Hole currently being played.
    pub current_hole: u8,
    /// Completion as views should display it: the stored flag OR the
    /// derived every-hole-scored predicate.
    pub completed: bool,
    /// Derived predicate alone, regardless of the stored flag.
    pub all_holes_scored: bool,
    /// RFC3339 creation timestamp.
    pub created_at: String,
    /// RFC3339 last-update timestamp.
    pub updated_at: String,
}

/// Public projection of a roster player.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Player identifier used in score entries.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// One score log entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreSnapshot {
    /// Player the strokes belong to.
    pub player_id: Uuid,
    /// Hole the strokes were taken on.
    pub hole_number: u8,
    /// Strokes taken.
    pub strokes: u32,
}

/// One recorded par override.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoleParSnapshot {
    /// Hole the override applies to.
    pub hole_number: u8,
    /// Replacement par.
    pub par: u8,
}

impl From<GameSession> for GameSummary {
    fn from(session: GameSession) -> Self {
        let all_holes_scored =
            scoring::round_complete(&session.scores, &session.players, session.hole_count);

        Self {
            id: session.id,
            course_id: session.course_id,
            course_name: session.course_name,
            hole_count: session.hole_count,
            players: session
                .players
                .into_iter()
                .map(|player| PlayerSummary {
                    id: player.id,
                    name: player.name,
                })
                .collect(),
            scores: session
                .scores
                .into_iter()
                .map(|score| ScoreSnapshot {
                    player_id: score.player_id,
                    hole_number: score.hole_number,
                    strokes: score.strokes,
                })
                .collect(),
            hole_pars: session
                .hole_pars
                .into_iter()
                .map(|entry| HoleParSnapshot {
                    hole_number: entry.hole_number,
                    par: entry.par,
                })
                .collect(),
            current_hole: session.current_hole,
            completed: session.completed || all_holes_scored,
            all_holes_scored,
            created_at: format_system_time(session.created_at),
            updated_at: format_system_time(session.updated_at),
        }
    }
}

/// Leaderboard response for a round.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreboardResponse {
    /// Round the board belongs to.
    pub game_id: Uuid,
    /// Display name of the course.
    pub course_name: String,
    /// Completion as views should display it (flag OR derived predicate).
    pub completed: bool,
    /// Rows ascending by gross strokes; ties keep roster order.
    pub rows: Vec<ScoreboardEntry>,
}

/// One leaderboard row.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreboardEntry {
    /// Player the row describes.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
    /// Gross stroke total.
    pub total_strokes: u32,
    /// Running to-par figure over scored holes.
    pub to_par: i32,
    /// Number of holes with a recorded score.
    pub holes_scored: u32,
}

impl From<ScoreboardRow> for ScoreboardEntry {
    fn from(row: ScoreboardRow) -> Self {
        Self {
            player_id: row.player_id,
            name: row.name,
            total_strokes: row.total_strokes,
            to_par: row.to_par,
            holes_scored: row.holes_scored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::{Player, Score};

    fn session_with_scores() -> GameSession {
        let p1 = Player {
            id: Uuid::new_v4(),
            name: "Ada".into(),
        };
        let mut session = GameSession::new("custom".into(), "Custom Course".into(), 9, vec![p1]);
        session.scores = (1..=9)
            .map(|hole_number| Score {
                player_id: session.players[0].id,
                hole_number,
                strokes: 4,
            })
            .collect();
        session
    }

    #[test]
    fn create_request_rejects_bad_hole_count_and_blank_names() {
        let request = CreateGameRequest {
            course_id: "pebble".into(),
            course_name: "Pebble Beach Golf Links".into(),
            hole_count: 12,
            players: vec![PlayerInput { name: "  ".into() }],
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("hole_count"));
        assert!(errors.errors().contains_key("players"));
    }

    #[test]
    fn create_request_rejects_oversized_roster() {
        let request = CreateGameRequest {
            course_id: "pebble".into(),
            course_name: "Pebble Beach Golf Links".into(),
            hole_count: 18,
            players: (0..5)
                .map(|index| PlayerInput {
                    name: format!("Player {index}"),
                })
                .collect(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn score_entry_rejects_strokes_outside_the_cap() {
        let entry = |strokes| ScoreEntryInput {
            player_id: Uuid::new_v4(),
            strokes,
        };
        assert!(entry(0).validate().is_err());
        assert!(entry(1).validate().is_ok());
        assert!(entry(99).validate().is_ok());
        assert!(entry(100).validate().is_err());
        assert!(entry(3_000_000_000).validate().is_err());
    }

    #[test]
    fn summary_reports_derived_completion_even_when_flag_is_false() {
        let session = session_with_scores();
        assert!(!session.completed);

        let summary = GameSummary::from(session);
        assert!(summary.all_holes_scored);
        assert!(summary.completed);
    }

    #[test]
    fn navigation_request_parses_both_shapes() {
        let step: HoleNavigationRequest =
            serde_json::from_str(r#"{"direction": "next"}"#).unwrap();
        assert!(matches!(
            step,
            HoleNavigationRequest::Step {
                direction: StepDirection::Next
            }
        ));

        let jump: HoleNavigationRequest = serde_json::from_str(r#"{"hole": 7}"#).unwrap();
        assert!(matches!(jump, HoleNavigationRequest::Jump { hole: 7 }));
    }
}
