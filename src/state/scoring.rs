//! Pure score aggregation over the per-hole stroke log.
//!
//! Everything here is a function of its inputs; the hole list is re-derived
//! from the course catalog on every read and never stored.

use uuid::Uuid;

use crate::state::game::{Hole, Player, Score};

/// Sum of recorded strokes for one player across every hole in the log.
///
/// Order-independent; returns 0 when the player has no entries yet. The sum
/// runs in `u64` and saturates at `u32::MAX`, so stored entries exceeding
/// the API's stroke cap cannot wrap the total.
pub fn total_strokes(scores: &[Score], player_id: Uuid) -> u32 {
    let total: u64 = scores
        .iter()
        .filter(|score| score.player_id == player_id)
        .map(|score| u64::from(score.strokes))
        .sum();
    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Strokes taken minus par, over whatever holes the player has scored so far.
///
/// Mid-round the figure only reflects holes with a recorded score, so
/// unplayed holes carry no penalty. Once every hole is scored the full
/// course par applies. Scores for hole numbers outside `holes` (stale data
/// from another hole-count configuration) still count toward the stroke
/// total but contribute no matching par. The difference is computed in
/// `i64` and clamped into the `i32` range instead of truncating.
pub fn to_par(scores: &[Score], player_id: Uuid, holes: &[Hole]) -> i32 {
    let player_total = i64::from(total_strokes(scores, player_id));
    let player_scores: Vec<&Score> = scores
        .iter()
        .filter(|score| score.player_id == player_id)
        .collect();

    let par: i64 = if player_scores.len() < holes.len() {
        holes
            .iter()
            .filter(|hole| {
                player_scores
                    .iter()
                    .any(|score| score.hole_number == hole.number)
            })
            .map(|hole| i64::from(hole.par))
            .sum()
    } else {
        holes.iter().map(|hole| i64::from(hole.par)).sum()
    };

    (player_total - par).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Whether every roster player has a recorded score on `hole_number`.
///
/// Gate for the next-hole transition; an empty roster never qualifies.
pub fn hole_scored_by_all(scores: &[Score], players: &[Player], hole_number: u8) -> bool {
    !players.is_empty()
        && players.iter().all(|player| {
            scores
                .iter()
                .any(|score| score.player_id == player.id && score.hole_number == hole_number)
        })
}

/// Derived round-completeness predicate: every player has a score for every
/// hole number in `[1, hole_count]`.
pub fn round_complete(scores: &[Score], players: &[Player], hole_count: u8) -> bool {
    !players.is_empty()
        && (1..=hole_count).all(|hole_number| hole_scored_by_all(scores, players, hole_number))
}

/// One leaderboard row for a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardRow {
    /// Player the row describes.
    pub player_id: Uuid,
    /// Display name, copied so rows stand on their own.
    pub name: String,
    /// Gross stroke total across recorded holes.
    pub total_strokes: u32,
    /// Running to-par figure, see [`to_par`].
    pub to_par: i32,
    /// Number of holes the player has a score for.
    pub holes_scored: u32,
}

/// Leaderboard sorted ascending by gross strokes.
///
/// The sort is stable, so players tied on strokes keep their roster order
/// and the result is deterministic.
pub fn scoreboard(players: &[Player], scores: &[Score], holes: &[Hole]) -> Vec<ScoreboardRow> {
    let mut rows: Vec<ScoreboardRow> = players
        .iter()
        .map(|player| ScoreboardRow {
            player_id: player.id,
            name: player.name.clone(),
            total_strokes: total_strokes(scores, player.id),
            to_par: to_par(scores, player.id, holes),
            holes_scored: scores
                .iter()
                .filter(|score| score.player_id == player.id)
                .count() as u32,
        })
        .collect();

    rows.sort_by_key(|row| row.total_strokes);
    rows
}
