//! Round lifecycle: creation, the current-game slot, score recording,
//! hole navigation, and completion.

use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{RoundPatch, ScoreEntity},
    dto::game::{
        CreateGameRequest, GameSummary, HoleNavigationRequest, HoleParRequest, ScorePatchRequest,
        ScoreboardResponse, UpdateGameRequest,
    },
    error::ServiceError,
    state::{
        SharedState,
        game::{CUSTOM_COURSE_ID, GameSession, HoleStep, Player, StepOutcome},
        scoring,
    },
};

/// Bootstrap a fresh round and claim the current-game slot for it.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    request.validate()?;

    if request.course_id != CUSTOM_COURSE_ID
        && state.catalog().find_course(&request.course_id).is_none()
    {
        return Err(ServiceError::InvalidInput(format!(
            "unknown course `{}`",
            request.course_id
        )));
    }

    let players = request
        .players
        .into_iter()
        .map(|input| Player {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
        })
        .collect();

    let game = GameSession::new(
        request.course_id,
        request.course_name,
        request.hole_count,
        players,
    );

    let store = state.require_game_store().await?;
    store.save_game(game.clone().into()).await?;

    Ok(game.into())
}

/// Round occupying the current-game slot.
pub async fn current_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(entity) = store.find_current_game().await? else {
        return Err(ServiceError::NotFound("No active game found".into()));
    };

    Ok(GameSession::from(entity).into())
}

/// Load a round by id.
pub async fn get_game(state: &SharedState, id: Uuid) -> Result<GameSummary, ServiceError> {
    let game = load_session(state, id).await?;
    Ok(game.into())
}

/// Apply a partial round update (hole cursor and/or completion flag).
pub async fn update_round(
    state: &SharedState,
    id: Uuid,
    request: UpdateGameRequest,
) -> Result<GameSummary, ServiceError> {
    let game = load_session(state, id).await?;

    if let Some(hole) = request.current_hole {
        ensure_hole_in_range(&game, hole)?;
    }

    let patch = RoundPatch {
        current_hole: request.current_hole,
        completed: request.completed,
    };

    let store = state.require_game_store().await?;
    let Some(entity) = store.update_round(id, patch).await? else {
        return Err(not_found(id));
    };

    Ok(GameSession::from(entity).into())
}

/// Replace every score recorded for one hole and make it the current hole.
///
/// The entries are the full truth for the hole: a roster player absent from
/// the list loses any score previously recorded there.
pub async fn record_scores(
    state: &SharedState,
    id: Uuid,
    request: ScorePatchRequest,
) -> Result<GameSummary, ServiceError> {
    request.validate()?;

    let game = load_session(state, id).await?;
    ensure_hole_in_range(&game, request.hole_number)?;

    for entry in &request.scores {
        if !game.has_player(entry.player_id) {
            return Err(ServiceError::InvalidInput(format!(
                "player `{}` is not part of this game",
                entry.player_id
            )));
        }
    }

    let mut seen = Vec::with_capacity(request.scores.len());
    for entry in &request.scores {
        if seen.contains(&entry.player_id) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate score entry for player `{}`",
                entry.player_id
            )));
        }
        seen.push(entry.player_id);
    }

    let scores = request
        .scores
        .into_iter()
        .map(|entry| ScoreEntity {
            player_id: entry.player_id,
            hole_number: request.hole_number,
            strokes: entry.strokes,
        })
        .collect();

    let store = state.require_game_store().await?;
    let Some(entity) = store
        .replace_hole_scores(id, request.hole_number, scores)
        .await?
    else {
        return Err(not_found(id));
    };

    Ok(GameSession::from(entity).into())
}

/// Move the hole cursor, either by one step or straight to a hole.
///
/// Stepping forwards requires every roster player to have a score on the
/// current hole; stepping forwards off the last hole completes the round.
/// Stepping backwards from hole 1 is a no-op.
pub async fn navigate_hole(
    state: &SharedState,
    id: Uuid,
    request: HoleNavigationRequest,
) -> Result<GameSummary, ServiceError> {
    let game = load_session(state, id).await?;

    let target = match request {
        HoleNavigationRequest::Jump { hole } => {
            ensure_hole_in_range(&game, hole)?;
            hole
        }
        HoleNavigationRequest::Step { direction } => {
            let direction: HoleStep = direction.into();
            if matches!(direction, HoleStep::Next)
                && !scoring::hole_scored_by_all(&game.scores, &game.players, game.current_hole)
            {
                return Err(ServiceError::InvalidState(format!(
                    "hole {} is missing scores for some players",
                    game.current_hole
                )));
            }

            match game.step_hole(direction) {
                StepOutcome::Moved(hole) => hole,
                StepOutcome::Clamped => return Ok(game.into()),
                StepOutcome::Finish => return complete_game(state, id).await,
            }
        }
    };

    let patch = RoundPatch {
        current_hole: Some(target),
        ..RoundPatch::default()
    };

    let store = state.require_game_store().await?;
    let Some(entity) = store.update_round(id, patch).await? else {
        return Err(not_found(id));
    };

    Ok(GameSession::from(entity).into())
}

/// Mark a round completed and release the current-game slot. Idempotent.
pub async fn complete_game(state: &SharedState, id: Uuid) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(entity) = store.complete_game(id).await? else {
        return Err(not_found(id));
    };

    Ok(GameSession::from(entity).into())
}

/// Release the current-game slot without touching stored rounds.
pub async fn reset_game(state: &SharedState) -> Result<(), ServiceError> {
    let store = state.require_game_store().await?;
    store.clear_current_game().await?;
    Ok(())
}

/// Override the par of one hole on a custom-course round.
pub async fn set_hole_par(
    state: &SharedState,
    id: Uuid,
    hole_number: u8,
    request: HoleParRequest,
) -> Result<GameSummary, ServiceError> {
    request.validate()?;

    let game = load_session(state, id).await?;
    ensure_hole_in_range(&game, hole_number)?;

    if !game.is_custom_course() {
        return Err(ServiceError::InvalidState(format!(
            "course `{}` has fixed pars; only custom courses accept overrides",
            game.course_id
        )));
    }

    let store = state.require_game_store().await?;
    let Some(entity) = store.set_hole_par(id, hole_number, request.par).await? else {
        return Err(not_found(id));
    };

    Ok(GameSession::from(entity).into())
}

/// Leaderboard for a round, ascending by gross strokes.
pub async fn scoreboard(state: &SharedState, id: Uuid) -> Result<ScoreboardResponse, ServiceError> {
    let game = load_session(state, id).await?;

    let holes = state
        .catalog()
        .resolve_holes(&game.course_id, game.hole_count, &game.hole_pars);
    let rows = scoring::scoreboard(&game.players, &game.scores, &holes);
    let completed = game.completed
        || scoring::round_complete(&game.scores, &game.players, game.hole_count);

    Ok(ScoreboardResponse {
        game_id: game.id,
        course_name: game.course_name,
        completed,
        rows: rows.into_iter().map(Into::into).collect(),
    })
}

async fn load_session(state: &SharedState, id: Uuid) -> Result<GameSession, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(entity) = store.find_game(id).await? else {
        return Err(not_found(id));
    };

    Ok(entity.into())
}

fn ensure_hole_in_range(game: &GameSession, hole: u8) -> Result<(), ServiceError> {
    if hole == 0 || hole > game.hole_count {
        return Err(ServiceError::InvalidInput(format!(
            "hole {} is outside the course range 1..={}",
            hole, game.hole_count
        )));
    }
    Ok(())
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("game `{id}` not found"))
}
