use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::game::{
        CreateGameRequest, GameSummary, HoleNavigationRequest, HoleParRequest, ScorePatchRequest,
        ScoreboardResponse, UpdateGameRequest,
    },
    error::{AppError, ServiceError},
    services::game_service,
    state::SharedState,
};

/// Round management endpoints under `/api/game`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/game",
            get(current_game).post(create_game).delete(reset_game),
        )
        .route("/api/game/{id}", get(get_game).put(update_game))
        .route("/api/game/{id}/scores", patch(record_scores))
        .route("/api/game/{id}/complete", patch(complete_game))
        .route("/api/game/{id}/hole", patch(navigate_hole))
        .route("/api/game/{id}/holes/{number}", patch(set_hole_par))
        .route("/api/game/{id}/scoreboard", get(scoreboard))
}

/// Retrieve the round occupying the current-game slot.
#[utoipa::path(
    get,
    path = "/api/game",
    tag = "game",
    responses(
        (status = 200, description = "Active round", body = GameSummary),
        (status = 404, description = "No active game found")
    )
)]
pub async fn current_game(
    State(state): State<SharedState>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::current_game(&state).await?))
}

/// Start a new round; it becomes the current game.
#[utoipa::path(
    post,
    path = "/api/game",
    tag = "game",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Round created", body = GameSummary),
        (status = 400, description = "Invalid game data")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameSummary>), AppError> {
    let summary = game_service::create_game(&state, request).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Release the current-game slot without deleting any stored round.
#[utoipa::path(
    delete,
    path = "/api/game",
    tag = "game",
    responses((status = 204, description = "Current-game slot cleared"))
)]
pub async fn reset_game(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    game_service::reset_game(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Retrieve a round by its identifier.
#[utoipa::path(
    get,
    path = "/api/game/{id}",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 200, description = "Round", body = GameSummary),
        (status = 404, description = "Unknown round")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::get_game(&state, id).await?))
}

/// Partially update a round's hole cursor or completion flag.
#[utoipa::path(
    put,
    path = "/api/game/{id}",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Updated round", body = GameSummary),
        (status = 400, description = "Hole outside the course range"),
        (status = 404, description = "Unknown round")
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGameRequest>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::update_round(&state, id, request).await?))
}

/// Replace the scores recorded for one hole.
#[utoipa::path(
    patch,
    path = "/api/game/{id}/scores",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    request_body = ScorePatchRequest,
    responses(
        (status = 200, description = "Updated round", body = GameSummary),
        (status = 400, description = "Invalid score data"),
        (status = 404, description = "Unknown round")
    )
)]
pub async fn record_scores(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScorePatchRequest>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::record_scores(&state, id, request)
        .await
        .map_err(|err| match err {
            ServiceError::Validation(errors) => AppError::Validation {
                message: "Invalid score data",
                errors,
            },
            other => other.into(),
        })?;
    Ok(Json(summary))
}

/// Mark a round completed and release the current-game slot.
#[utoipa::path(
    patch,
    path = "/api/game/{id}/complete",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 200, description = "Completed round", body = GameSummary),
        (status = 404, description = "Unknown round")
    )
)]
pub async fn complete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::complete_game(&state, id).await?))
}

/// Step the hole cursor or jump to a specific hole.
#[utoipa::path(
    patch,
    path = "/api/game/{id}/hole",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    request_body = HoleNavigationRequest,
    responses(
        (status = 200, description = "Updated round", body = GameSummary),
        (status = 400, description = "Hole outside the course range"),
        (status = 404, description = "Unknown round"),
        (status = 409, description = "Current hole is missing scores")
    )
)]
pub async fn navigate_hole(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<HoleNavigationRequest>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::navigate_hole(&state, id, request).await?))
}

/// Override the par of one hole on a custom-course round.
#[utoipa::path(
    patch,
    path = "/api/game/{id}/holes/{number}",
    tag = "game",
    params(
        ("id" = Uuid, Path, description = "Identifier of the round"),
        ("number" = u8, Path, description = "Hole number to override")
    ),
    request_body = HoleParRequest,
    responses(
        (status = 200, description = "Updated round", body = GameSummary),
        (status = 400, description = "Invalid par or hole number"),
        (status = 404, description = "Unknown round"),
        (status = 409, description = "Round is not on a custom course")
    )
)]
pub async fn set_hole_par(
    State(state): State<SharedState>,
    Path((id, number)): Path<(Uuid, u8)>,
    Json(request): Json<HoleParRequest>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::set_hole_par(&state, id, number, request).await?,
    ))
}

/// Leaderboard for a round.
#[utoipa::path(
    get,
    path = "/api/game/{id}/scoreboard",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 200, description = "Leaderboard", body = ScoreboardResponse),
        (status = 404, description = "Unknown round")
    )
)]
pub async fn scoreboard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreboardResponse>, AppError> {
    Ok(Json(game_service::scoreboard(&state, id).await?))
}
