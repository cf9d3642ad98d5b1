//! End-to-end round lifecycle scenarios running against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use fairway_back::{
    config::AppConfig,
    dao::game_store::memory::MemoryGameStore,
    dto::game::{
        CreateGameRequest, GameSummary, HoleNavigationRequest, HoleParRequest, PlayerInput,
        ScoreEntryInput, ScorePatchRequest, StepDirection, UpdateGameRequest,
    },
    error::ServiceError,
    services::game_service,
    state::{AppState, SharedState},
};

async fn test_state() -> SharedState {
    let state = AppState::new(AppConfig::default());
    state
        .set_game_store(Arc::new(MemoryGameStore::default()))
        .await;
    state
}

fn two_player_request(course_id: &str, hole_count: u8) -> CreateGameRequest {
    CreateGameRequest {
        course_id: course_id.into(),
        course_name: "Test Course".into(),
        hole_count,
        players: vec![
            PlayerInput { name: "Ada".into() },
            PlayerInput {
                name: "Grace".into(),
            },
        ],
    }
}

fn score_patch(hole_number: u8, entries: &[(Uuid, u32)]) -> ScorePatchRequest {
    ScorePatchRequest {
        hole_number,
        scores: entries
            .iter()
            .map(|&(player_id, strokes)| ScoreEntryInput { player_id, strokes })
            .collect(),
    }
}

async fn fill_holes(state: &SharedState, game: &GameSummary, holes: impl Iterator<Item = u8>) {
    for hole in holes {
        let entries: Vec<(Uuid, u32)> = game.players.iter().map(|p| (p.id, 4)).collect();
        game_service::record_scores(state, game.id, score_patch(hole, &entries))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn created_game_occupies_the_current_slot() {
    let state = test_state().await;

    let created = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();
    assert_eq!(created.current_hole, 1);
    assert!(!created.completed);
    assert_eq!(created.players.len(), 2);

    let current = game_service::current_game(&state).await.unwrap();
    assert_eq!(current.id, created.id);
}

#[tokio::test]
async fn current_game_is_not_found_before_any_round_exists() {
    let state = test_state().await;

    let err = game_service::current_game(&state).await.unwrap_err();
    match err {
        ServiceError::NotFound(message) => assert_eq!(message, "No active game found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn creating_a_second_game_supersedes_the_first() {
    let state = test_state().await;

    let first = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();
    let second = game_service::create_game(&state, two_player_request("augusta", 18))
        .await
        .unwrap();

    let current = game_service::current_game(&state).await.unwrap();
    assert_eq!(current.id, second.id);

    // The superseded round is still readable by id.
    let fetched = game_service::get_game(&state, first.id).await.unwrap();
    assert_eq!(fetched.id, first.id);
}

#[tokio::test]
async fn create_rejects_unknown_catalog_course() {
    let state = test_state().await;

    let err = game_service::create_game(&state, two_player_request("atlantis", 18))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn create_rejects_invalid_hole_count() {
    let state = test_state().await;

    let err = game_service::create_game(&state, two_player_request("pebble", 12))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn recording_scores_replaces_the_hole_and_moves_the_cursor() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();
    let (p1, p2) = (game.players[0].id, game.players[1].id);

    let after_both =
        game_service::record_scores(&state, game.id, score_patch(3, &[(p1, 4), (p2, 5)]))
            .await
            .unwrap();
    assert_eq!(after_both.scores.len(), 2);
    assert_eq!(after_both.current_hole, 3);

    // Re-submitting hole 3 with only one entry drops the other player's score.
    let after_one = game_service::record_scores(&state, game.id, score_patch(3, &[(p1, 6)]))
        .await
        .unwrap();
    assert_eq!(after_one.scores.len(), 1);
    assert_eq!(after_one.scores[0].player_id, p1);
    assert_eq!(after_one.scores[0].strokes, 6);
}

#[tokio::test]
async fn recording_scores_rejects_stroke_counts_beyond_the_cap() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();
    let p1 = game.players[0].id;

    let err =
        game_service::record_scores(&state, game.id, score_patch(1, &[(p1, 3_000_000_000)]))
            .await
            .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn recording_scores_rejects_players_outside_the_roster() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();

    let err =
        game_service::record_scores(&state, game.id, score_patch(1, &[(Uuid::new_v4(), 4)]))
            .await
            .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn advancing_requires_every_player_to_have_scored_the_hole() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 9))
        .await
        .unwrap();
    let p1 = game.players[0].id;

    game_service::record_scores(&state, game.id, score_patch(1, &[(p1, 4)]))
        .await
        .unwrap();

    let err = game_service::navigate_hole(
        &state,
        game.id,
        HoleNavigationRequest::Step {
            direction: StepDirection::Next,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    // Once the second player's score lands the step goes through.
    let p2 = game.players[1].id;
    game_service::record_scores(&state, game.id, score_patch(1, &[(p1, 4), (p2, 3)]))
        .await
        .unwrap();
    let moved = game_service::navigate_hole(
        &state,
        game.id,
        HoleNavigationRequest::Step {
            direction: StepDirection::Next,
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.current_hole, 2);
}

#[tokio::test]
async fn stepping_back_from_the_first_hole_is_a_no_op() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 9))
        .await
        .unwrap();

    let unchanged = game_service::navigate_hole(
        &state,
        game.id,
        HoleNavigationRequest::Step {
            direction: StepDirection::Prev,
        },
    )
    .await
    .unwrap();
    assert_eq!(unchanged.current_hole, 1);
}

#[tokio::test]
async fn jumping_outside_the_course_range_is_rejected() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 9))
        .await
        .unwrap();

    let err = game_service::navigate_hole(&state, game.id, HoleNavigationRequest::Jump {
        hole: 10,
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let jumped = game_service::navigate_hole(&state, game.id, HoleNavigationRequest::Jump {
        hole: 7,
    })
    .await
    .unwrap();
    assert_eq!(jumped.current_hole, 7);
}

#[tokio::test]
async fn advancing_off_the_last_hole_completes_the_round() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 9))
        .await
        .unwrap();

    fill_holes(&state, &game, 1..=8).await;
    game_service::navigate_hole(&state, game.id, HoleNavigationRequest::Jump { hole: 9 })
        .await
        .unwrap();
    fill_holes(&state, &game, 9..=9).await;

    let finished = game_service::navigate_hole(
        &state,
        game.id,
        HoleNavigationRequest::Step {
            direction: StepDirection::Next,
        },
    )
    .await
    .unwrap();
    assert!(finished.completed);

    // Completion releases the current-game slot.
    assert!(matches!(
        game_service::current_game(&state).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn completing_twice_is_idempotent() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();

    let first = game_service::complete_game(&state, game.id).await.unwrap();
    assert!(first.completed);
    let second = game_service::complete_game(&state, game.id).await.unwrap();
    assert!(second.completed);
}

#[tokio::test]
async fn summary_reports_completion_when_every_hole_is_scored() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 9))
        .await
        .unwrap();

    fill_holes(&state, &game, 1..=9).await;

    let summary = game_service::get_game(&state, game.id).await.unwrap();
    assert!(summary.all_holes_scored);
    assert!(summary.completed);
}

#[tokio::test]
async fn reset_releases_the_slot_but_keeps_the_round() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();

    game_service::reset_game(&state).await.unwrap();

    assert!(matches!(
        game_service::current_game(&state).await,
        Err(ServiceError::NotFound(_))
    ));
    let fetched = game_service::get_game(&state, game.id).await.unwrap();
    assert_eq!(fetched.id, game.id);
}

#[tokio::test]
async fn update_round_patches_cursor_and_completion() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();

    let updated = game_service::update_round(&state, game.id, UpdateGameRequest {
        current_hole: Some(5),
        completed: None,
    })
    .await
    .unwrap();
    assert_eq!(updated.current_hole, 5);
    assert!(!updated.completed);

    let err = game_service::update_round(&state, game.id, UpdateGameRequest {
        current_hole: Some(19),
        completed: None,
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn par_overrides_are_limited_to_custom_courses() {
    let state = test_state().await;

    let catalog_game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();
    let err = game_service::set_hole_par(&state, catalog_game.id, 3, HoleParRequest { par: 5 })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    let custom_game = game_service::create_game(&state, two_player_request("custom", 9))
        .await
        .unwrap();
    let updated = game_service::set_hole_par(&state, custom_game.id, 3, HoleParRequest { par: 5 })
        .await
        .unwrap();
    assert_eq!(updated.hole_pars.len(), 1);
    assert_eq!(updated.hole_pars[0].par, 5);
}

#[tokio::test]
async fn scoreboard_ranks_by_total_and_tracks_to_par_mid_round() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("custom", 9))
        .await
        .unwrap();
    let (p1, p2) = (game.players[0].id, game.players[1].id);

    // Two holes scored out of nine; to-par only counts the scored holes.
    game_service::record_scores(&state, game.id, score_patch(1, &[(p1, 5), (p2, 4)]))
        .await
        .unwrap();
    game_service::record_scores(&state, game.id, score_patch(2, &[(p1, 3), (p2, 4)]))
        .await
        .unwrap();

    let board = game_service::scoreboard(&state, game.id).await.unwrap();
    assert!(!board.completed);
    assert_eq!(board.rows.len(), 2);

    // p1: 8 strokes over two par-4 holes, even; p2 is level on 8 too, so
    // roster order breaks the tie.
    assert_eq!(board.rows[0].player_id, p1);
    assert_eq!(board.rows[0].total_strokes, 8);
    assert_eq!(board.rows[0].to_par, 0);
    assert_eq!(board.rows[0].holes_scored, 2);

    // Raising the par of hole 1 swings the to-par figure for both players.
    game_service::set_hole_par(&state, game.id, 1, HoleParRequest { par: 5 })
        .await
        .unwrap();
    let board = game_service::scoreboard(&state, game.id).await.unwrap();
    assert_eq!(board.rows[0].to_par, -1);
}

#[tokio::test]
async fn deleting_a_round_removes_it_entirely() {
    let state = test_state().await;
    let game = game_service::create_game(&state, two_player_request("pebble", 18))
        .await
        .unwrap();

    let store = state.game_store().await.unwrap();
    assert!(store.delete_game(game.id).await.unwrap());

    assert!(matches!(
        game_service::get_game(&state, game.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        game_service::current_game(&state).await,
        Err(ServiceError::NotFound(_))
    ));
}
