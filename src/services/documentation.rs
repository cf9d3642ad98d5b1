use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Fairway Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::course::list_courses,
        crate::routes::game::current_game,
        crate::routes::game::create_game,
        crate::routes::game::reset_game,
        crate::routes::game::get_game,
        crate::routes::game::update_game,
        crate::routes::game::record_scores,
        crate::routes::game::complete_game,
        crate::routes::game::navigate_hole,
        crate::routes::game::set_hole_par,
        crate::routes::game::scoreboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::course::CourseSummary,
            crate::dto::course::HoleSummary,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::PlayerInput,
            crate::dto::game::UpdateGameRequest,
            crate::dto::game::ScorePatchRequest,
            crate::dto::game::ScoreEntryInput,
            crate::dto::game::HoleNavigationRequest,
            crate::dto::game::StepDirection,
            crate::dto::game::HoleParRequest,
            crate::dto::game::GameSummary,
            crate::dto::game::PlayerSummary,
            crate::dto::game::ScoreSnapshot,
            crate::dto::game::HoleParSnapshot,
            crate::dto::game::ScoreboardResponse,
            crate::dto::game::ScoreboardEntry,
            crate::error::ErrorBody,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "courses", description = "Course catalog"),
        (name = "game", description = "Round lifecycle and scorekeeping"),
    )
)]
pub struct ApiDoc;
