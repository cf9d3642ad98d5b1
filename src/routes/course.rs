use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::course::CourseSummary, state::SharedState};

/// List the course catalog loaded at startup.
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    responses((status = 200, description = "Course catalog", body = [CourseSummary]))
)]
pub async fn list_courses(State(state): State<SharedState>) -> Json<Vec<CourseSummary>> {
    let courses = state
        .catalog()
        .courses()
        .iter()
        .map(CourseSummary::from)
        .collect();
    Json(courses)
}

/// Configure the course catalog routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/api/courses", get(list_courses))
}
