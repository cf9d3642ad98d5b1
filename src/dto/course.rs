//! Course catalog DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Course;

/// Catalog course as exposed by `GET /api/courses`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseSummary {
    /// Stable catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hole layout in play order.
    pub holes: Vec<HoleSummary>,
}

/// One hole of a catalog course.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoleSummary {
    /// 1-based hole number.
    pub number: u8,
    /// Par for the hole.
    pub par: u8,
    /// Length in yards.
    pub yards: u16,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            name: course.name.clone(),
            holes: course
                .holes
                .iter()
                .map(|hole| HoleSummary {
                    number: hole.number,
                    par: hole.par,
                    yards: hole.yards,
                })
                .collect(),
        }
    }
}
