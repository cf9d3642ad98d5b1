//! Request/response types crossing the HTTP boundary.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Course catalog projections.
pub mod course;
/// Game setup, mutation, and summary types.
pub mod game;
/// Health endpoint payload.
pub mod health;
/// Field validators shared by request DTOs.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
