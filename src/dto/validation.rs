//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a requested hole count is one of the supported round sizes.
pub fn validate_hole_count(hole_count: u8) -> Result<(), ValidationError> {
    if hole_count == 9 || hole_count == 18 {
        return Ok(());
    }

    let mut err = ValidationError::new("hole_count");
    err.message = Some(format!("Hole count must be 9 or 18 (got {hole_count})").into());
    Err(err)
}

/// Validates that a player name contains at least one non-whitespace character.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if !name.trim().is_empty() {
        return Ok(());
    }

    let mut err = ValidationError::new("player_name");
    err.message = Some("Player name is required".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hole_count_accepts_nine_and_eighteen_only() {
        assert!(validate_hole_count(9).is_ok());
        assert!(validate_hole_count(18).is_ok());
        assert!(validate_hole_count(0).is_err());
        assert!(validate_hole_count(12).is_err());
        assert!(validate_hole_count(27).is_err());
    }

    #[test]
    fn player_name_rejects_blank_strings() {
        assert!(validate_player_name("Ada").is_ok());
        assert!(validate_player_name(" Ada ").is_ok());
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
    }
}
