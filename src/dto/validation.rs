//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a set score string has the `"P1-P2"` shape, e.g. `"21-10"`.
///
/// # Examples
///
/// ```ignore
/// validate_set_score("21-10") // Ok
/// validate_set_score("21:10") // Err - wrong separator
/// validate_set_score("21-")   // Err - missing side
/// ```
pub fn validate_set_score(score: &str) -> Result<(), ValidationError> {
    let Some((left, right)) = score.split_once('-') else {
        let mut err = ValidationError::new("set_score_format");
        err.message = Some("Set score must be two numbers separated by '-'".into());
        return Err(err);
    };

    if left.is_empty()
        || right.is_empty()
        || left.parse::<u8>().is_err()
        || right.parse::<u8>().is_err()
    {
        let mut err = ValidationError::new("set_score_points");
        err.message = Some("Set score sides must be small non-negative numbers".into());
        return Err(err);
    }

    Ok(())
}
