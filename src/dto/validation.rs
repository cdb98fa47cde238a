//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted roll number, measured after trimming.
pub const MAX_ROLL_NO_LENGTH: usize = 64;

/// Validates that every submitted roll number fits within [`MAX_ROLL_NO_LENGTH`].
///
/// Blank entries are accepted here; they are dropped during normalization and
/// the service rejects batches where nothing usable remains.
///
/// # Examples
///
/// ```ignore
/// validate_roll_numbers(&["21BCE0042".into()]) // Ok
/// validate_roll_numbers(&["x".repeat(65)])     // Err - too long
/// ```
pub fn validate_roll_numbers(roll_nos: &[String]) -> Result<(), ValidationError> {
    roll_nos
        .iter()
        .try_for_each(|roll_no| check_trimmed_length(roll_no))
}

/// Validates a single roll number: non-blank and within [`MAX_ROLL_NO_LENGTH`]
/// once surrounding whitespace is removed.
pub fn validate_roll_number(roll_no: &str) -> Result<(), ValidationError> {
    if roll_no.trim().is_empty() {
        let mut err = ValidationError::new("roll_no_blank");
        err.message = Some("rollNo must not be blank".into());
        return Err(err);
    }
    check_trimmed_length(roll_no)
}

fn check_trimmed_length(roll_no: &str) -> Result<(), ValidationError> {
    let length = roll_no.trim().chars().count();
    if length <= MAX_ROLL_NO_LENGTH {
        return Ok(());
    }
    let mut err = ValidationError::new("roll_no_length");
    err.message = Some(
        format!("roll number must be at most {MAX_ROLL_NO_LENGTH} characters (got {length})")
            .into(),
    );
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_roll_numbers_valid() {
        assert!(validate_roll_numbers(&["21BCE0042".into(), " a1 ".into()]).is_ok());
        assert!(validate_roll_numbers(&["   ".into()]).is_ok());
        assert!(validate_roll_numbers(&[format!("  {}  ", "x".repeat(64))]).is_ok());
    }

    #[test]
    fn test_validate_roll_numbers_too_long() {
        assert!(validate_roll_numbers(&["ok".into(), "x".repeat(65)]).is_err());
    }

    #[test]
    fn test_validate_roll_number_trims_before_measuring() {
        assert!(validate_roll_number("21BCE0042").is_ok());
        assert!(validate_roll_number(&format!("  {}  ", "x".repeat(64))).is_ok());
        assert!(validate_roll_number(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_roll_number_blank() {
        let err = validate_roll_number("   ").unwrap_err();
        assert_eq!(err.code, "roll_no_blank");
        assert!(validate_roll_number("").is_err());
    }
}
