//! Validation helpers for DTOs.

use validator::ValidationError;

const MAX_USERNAME_LENGTH: usize = 64;

/// Validates that a username is not blank and fits the stored key length.
///
/// Surrounding whitespace is ignored for the blank check only; the stored
/// username keeps its submitted form.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        let mut err = ValidationError::new("username_blank");
        err.message = Some("Username must not be blank".into());
        return Err(err);
    }

    if username.len() > MAX_USERNAME_LENGTH {
        let mut err = ValidationError::new("username_length");
        err.message = Some(
            format!(
                "Username must be at most {} bytes (got {})",
                MAX_USERNAME_LENGTH,
                username.len()
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("ada").is_ok());
        assert!(validate_username("Ada Lovelace").is_ok());
        assert!(validate_username("player_1").is_ok());
    }

    #[test]
    fn test_validate_username_blank() {
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("\t\n").is_err());
    }

    #[test]
    fn test_validate_username_too_long() {
        let long = "x".repeat(MAX_USERNAME_LENGTH + 1);
        assert!(validate_username(&long).is_err());
        let max = "x".repeat(MAX_USERNAME_LENGTH);
        assert!(validate_username(&max).is_ok());
    }
}
