use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Shared-secret check for service-to-service calls
#[derive(Clone)]
pub struct SecretKeyValidator {
    expected_key: String,
}

impl SecretKeyValidator {
    pub fn new(expected_key: impl Into<String>) -> Self {
        Self {
            expected_key: expected_key.into(),
        }
    }

    /// Compare `provided_key` with the configured secret in constant time.
    pub fn validate(&self, provided_key: &str) -> Result<(), AppError> {
        let expected = self.expected_key.as_bytes();
        let provided = provided_key.as_bytes();

        let length_matches = expected.len() == provided.len();
        let min_len = expected.len().min(provided.len());
        let content_matches = expected[..min_len].ct_eq(&provided[..min_len]).unwrap_u8() == 1;

        if expected.is_empty() || !length_matches || !content_matches {
            tracing::warn!(
                event = "invalid_secret_key_attempt",
                "Invalid secret key attempt detected"
            );
            return Err(AppError::InvalidSecretKey);
        }

        Ok(())
    }
}

impl std::fmt::Debug for SecretKeyValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKeyValidator")
            .field("expected_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pass_with_correct_key() {
        let validator = SecretKeyValidator::new("correct-key");
        assert!(validator.validate("correct-key").is_ok());
    }

    #[test]
    fn should_fail_with_incorrect_key() {
        let validator = SecretKeyValidator::new("correct-key");
        assert!(matches!(
            validator.validate("wrong-key!!"),
            Err(AppError::InvalidSecretKey)
        ));
    }

    #[test]
    fn should_fail_with_prefix_of_key() {
        let validator = SecretKeyValidator::new("correct-key");
        assert!(validator.validate("correct").is_err());
        assert!(validator.validate("correct-key-and-more").is_err());
    }

    #[test]
    fn empty_configured_key_should_reject_everything() {
        let validator = SecretKeyValidator::new("");
        assert!(validator.validate("").is_err());
    }

    #[test]
    fn debug_output_should_hide_key() {
        let validator = SecretKeyValidator::new("super-secret");
        assert!(!format!("{validator:?}").contains("super-secret"));
    }
}
