use validator::ValidateEmail;

use crate::models::{FieldError, RegisterRequest};

/// Declarative field rules for registration input.
///
/// Every field is checked independently so a single submission reports all of
/// its violations at once; errors follow field declaration order (name,
/// email, password). This module never consults the credential store —
/// email uniqueness is a business rule checked by the registration flow.
pub fn validate_registration(input: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if normalize_name(&input.name).is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }

    if !input.email.validate_email() {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }

    if input.password.chars().count() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters long",
        ));
    }

    errors
}

/// Strip control characters and surrounding whitespace from a name.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Canonicalize an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_input_produces_no_errors() {
        let errors = validate_registration(&request("Test User", "t@example.com", "password123"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_name_is_reported() {
        let errors = validate_registration(&request("", "t@example.com", "password123"));

        assert_eq!(errors, vec![FieldError::new("name", "Name is required")]);
    }

    #[test]
    fn test_whitespace_only_name_is_reported() {
        let errors = validate_registration(&request("   ", "t@example.com", "password123"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn test_invalid_email_is_reported() {
        for email in ["", "not-an-email", "missing@tld@twice"] {
            let errors = validate_registration(&request("Test User", email, "password123"));
            assert_eq!(errors.len(), 1, "email {:?} should fail", email);
            assert_eq!(errors[0].field, "email");
            assert_eq!(errors[0].message, "Please include a valid email");
        }
    }

    #[test]
    fn test_short_password_is_reported() {
        let errors = validate_registration(&request("Test User", "t@example.com", "short12"));

        assert_eq!(
            errors,
            vec![FieldError::new("password", "Password must be at least 8 characters long")]
        );
    }

    #[test]
    fn test_exactly_eight_characters_passes() {
        let errors = validate_registration(&request("Test User", "t@example.com", "12345678"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_all_violations_are_collected_in_field_order() {
        let errors = validate_registration(&request("", "nope", "short"));

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_one_failing_field_does_not_suppress_others() {
        let errors = validate_registration(&request("", "t@example.com", "short"));

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "password"]);
    }

    #[test]
    fn test_normalize_name_strips_control_characters() {
        assert_eq!(normalize_name("  Test\u{0007} User\n"), "Test User");
        assert_eq!(normalize_name("\t\r\n"), "");
    }

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("  T@Example.COM "), "t@example.com");
    }
}
