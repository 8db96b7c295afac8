use zxcvbn::{zxcvbn, Score};

/// Password strength requirements
pub struct PasswordStrength {
    /// Minimum password length
    pub min_length: usize,
    /// Minimum zxcvbn score (0-4)
    pub min_score: Score,
}

impl Default for PasswordStrength {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_score: Score::Three,
        }
    }
}

/// Validation result with detailed feedback
#[derive(Debug)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub score: Score,
    pub feedback: Vec<String>,
}

/// Validate password strength
///
/// The composition floor (length, digit, uppercase, symbol) is checked first,
/// then zxcvbn scores the password against common patterns and the supplied
/// user inputs (email, name, etc.).
pub fn validate_password_strength(
    password: &str,
    user_inputs: &[&str],
) -> PasswordValidationResult {
    let requirements = PasswordStrength::default();

    let mut feedback = Vec::new();

    if password.len() < requirements.min_length {
        feedback.push(format!(
            "Password must be at least {} characters long",
            requirements.min_length
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        feedback.push("Password must contain at least one digit".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        feedback.push("Password must contain at least one uppercase letter".to_string());
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        feedback.push("Password must contain at least one symbol".to_string());
    }

    if !feedback.is_empty() {
        return PasswordValidationResult {
            is_valid: false,
            score: Score::Zero,
            feedback,
        };
    }

    // Run zxcvbn analysis
    let entropy = zxcvbn(password, user_inputs);
    let score = entropy.score();

    let is_valid = score >= requirements.min_score;

    // Add suggestions from zxcvbn
    if let Some(zxcvbn_feedback) = entropy.feedback() {
        if let Some(warning) = zxcvbn_feedback.warning() {
            feedback.push(warning.to_string());
        }

        for suggestion in zxcvbn_feedback.suggestions() {
            feedback.push(suggestion.to_string());
        }
    }

    if !is_valid && feedback.is_empty() {
        feedback.push("Password is too weak".to_string());
    }

    PasswordValidationResult {
        is_valid,
        score,
        feedback,
    }
}

/// Quick validation - returns error message if invalid
pub fn validate_password_quick(password: &str, user_inputs: &[&str]) -> Result<(), String> {
    let result = validate_password_strength(password, user_inputs);

    if !result.is_valid {
        if result.feedback.is_empty() {
            return Err("Password is too weak".to_string());
        }
        return Err(result.feedback.join(". "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = validate_password_strength("Ab1!", &[]);
        assert!(!result.is_valid);
        assert!(result.feedback.iter().any(|f| f.contains("at least 8")));
    }

    #[test]
    fn test_missing_digit() {
        let result = validate_password_strength("NoDigitsHere!", &[]);
        assert!(!result.is_valid);
        assert!(result.feedback.iter().any(|f| f.contains("digit")));
    }

    #[test]
    fn test_missing_uppercase() {
        let result = validate_password_strength("nouppercase1!", &[]);
        assert!(!result.is_valid);
        assert!(result.feedback.iter().any(|f| f.contains("uppercase")));
    }

    #[test]
    fn test_missing_symbol() {
        let result = validate_password_strength("NoSymbolHere1", &[]);
        assert!(!result.is_valid);
        assert!(result.feedback.iter().any(|f| f.contains("symbol")));
    }

    #[test]
    fn test_weak_but_composed_password() {
        // Meets the composition floor but trivially guessable
        let result = validate_password_strength("Password1!", &[]);
        assert!(!result.is_valid);
        assert!(result.score < Score::Three);
    }

    #[test]
    fn test_password_built_from_user_info() {
        let result =
            validate_password_strength("John.doe@Example1!", &["john", "doe", "john.doe@example.com"]);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_strong_password() {
        let result = validate_password_strength("Tr0ub4dor&3xKcd!", &[]);
        assert!(result.is_valid);
        assert!(result.score >= Score::Three);
    }

    #[test]
    fn test_quick_validation_ok() {
        assert!(validate_password_quick("MyS3cure!P@ssw0rd", &[]).is_ok());
    }

    #[test]
    fn test_quick_validation_error() {
        let result = validate_password_quick("123456", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_common_password_patterns() {
        let weak_passwords = vec!["password", "123456789", "qwerty", "abc123", "letmein"];

        for pwd in weak_passwords {
            let result = validate_password_strength(pwd, &[]);
            assert!(!result.is_valid, "Password '{}' should be rejected", pwd);
        }
    }
}
