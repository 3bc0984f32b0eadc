use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // Length: 5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // Letters, digits, underscores or hyphens only
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// Essay titles are 3 to 100 characters after trimming.
pub fn validate_essay_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    let len = trimmed.chars().count();
    if len < 3 {
        return Err("Title must be at least 3 characters long");
    }
    if len > 100 {
        return Err("Title must be at most 100 characters long");
    }
    Ok(())
}

/// Essay themes are optional, at most 200 characters after trimming.
pub fn validate_essay_theme(theme: &str) -> Result<(), &'static str> {
    if theme.trim().chars().count() > 200 {
        return Err("Theme must be at most 200 characters long");
    }
    Ok(())
}

/// Password policy validation result
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// Validate a password against the security policy
///
/// Policy:
/// - minimum length: 8 characters
/// - must contain uppercase + lowercase + digit
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("aluno_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("nome com espaço").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("aluno@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_essay_title() {
        assert!(validate_essay_title("Redação Teste").is_ok());
        assert!(validate_essay_title("  ab  ").is_err());
        assert!(validate_essay_title(&"a".repeat(101)).is_err());
        // Exactly at the bounds
        assert!(validate_essay_title("abc").is_ok());
        assert!(validate_essay_title(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_essay_theme() {
        assert!(validate_essay_theme("Desafios da educação no Brasil").is_ok());
        assert!(validate_essay_theme(&"t".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Senha123").is_valid);
        assert!(!validate_password("curta").is_valid);
        assert!(!validate_password("semdigitos").is_valid);
        assert!(!validate_password("MAIUSCULAS123").is_valid);

        let result = validate_password("abc");
        assert!(!result.is_valid);
        assert!(!result.error_message().is_empty());
    }
}
