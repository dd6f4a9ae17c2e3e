//! Password policy for account finalization.

/// Minimum password length enforced by the client for early feedback.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Accepts passwords of at least six characters containing at least one digit
/// and one lowercase letter.
#[must_use]
pub fn meets_password_policy(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
}
