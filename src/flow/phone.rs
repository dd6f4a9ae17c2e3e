//! Phone normalization into a canonical international form.

use crate::error::ApiError;

/// Country code prepended to bare 10-digit numbers.
const DEFAULT_COUNTRY_CODE: &str = "+91";
/// Minimum length of a normalized number, `+` included.
const MIN_NORMALIZED_LEN: usize = 12;

/// Normalize a raw phone input.
///
/// Whitespace and dashes are stripped; a bare 10-digit number gets the default
/// country code, a longer bare number gets a leading `+`.
///
/// # Errors
/// Returns a validation error when the normalized form does not start with `+`
/// or is shorter than 12 characters.
pub fn normalize_phone(raw: &str) -> Result<String, ApiError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let normalized = if cleaned.len() == 10 && !cleaned.starts_with('+') {
        format!("{DEFAULT_COUNTRY_CODE}{cleaned}")
    } else if cleaned.len() > 10 && !cleaned.starts_with('+') {
        format!("+{cleaned}")
    } else {
        cleaned
    };

    if !normalized.starts_with('+') || normalized.len() < MIN_NORMALIZED_LEN {
        return Err(ApiError::Validation(
            "Please enter a valid mobile number with country code (e.g., 9876543210).".to_string(),
        ));
    }

    Ok(normalized)
}
