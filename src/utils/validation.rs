use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Loose syntactic email check. Callers trim the input first.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<&str, ValidationError> {
    if is_valid_email(email) {
        Ok(email)
    } else {
        Err(ValidationError)
    }
}
