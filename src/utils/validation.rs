use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Regional mobile numbers: optional 237 country code, then 9 digits starting with 6.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+?237)?6\d{8}$").expect("Invalid phone regex"));

pub const MAX_MESSAGE_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Message must be at most {MAX_MESSAGE_LEN} characters")]
    MessageTooLong,
}

/// Strip the separators people type into phone fields
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
        .collect()
}

pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let normalized = normalize_phone(raw);
    if normalized.is_empty() {
        return Err(ValidationError::MissingField("phone"));
    }
    if !PHONE_RE.is_match(&normalized) {
        return Err(ValidationError::InvalidPhone(raw.trim().to_string()));
    }
    Ok(normalized)
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

pub fn validate_message(body: &str) -> Result<String, ValidationError> {
    let body = body.trim();
    require("message", body)?;
    if body.chars().count() > MAX_MESSAGE_LEN {
        return Err(ValidationError::MessageTooLong);
    }
    Ok(body.to_string())
}
