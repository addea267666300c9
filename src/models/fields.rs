//! Field-level rules shared by the record types.

use crate::core::{GatewayError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"^https?://[A-Za-z0-9.-]+(?::\d+)?(?:[/?#]\S*)?$").unwrap();
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Non-blank text no longer than `max_len` characters.
pub fn required_text(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::field(field, "This field may not be blank."));
    }
    max_length(field, value, max_len)
}

pub fn max_length(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.chars().count() > max_len {
        return Err(GatewayError::field(
            field,
            format!("Ensure this field has no more than {max_len} characters."),
        ));
    }
    Ok(())
}

/// Empty, or an absolute http(s) URL.
pub fn optional_url(field: &str, value: &str, max_len: usize) -> Result<()> {
    max_length(field, value, max_len)?;
    if !value.is_empty() && !URL_PATTERN.is_match(value) {
        return Err(GatewayError::field(field, "Enter a valid URL."));
    }
    Ok(())
}

/// Empty, or something shaped like `local@domain.tld`.
pub fn optional_email(field: &str, value: &str, max_len: usize) -> Result<()> {
    max_length(field, value, max_len)?;
    if !value.is_empty() && !EMAIL_PATTERN.is_match(value) {
        return Err(GatewayError::field(field, "Enter a valid email address."));
    }
    Ok(())
}

/// `deserialize_with` for partial payloads: an absent key stays `None`
/// (via `#[serde(default)]`), a present key must hold a `T`, so `null` is a
/// type error just as it is in a full payload.
pub fn present_value<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
