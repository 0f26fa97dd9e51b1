//! Presence and format checks applied at the HTTP boundary and on service entry.
//!
//! Every failure is an [`Error::InvalidInput`] tagged with the resource it concerns, so the
//! response reads "User details is wrong" or "Book details is wrong".

use crate::errors::{Error, Result};
use crate::types::Resource;
use regex::Regex;

/// Unwrap an identifier that may be absent.
pub fn require_id(id: Option<i64>, resource: Resource) -> Result<i64> {
    id.ok_or_else(|| Error::invalid_input(resource, format!("{resource} id is null")))
}

/// Unwrap a DTO or request that may be absent.
pub fn require_dto<T>(dto: Option<T>, resource: Resource) -> Result<T> {
    dto.ok_or_else(|| Error::invalid_input(resource, format!("{resource} is null")))
}

/// Parse an identifier taken from a path segment.
pub fn parse_id(raw: &str, resource: Resource) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::invalid_input(resource, format!("{resource} id '{raw}' is not a number")))
}

/// Check a request-id header value against the configured pattern.
pub fn validate_request_id(value: Option<&str>, pattern: &Regex, resource: Resource) -> Result<String> {
    match value {
        None => Err(Error::invalid_input(resource, "Request id header is missing")),
        Some(value) if pattern.is_match(value) => Ok(value.to_string()),
        Some(value) => Err(Error::invalid_input(resource, format!("Request id '{value}' is malformed"))),
    }
}
