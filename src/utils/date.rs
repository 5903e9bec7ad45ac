//! Parsing of calendar dates supplied as strings.

use crate::error::AppError;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Accepted textual date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strict `YYYY-MM-DD` shape; chrono alone would also accept unpadded parts.
static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Parses a `YYYY-MM-DD` string for the named field.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the field and the expected format
/// when the value has the wrong shape or is not a real calendar date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let invalid = || {
        AppError::bad_request(
            format!("Invalid date format for {field}. Use YYYY-MM-DD."),
            json!({ "field": field, "value": value, "expected": "YYYY-MM-DD" }),
        )
    };

    if !DATE_REGEX.is_match(value) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}
