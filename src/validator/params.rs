use crate::domain::{Language, ValidationError};

pub const DEFAULT_PAGE: u32 = 1;
pub const MAX_PAGE: u32 = 10_000;
pub const DEFAULT_RESULTS_LIMIT: u32 = 10;
pub const MAX_RESULTS_LIMIT: u32 = 100;

/// An integer as callers tend to supply it: already numeric, or as text from
/// a query string or form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegerInput {
    Int(i64),
    Text(String),
}

impl From<i64> for IntegerInput {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for IntegerInput {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for IntegerInput {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for IntegerInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for IntegerInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

fn coerce(field: &'static str, value: IntegerInput) -> Result<i64, ValidationError> {
    match value {
        IntegerInput::Int(value) => Ok(value),
        IntegerInput::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::NotAnInteger { field, input: text }),
    }
}

fn bounded(field: &'static str, value: i64, min: u32, max: u32) -> Result<u32, ValidationError> {
    if value < i64::from(min) {
        return Err(ValidationError::BelowMinimum {
            field,
            min: i64::from(min),
            actual: value,
        });
    }
    if value > i64::from(max) {
        return Err(ValidationError::AboveMaximum {
            field,
            max: i64::from(max),
            actual: value,
        });
    }
    // Both bounds are u32, so the value fits.
    Ok(value as u32)
}

/// Strict: blank input defaults to `eng`; otherwise the lowercased value must
/// be `eng` or `est`.
pub fn validate_language(value: Option<&str>) -> Result<Language, ValidationError> {
    match value.filter(|value| !value.trim().is_empty()) {
        None => Ok(Language::default()),
        Some(value) => value.parse(),
    }
}

/// Strict: `None` defaults to page 1; otherwise `1..=10000`.
pub fn validate_page_number(value: Option<IntegerInput>) -> Result<u32, ValidationError> {
    let Some(value) = value else {
        return Ok(DEFAULT_PAGE);
    };
    bounded("page number", coerce("page number", value)?, 1, MAX_PAGE)
}

/// Strict: `None` defaults to 10; otherwise `1..=max_allowed`.
pub fn validate_results_limit(
    value: Option<IntegerInput>,
    max_allowed: u32,
) -> Result<u32, ValidationError> {
    let Some(value) = value else {
        return Ok(DEFAULT_RESULTS_LIMIT);
    };
    bounded(
        "results limit",
        coerce("results limit", value)?,
        1,
        max_allowed,
    )
}
