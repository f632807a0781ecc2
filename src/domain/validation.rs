use std::fmt;

/// Rejection of a caller-supplied value.
///
/// Every message names what was wrong, echoes the offending input and states
/// the expected constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    InvalidRegistryCode {
        input: String,
    },
    InvalidDate {
        input: String,
    },
    InvalidLanguage {
        input: String,
    },
    NotAnInteger {
        field: &'static str,
        input: String,
    },
    BelowMinimum {
        field: &'static str,
        min: i64,
        actual: i64,
    },
    AboveMaximum {
        field: &'static str,
        max: i64,
        actual: i64,
    },
    TooManyRegistryCodes {
        max: usize,
        actual: usize,
    },
    InvalidTime {
        field: &'static str,
        input: String,
    },
    IntervalNotOrdered {
        start: String,
        end: String,
    },
    IntervalTooLong {
        max_days: i64,
        span_seconds: i64,
    },
    StartTooOld {
        start: String,
        max_days: i64,
    },
    InvalidOperationName {
        input: String,
    },
    InvalidParameterName {
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::InvalidRegistryCode { input } => {
                write!(
                    f,
                    "invalid registry code: '{input}'. Must be exactly 8 digits"
                )
            }
            Self::InvalidDate { input } => write!(
                f,
                "invalid date format: '{input}'. Expected YYYY-MM-DD, YYYY-MM-DDTHH:MM:SSZ or DD.MM.YYYY"
            ),
            Self::InvalidLanguage { input } => {
                write!(f, "invalid language: '{input}'. Must be one of: eng, est")
            }
            Self::NotAnInteger { field, input } => {
                write!(f, "invalid {field}: '{input}'. Must be an integer")
            }
            Self::BelowMinimum { field, min, actual } => {
                write!(f, "{field} must be at least {min}, got {actual}")
            }
            Self::AboveMaximum { field, max, actual } => {
                write!(f, "{field} too large: {actual} (max {max})")
            }
            Self::TooManyRegistryCodes { max, actual } => {
                write!(f, "too many registry codes: {actual} (max {max})")
            }
            Self::InvalidTime { field, input } => write!(
                f,
                "invalid {field} time: '{input}'. Expected an ISO-8601 timestamp or Unix seconds"
            ),
            Self::IntervalNotOrdered { start, end } => {
                write!(
                    f,
                    "start time must be before end time (start: {start}, end: {end})"
                )
            }
            Self::IntervalTooLong {
                max_days,
                span_seconds,
            } => {
                let days = *span_seconds as f64 / 86_400.0;
                write!(
                    f,
                    "time interval too long: {days:.1} days (max {max_days} days)"
                )
            }
            Self::StartTooOld { start, max_days } => {
                write!(
                    f,
                    "start time too far in the past: {start} (max {max_days} days ago)"
                )
            }
            Self::InvalidOperationName { input } => write!(
                f,
                "invalid operation name: '{input}'. Must be a valid XML element name"
            ),
            Self::InvalidParameterName { input } => write!(
                f,
                "invalid parameter name: '{input}'. Must be a valid XML element name"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty {
            field: "registry codes list",
        };
        assert_eq!(err.to_string(), "registry codes list cannot be empty");

        let err = ValidationError::InvalidRegistryCode {
            input: "123".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid registry code: '123'. Must be exactly 8 digits"
        );

        let err = ValidationError::AboveMaximum {
            field: "results limit",
            max: 100,
            actual: 101,
        };
        assert_eq!(err.to_string(), "results limit too large: 101 (max 100)");

        let err = ValidationError::BelowMinimum {
            field: "page number",
            min: 1,
            actual: 0,
        };
        assert_eq!(err.to_string(), "page number must be at least 1, got 0");
    }

    #[test]
    fn interval_span_is_reported_in_days() {
        let err = ValidationError::IntervalTooLong {
            max_days: 7,
            span_seconds: 8 * 86_400 + 43_200,
        };
        assert_eq!(
            err.to_string(),
            "time interval too long: 8.5 days (max 7 days)"
        );
    }
}
