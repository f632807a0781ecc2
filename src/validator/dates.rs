use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::domain::ValidationError;

/// Longest span accepted by [`validate_time_interval`] unless overridden.
pub const DEFAULT_MAX_INTERVAL_DAYS: i64 = 7;

/// How far back an interval may start (about ten years).
pub const DEFAULT_MAX_HISTORY_DAYS: i64 = 3650;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static ISO_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z?$").unwrap()
});
static ESTONIAN_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").unwrap());

/// Day-first layouts are tried before month-first ones.
const LENIENT_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%Y.%m.%d",
    "%d-%m-%Y",
    "%Y%m%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const LENIENT_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Input accepted by [`validate_date`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Text(String),
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Input accepted by [`validate_time_interval`] for either endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeInput {
    Instant(DateTime<Utc>),
    Text(String),
    /// Seconds since the Unix epoch.
    Unix(i64),
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for TimeInput {
    fn from(value: i64) -> Self {
        Self::Unix(value)
    }
}

/// Limits applied by [`validate_time_interval_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPolicy {
    pub max_days: i64,
    pub max_history_days: i64,
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        Self {
            max_days: DEFAULT_MAX_INTERVAL_DAYS,
            max_history_days: DEFAULT_MAX_HISTORY_DAYS,
        }
    }
}

/// Strict: absent or blank input is `Ok(None)`.
///
/// Dates and datetimes are formatted as `YYYY-MM-DD`. Text already in one of
/// the accepted layouts (`YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[Z]`,
/// `DD.MM.YYYY`) is returned as-is; other text must parse as a date and comes
/// back in ISO form.
pub fn validate_date(value: Option<DateInput>) -> Result<Option<String>, ValidationError> {
    let text = match value {
        None => return Ok(None),
        Some(DateInput::Date(date)) => return Ok(Some(iso_date(date))),
        Some(DateInput::DateTime(date_time)) => return Ok(Some(iso_date(date_time.date_naive()))),
        Some(DateInput::Text(text)) => text,
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if ISO_DATE.is_match(trimmed)
        || ISO_DATE_TIME.is_match(trimmed)
        || ESTONIAN_DATE.is_match(trimmed)
    {
        return Ok(Some(trimmed.to_owned()));
    }

    parse_lenient_date(trimmed)
        .map(|date| Some(iso_date(date)))
        .ok_or(ValidationError::InvalidDate { input: text })
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_lenient_date(value: &str) -> Option<NaiveDate> {
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            LENIENT_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|date_time| date_time.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .or_else(|_| DateTime::parse_from_rfc2822(value))
                .ok()
                .map(|date_time| date_time.date_naive())
        })
}

/// Strict: both endpoints must parse, `start < end`, the span must not exceed
/// `max_days`, and `start` must be within the default history ceiling.
pub fn validate_time_interval(
    start: impl Into<TimeInput>,
    end: impl Into<TimeInput>,
    max_days: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    let policy = IntervalPolicy {
        max_days,
        ..IntervalPolicy::default()
    };
    validate_time_interval_with(start, end, &policy)
}

/// [`validate_time_interval`] with an explicit history ceiling.
pub fn validate_time_interval_with(
    start: impl Into<TimeInput>,
    end: impl Into<TimeInput>,
    policy: &IntervalPolicy,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    check_interval(start.into(), end.into(), policy, Utc::now())
}

fn check_interval(
    start: TimeInput,
    end: TimeInput,
    policy: &IntervalPolicy,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    let start = parse_instant("start", start)?;
    let end = parse_instant("end", end)?;

    if start >= end {
        return Err(ValidationError::IntervalNotOrdered {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        });
    }

    let span = end - start;
    if exceeds_days(span, policy.max_days) {
        return Err(ValidationError::IntervalTooLong {
            max_days: policy.max_days,
            span_seconds: span.num_seconds(),
        });
    }

    if exceeds_days(now - start, policy.max_history_days) {
        return Err(ValidationError::StartTooOld {
            start: start.to_rfc3339(),
            max_days: policy.max_history_days,
        });
    }

    Ok((start, end))
}

/// Limits too large for a `Duration` never trip.
fn exceeds_days(span: Duration, max_days: i64) -> bool {
    Duration::try_days(max_days).is_some_and(|limit| span > limit)
}

fn parse_instant(field: &'static str, value: TimeInput) -> Result<DateTime<Utc>, ValidationError> {
    match value {
        TimeInput::Instant(instant) => Ok(instant),
        TimeInput::Unix(seconds) => {
            DateTime::from_timestamp(seconds, 0).ok_or_else(|| ValidationError::InvalidTime {
                field,
                input: seconds.to_string(),
            })
        }
        TimeInput::Text(text) => parse_instant_text(text.trim())
            .ok_or(ValidationError::InvalidTime { field, input: text }),
    }
}

fn parse_instant_text(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    LENIENT_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
