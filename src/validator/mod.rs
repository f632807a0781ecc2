//! Input validation and sanitizing for values that end up in requests.
//!
//! Two families of functions live here:
//! - strict validators return `Result<_, ValidationError>`: absent input is
//!   fine (`Ok(None)` or a default), present but malformed input is an error;
//! - soft checkers return `Option<_>`/`String` and never fail: any problem
//!   yields `None`.
//!
//! Each function documents which family it belongs to.

mod dates;
mod identifiers;
mod params;
mod text;

pub use dates::{
    DEFAULT_MAX_HISTORY_DAYS, DEFAULT_MAX_INTERVAL_DAYS, DateInput, IntervalPolicy, TimeInput,
    validate_date, validate_time_interval, validate_time_interval_with,
};
pub use identifiers::{
    CodeList, MAX_BULK_REGISTRY_CODES, REGISTRY_CODE_LENGTH, normalize_registry_code,
    validate_personal_code, validate_registry_code, validate_registry_codes_array,
};
pub use params::{
    DEFAULT_PAGE, DEFAULT_RESULTS_LIMIT, IntegerInput, MAX_PAGE, MAX_RESULTS_LIMIT,
    validate_language, validate_page_number, validate_results_limit,
};
pub use text::{
    MAX_COMPANY_NAME_CHARS, MAX_PERSON_NAME_CHARS, sanitize_xml_input, validate_company_name,
    validate_person_name,
};
