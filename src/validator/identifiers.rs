use crate::domain::ValidationError;

/// Registry codes are exactly this many digits.
pub const REGISTRY_CODE_LENGTH: usize = 8;

/// Default cap for bulk registry-code lookups.
pub const MAX_BULK_REGISTRY_CODES: usize = 100;

const PERSONAL_CODE_LENGTH: usize = 11;
const CHECKSUM_WEIGHTS_FIRST: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 1];
const CHECKSUM_WEIGHTS_SECOND: [u32; 10] = [3, 4, 5, 6, 7, 8, 9, 1, 2, 3];

/// One registry code or a list of them, as accepted by
/// [`validate_registry_codes_array`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeList {
    One(String),
    Many(Vec<String>),
}

impl CodeList {
    fn is_empty(&self) -> bool {
        match self {
            Self::One(code) => code.is_empty(),
            Self::Many(codes) => codes.is_empty(),
        }
    }

    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(code) => vec![code],
            Self::Many(codes) => codes,
        }
    }
}

impl From<&str> for CodeList {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl From<String> for CodeList {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl<T: Into<String>> From<Vec<T>> for CodeList {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for CodeList {
    fn from(values: &[&str]) -> Self {
        Self::Many(values.iter().map(|code| (*code).to_owned()).collect())
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Strict: absent or blank input is `Ok(None)`; anything else must reduce to
/// exactly 8 digits once non-digits are stripped.
///
/// Short codes are rejected, not padded. See [`normalize_registry_code`].
pub fn validate_registry_code(code: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(code) = code.filter(|code| !code.trim().is_empty()) else {
        return Ok(None);
    };

    let digits = digits_only(code);
    if digits.len() != REGISTRY_CODE_LENGTH {
        return Err(ValidationError::InvalidRegistryCode {
            input: code.to_owned(),
        });
    }
    Ok(Some(digits))
}

/// Soft: strip non-digits and left-pad 1..=8 digit codes with zeros.
///
/// Used by lookups that accept historic short codes. Returns `None` when
/// nothing usable is left or the code is longer than 8 digits.
pub fn normalize_registry_code(code: &str) -> Option<String> {
    let digits = digits_only(code);
    if digits.is_empty() || digits.len() > REGISTRY_CODE_LENGTH {
        return None;
    }
    Some(format!("{digits:0>width$}", width = REGISTRY_CODE_LENGTH))
}

/// Soft: returns the 11-digit personal code when its format and check digit
/// are valid, `None` for anything else (including absent input).
pub fn validate_personal_code(code: Option<&str>) -> Option<String> {
    let code = code.filter(|code| !code.trim().is_empty())?;
    let digits = digits_only(code);

    if digits.len() != PERSONAL_CODE_LENGTH || !matches!(digits.as_bytes()[0], b'1'..=b'6') {
        return None;
    }
    personal_code_checksum_matches(&digits).then_some(digits)
}

/// Estonian personal code check digit (two weighted passes, mod 11).
fn personal_code_checksum_matches(digits: &str) -> bool {
    let values = digits
        .bytes()
        .map(|byte| u32::from(byte - b'0'))
        .collect::<Vec<_>>();
    let weighted = |weights: &[u32; 10]| -> u32 {
        values
            .iter()
            .zip(weights)
            .map(|(value, weight)| value * weight)
            .sum::<u32>()
            % 11
    };

    let mut expected = weighted(&CHECKSUM_WEIGHTS_FIRST);
    if expected == 10 {
        expected = weighted(&CHECKSUM_WEIGHTS_SECOND);
        if expected == 10 {
            expected = 0;
        }
    }
    values[10] == expected
}

/// Strict, and unlike [`validate_registry_code`] an empty list is an error.
///
/// Every element goes through [`validate_registry_code`]; blank elements are
/// dropped.
pub fn validate_registry_codes_array(
    codes: Option<CodeList>,
    max_count: usize,
) -> Result<Vec<String>, ValidationError> {
    let Some(codes) = codes.filter(|codes| !codes.is_empty()) else {
        return Err(ValidationError::Empty {
            field: "registry codes list",
        });
    };

    let codes = codes.into_vec();
    if codes.len() > max_count {
        return Err(ValidationError::TooManyRegistryCodes {
            max: max_count,
            actual: codes.len(),
        });
    }

    let mut validated = Vec::with_capacity(codes.len());
    for code in &codes {
        if let Some(code) = validate_registry_code(Some(code.as_str()))? {
            validated.push(code);
        }
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_digit_codes_pass_unchanged() {
        for code in ["10060701", "00000000", "99999999", "12345678"] {
            assert_eq!(validate_registry_code(Some(code)).unwrap().as_deref(), Some(code));
        }
    }

    #[test]
    fn separators_are_stripped_before_length_check() {
        assert_eq!(
            validate_registry_code(Some(" 1006-0701 ")).unwrap().as_deref(),
            Some("10060701")
        );
    }

    #[test]
    fn absent_registry_code_is_none() {
        assert_eq!(validate_registry_code(None).unwrap(), None);
        assert_eq!(validate_registry_code(Some("")).unwrap(), None);
        assert_eq!(validate_registry_code(Some("   ")).unwrap(), None);
    }

    #[test]
    fn malformed_registry_codes_are_rejected() {
        for code in ["1234567", "123456789", "abc", "1006070a", "١٠٠٦٠٧٠١"] {
            let err = validate_registry_code(Some(code)).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidRegistryCode {
                    input: code.to_owned()
                }
            );
            let message = err.to_string();
            assert!(message.contains(code), "{message}");
            assert!(message.contains("Must be exactly 8 digits"), "{message}");
        }
    }

    #[test]
    fn normalization_pads_short_codes_but_strict_validation_does_not() {
        assert_eq!(normalize_registry_code("123").as_deref(), Some("00000123"));
        assert_eq!(normalize_registry_code("10060701").as_deref(), Some("10060701"));
        assert_eq!(normalize_registry_code("123456789"), None);
        assert_eq!(normalize_registry_code("abc"), None);
        assert!(validate_registry_code(Some("123")).is_err());
    }

    #[test]
    fn personal_code_with_valid_checksum_is_returned() {
        assert_eq!(
            validate_personal_code(Some("39001010000")).as_deref(),
            Some("39001010000")
        );
        assert_eq!(
            validate_personal_code(Some("37605030299")).as_deref(),
            Some("37605030299")
        );
    }

    #[test]
    fn personal_code_checksum_mismatch_is_none() {
        assert_eq!(validate_personal_code(Some("39001010001")), None);
        assert_eq!(validate_personal_code(Some("37605030290")), None);
    }

    #[test]
    fn personal_code_second_pass_is_used_when_first_remainder_is_ten() {
        assert_eq!(
            validate_personal_code(Some("39001010238")).as_deref(),
            Some("39001010238")
        );
        assert_eq!(validate_personal_code(Some("39001010239")), None);
    }

    #[test]
    fn personal_code_second_remainder_of_ten_means_zero() {
        assert_eq!(
            validate_personal_code(Some("39001010590")).as_deref(),
            Some("39001010590")
        );
        assert_eq!(validate_personal_code(Some("39001010591")), None);
    }

    #[test]
    fn personal_code_format_problems_are_none() {
        assert_eq!(validate_personal_code(None), None);
        assert_eq!(validate_personal_code(Some("")), None);
        assert_eq!(validate_personal_code(Some("79001010000")), None);
        assert_eq!(validate_personal_code(Some("09001010000")), None);
        assert_eq!(validate_personal_code(Some("3900101000")), None);
        assert_eq!(
            validate_personal_code(Some("390-0101-0000")).as_deref(),
            Some("39001010000")
        );
    }

    #[test]
    fn empty_code_list_is_an_error() {
        let err = validate_registry_codes_array(None, MAX_BULK_REGISTRY_CODES).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
        let err = validate_registry_codes_array(
            Some(CodeList::Many(Vec::new())),
            MAX_BULK_REGISTRY_CODES,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
        assert!(validate_registry_codes_array(Some("".into()), MAX_BULK_REGISTRY_CODES).is_err());
    }

    #[test]
    fn single_code_is_treated_as_list() {
        let codes = validate_registry_codes_array(Some("10060701".into()), 100).unwrap();
        assert_eq!(codes, ["10060701"]);
    }

    #[test]
    fn code_list_enforces_max_count() {
        let codes = vec!["10060701"; 3];
        let err = validate_registry_codes_array(Some(codes.into()), 2).unwrap_err();
        assert_eq!(err, ValidationError::TooManyRegistryCodes { max: 2, actual: 3 });
        assert!(err.to_string().contains("max 2"));
    }

    #[test]
    fn code_list_drops_blanks_and_propagates_errors() {
        let codes = validate_registry_codes_array(
            Some(vec!["10060701", "", "  ", "1234-5678"].into()),
            100,
        )
        .unwrap();
        assert_eq!(codes, ["10060701", "12345678"]);

        let err = validate_registry_codes_array(Some(vec!["10060701", "123"].into()), 100)
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRegistryCode { .. }));
    }
}
