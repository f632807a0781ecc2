/// Longest company name kept after sanitizing.
pub const MAX_COMPANY_NAME_CHARS: usize = 255;

/// Longest person name kept after sanitizing.
pub const MAX_PERSON_NAME_CHARS: usize = 100;

const COMPANY_NAME_STRIPPED: &[char] = &[
    '<', '>', '"', '\'', ';', '&', '|', '`', '$', '(', ')', '{', '}', '[', ']', '\\',
];

fn keep_chars(value: &str, max_chars: usize, keep: impl Fn(char) -> bool) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let kept = value
        .chars()
        .filter(|ch| keep(*ch))
        .take(max_chars)
        .collect::<String>();
    let kept = kept.trim();
    (!kept.is_empty()).then(|| kept.to_owned())
}

/// Soft: removes shell/markup metacharacters and caps the length at 255
/// characters. Blank input, or input made only of stripped characters, is
/// `None`.
///
/// Applying it twice gives the same result as applying it once.
pub fn validate_company_name(name: Option<&str>) -> Option<String> {
    keep_chars(name?, MAX_COMPANY_NAME_CHARS, |ch| {
        !COMPANY_NAME_STRIPPED.contains(&ch)
    })
}

/// Soft: keeps letters (any script), whitespace, `-` and `'`, capped at 100
/// characters.
pub fn validate_person_name(name: Option<&str>) -> Option<String> {
    keep_chars(name?, MAX_PERSON_NAME_CHARS, |ch| {
        ch.is_alphabetic() || ch.is_whitespace() || ch == '-' || ch == '\''
    })
}

/// Scrubs free text that ends up inside an XML body.
///
/// Angle brackets and quotes are dropped, `&` becomes `&amp;`, and the result
/// is trimmed. Absent input is the empty string.
pub fn sanitize_xml_input(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    value
        .chars()
        .filter(|ch| !matches!(ch, '<' | '>' | '"' | '\''))
        .collect::<String>()
        .replace('&', "&amp;")
        .trim()
        .to_owned()
}
