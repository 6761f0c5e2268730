use once_cell::sync::Lazy;
use regex::Regex;

/// Validate an ISNI and return its sixteen characters with spaces removed.
/// Digit groups may be separated by spaces or hyphens; hyphens are kept.
pub fn validate_isni(input: &str) -> Option<String> {
    static ISNI_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?:(?:http|https)://isni\.org/isni/)?(\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{3}[0-9X])$",
        )
        .unwrap()
    });

    ISNI_RE
        .captures(input.trim())
        .map(|c| c.get(1).unwrap().as_str().replace(' ', ""))
}

/// Canonicalize an ISNI to its `https://isni.org/isni/` URL form.
pub fn normalize_isni(input: &str) -> Option<String> {
    validate_isni(input).map(|isni| format!("https://isni.org/isni/{isni}"))
}
