use once_cell::sync::Lazy;
use regex::Regex;

/// Validate a ROR ID and return its nine-character identifier.
///
/// A ROR ID is a base32 string of seven characters followed by a two-digit
/// checksum, optionally wrapped in a `ror.org` URL.
pub fn validate_ror(input: &str) -> Option<&str> {
    static ROR_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:(?:http|https)://ror\.org/)?([0-9a-z]{7}\d{2})$").unwrap());

    ROR_RE
        .captures(input.trim())
        .map(|c| c.get(1).unwrap().as_str())
}

/// Canonicalize a ROR ID to its `https://ror.org/` URL form.
pub fn normalize_ror(input: &str) -> Option<String> {
    validate_ror(input).map(|ror| format!("https://ror.org/{ror}"))
}
