use once_cell::sync::Lazy;
use regex::Regex;

/// Validate an ORCID iD and return its four hyphen-joined digit groups.
///
/// Accepts bare iDs (`0000-0003-1419-2405`), space-separated groups, and
/// `orcid.org` URLs including the www and sandbox hosts.
pub fn validate_orcid(input: &str) -> Option<String> {
    static ORCID_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?:(?:http|https)://(?:(?:www|sandbox)\.)?orcid\.org/)?(\d{4}[ -]\d{4}[ -]\d{4}[ -]\d{3}[0-9X])$",
        )
        .unwrap()
    });

    ORCID_RE
        .captures(input.trim())
        .map(|c| c.get(1).unwrap().as_str().replace(' ', "-"))
}

/// Canonicalize an ORCID iD to its `https://orcid.org/` URL form.
pub fn normalize_orcid(input: &str) -> Option<String> {
    validate_orcid(input).map(|orcid| format!("https://orcid.org/{orcid}"))
}
