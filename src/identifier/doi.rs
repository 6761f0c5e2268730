use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Validate a DOI in any of its common textual forms and return the bare
/// `prefix/suffix` pair.
///
/// Accepts bare DOIs, `doi:` prefixes, and resolver URLs (`doi.org`,
/// `dx.doi.org`, and the DataCite handle staging/test hosts).
pub fn validate_doi(input: &str) -> Option<&str> {
    let mut s = input.trim();

    if let Some(rest) = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
    {
        let rest = rest.strip_prefix("dx.").unwrap_or(rest);
        s = rest
            .strip_prefix("doi.org/")
            .or_else(|| rest.strip_prefix("handle.stage.datacite.org/"))
            .or_else(|| rest.strip_prefix("handle.test.datacite.org/"))?;
    }

    if let Some(rest) = s.strip_prefix("doi:").or_else(|| s.strip_prefix("DOI:")) {
        s = rest.trim_start();
    }

    static DOI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(10\.\d{4,9}/[^\p{C}\s]+)$").unwrap());

    DOI_RE.captures(s).map(|c| c.get(1).unwrap().as_str())
}

/// Extract the registrant prefix (`10.NNNN`) from a DOI in any textual form.
pub fn validate_prefix(input: &str) -> Option<&str> {
    static PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(10\.\d{4,9})").unwrap());
    PREFIX_RE
        .captures(input.trim())
        .map(|c| c.get(1).unwrap().as_str())
}

/// Canonicalize a DOI to its lower-cased `https://doi.org/` URL form.
/// Returns `None` when the input is not a recognizable DOI.
pub fn normalize_doi(input: &str) -> Option<String> {
    validate_doi(input).map(doi_as_url)
}

/// Express a bare DOI as a resolver URL, percent-encoding the suffix.
pub fn doi_as_url(doi: &str) -> String {
    let encoded = utf8_percent_encode(&doi.to_lowercase(), PATH_SEGMENT_ENCODE_SET).to_string();
    format!("https://doi.org/{encoded}")
}

/// Recover the bare, lower-cased DOI from a resolver URL or bare DOI string.
pub fn doi_from_url(url: &str) -> Option<String> {
    validate_doi(url).map(|doi| doi.to_lowercase())
}
