use url::Url;

pub mod doi;
pub mod isni;
pub mod issn;
pub mod orcid;
pub mod ror;

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";

/// The identifier families a persistent identifier string can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Doi,
    Url,
    Issn,
}

/// Normalize a URL: strip the trailing slash, optionally upgrade `http` to
/// `https`, optionally lower-case. Non-string inputs are modeled as `None`
/// before this point; malformation here only means "not normalizable".
pub fn normalize_url(url: &str, secure: bool, lower: bool) -> Option<String> {
    let mut url = url.trim().trim_end_matches('/').to_string();
    if url.is_empty() {
        return None;
    }
    if secure && url.starts_with(HTTP_SCHEME) {
        url = url.replacen(HTTP_SCHEME, HTTPS_SCHEME, 1);
    }
    if lower {
        url = url.to_lowercase();
    }
    Some(url)
}

/// Normalize a persistent identifier: a DOI in any form becomes its
/// canonical `https://doi.org/` URL, anything else must be an HTTP(S) URL
/// with a host, upgraded to `https` and stripped of its trailing slash.
pub fn normalize_id(pid: &str) -> Option<String> {
    if let Some(doi) = doi::normalize_doi(pid) {
        return Some(doi);
    }

    let parsed = Url::parse(pid.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }
    normalize_url(pid, true, false)
}

/// Classify an identifier string as a DOI, a plain URL, or an ISSN.
pub fn validate_url(input: &str) -> Option<IdKind> {
    if doi::validate_doi(input).is_some() {
        return Some(IdKind::Doi);
    }
    if let Ok(parsed) = Url::parse(input)
        && matches!(parsed.scheme(), "http" | "https")
    {
        return Some(IdKind::Url);
    }
    let issn = input
        .strip_prefix("ISSN ")
        .or_else(|| input.strip_prefix("eISSN "))?;
    issn::normalize_issn(issn).map(|_| IdKind::Issn)
}

/// Expand a CURIE (`DOI:`, `ROR:`, `ISNI:`, `ORCID:`, `URL:`) into the
/// canonical URL of the named identifier scheme.
pub fn from_curie(id: &str) -> Option<String> {
    let (scheme, rest) = id.split_once(':')?;
    match scheme {
        "DOI" => Some(doi::doi_as_url(rest)),
        "ROR" => Some(format!("https://ror.org/{rest}")),
        "ISNI" => Some(format!("https://isni.org/isni/{rest}")),
        "ORCID" => orcid::normalize_orcid(rest),
        "URL" => normalize_url(rest, false, false),
        _ => None,
    }
}
