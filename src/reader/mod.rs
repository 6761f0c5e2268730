use anyhow::bail;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::NormalizedRecord;
use crate::sniffer::Format;

pub mod crossref_xml;
pub mod csl;
pub mod json_feed;
pub mod schema_org;

/// Parse a raw document string with the reader for the given format.
///
/// Formats without a bundled reader (RIS, BibTeX, CFF, ...) are a contract
/// error here, not a data error: the sniffer may name them, but parsing them
/// belongs to external collaborators.
pub fn read_string(format: Format, string: &str) -> anyhow::Result<NormalizedRecord> {
    match format {
        Format::Commonmeta => Ok(serde_json::from_str(string)?),
        Format::JsonFeedItem => json_feed::read(string),
        Format::Csl => csl::read(string),
        Format::SchemaOrg => schema_org::read(string),
        Format::CrossrefXml => crossref_xml::read(string),
        other => bail!("no reader available for format {other}"),
    }
}

/// Strip markup tags and collapse whitespace. Deliberately not a full HTML
/// parse; titles and abstracts only ever carry inline markup.
pub(crate) fn sanitize(text: &str) -> String {
    static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    let stripped = TAG_RE.replace_all(text, "");
    WS_RE.replace_all(stripped.trim(), " ").into_owned()
}

/// Turn a camelCase or snake_case tag into a human-readable phrase:
/// `computerAndInformationSciences` becomes `Computer and information
/// sciences`.
pub(crate) fn human_case(tag: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for chunk in tag.split(['_', '-', ' ']) {
        let mut current = String::new();
        for c in chunk.chars() {
            if c.is_uppercase() && !current.is_empty() {
                words.push(current.to_lowercase());
                current = String::new();
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current.to_lowercase());
        }
    }
    let mut phrase = words.join(" ");
    if let Some(first) = phrase.get(0..1) {
        let upper = first.to_uppercase();
        phrase.replace_range(0..1, &upper);
    }
    phrase
}
