use anyhow::{Context, bail};
use tracing::debug;

use crate::fetch;
use crate::identifier::{doi, normalize_id, normalize_url};
use crate::reader::{self, json_feed};
use crate::record::NormalizedRecord;
use crate::sniffer::{self, Format};

/// Caller knobs for building a record: a format override plus field
/// overrides applied shallowly after the reader runs (override wins over the
/// computed value).
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    pub via: Option<Format>,
    pub doi: Option<String>,
    pub url: Option<String>,
    /// File extension hint for raw-string inputs (`.bib`, `.ris`).
    pub ext: Option<String>,
    /// Filename hint for raw-string inputs (`CITATION.cff`).
    pub filename: Option<String>,
}

/// Build a normalized record from an identifier or a raw document string.
///
/// Identifiers are sniffed (or taken from the `via` override) and fetched;
/// raw strings are sniffed and parsed in place. An undeterminable or
/// unsupported format is a contract error; a document that cannot be
/// retrieved comes back as a `NotFound` record.
pub fn build(input: &str, options: &MetadataOptions) -> anyhow::Result<NormalizedRecord> {
    let mut record = match normalize_id(input) {
        Some(pid) => build_from_id(&pid, options)?,
        None => build_from_string(input, options)?,
    };

    // Caller overrides win over whatever the reader computed.
    if let Some(doi) = options.doi.as_deref()
        && let Some(id) = doi::normalize_doi(doi)
    {
        record.id = id;
    }
    if let Some(url) = options.url.as_deref()
        && let Some(url) = normalize_url(url, true, false)
    {
        record.url = Some(url);
    }
    Ok(record)
}

fn build_from_id(pid: &str, options: &MetadataOptions) -> anyhow::Result<NormalizedRecord> {
    let format = options
        .via
        .unwrap_or_else(|| sniffer::find_from_format_by_id(pid));
    debug!(pid, %format, "reading identifier");
    match format {
        Format::JsonFeedItem => {
            let url = json_feed_api_url(pid);
            let Some(document) = fetch::get_json(&url) else {
                return Ok(NormalizedRecord::not_found());
            };
            let item: json_feed::JsonFeedItem =
                serde_json::from_value(document).context("malformed JSON Feed item")?;
            Ok(json_feed::read_item(item))
        }
        other => bail!("cannot fetch documents for format {other}"),
    }
}

fn build_from_string(string: &str, options: &MetadataOptions) -> anyhow::Result<NormalizedRecord> {
    let format = options.via.or_else(|| {
        sniffer::find_from_format(
            None,
            Some(string),
            options.ext.as_deref(),
            options.filename.as_deref(),
        )
    });
    let Some(format) = format else {
        bail!("could not determine the input format");
    };
    debug!(%format, "reading document string");
    reader::read_string(format, string)
}

/// The JSON Feed item endpoint for a pid: rogue-scholar API URLs pass
/// through, DOI URLs address the post by DOI.
fn json_feed_api_url(pid: &str) -> String {
    if pid.starts_with("https://api.rogue-scholar.org/posts/") {
        return pid.to_string();
    }
    let post = doi::doi_from_url(pid).unwrap_or_else(|| pid.to_string());
    format!("https://api.rogue-scholar.org/posts/{post}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributor::Contributor;
    use crate::record::{State, WorkType};

    #[test]
    fn raw_csl_string_is_sniffed_and_read() {
        let string = r#"{"DOI": "10.5438/4K3M-NYVG", "issued": {"date-parts": [[2016, 12, 20]]}}"#;
        let record = build(string, &MetadataOptions::default()).unwrap();
        assert_eq!(record.id, "https://doi.org/10.5438/4k3m-nyvg");
        assert_eq!(record.date.published.as_deref(), Some("2016-12-20"));
    }

    #[test]
    fn via_override_beats_sniffing() {
        // Sniffed alone this would be Csl; the override forces Schema.org.
        let string = r#"{"@id": "https://doi.org/10.5438/4k3m-nyvg", "@type": "Dataset", "issued": {"date-parts": [[2016]]}}"#;
        let record = build(
            string,
            &MetadataOptions {
                via: Some(Format::SchemaOrg),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(record.work_type, WorkType::Dataset);
    }

    #[test]
    fn doi_override_replaces_computed_id() {
        let string = r#"{"@context": "http://schema.org", "@id": "https://example.com/post"}"#;
        let record = build(
            string,
            &MetadataOptions {
                doi: Some("10.59350/hke8v-d1e66".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(record.id, "https://doi.org/10.59350/hke8v-d1e66");
    }

    #[test]
    fn url_override_replaces_computed_url() {
        let string = r#"{"@context": "http://schema.org", "@id": "https://doi.org/10.5438/4k3m-nyvg", "url": "https://old.example.com/post"}"#;
        let record = build(
            string,
            &MetadataOptions {
                url: Some("http://new.example.com/post/".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(record.url.as_deref(), Some("https://new.example.com/post"));
        // The computed id is untouched.
        assert_eq!(record.id, "https://doi.org/10.5438/4k3m-nyvg");
    }

    #[test]
    fn undetermined_format_is_an_error() {
        assert!(build("just some prose", &MetadataOptions::default()).is_err());
    }

    #[test]
    fn unsupported_sniffed_format_is_an_error() {
        let err = build("TY  - JOUR\nER  -", &MetadataOptions::default()).unwrap_err();
        assert!(err.to_string().contains("ris"));
    }

    #[test]
    fn commonmeta_document_round_trips() {
        let record = NormalizedRecord {
            id: "https://doi.org/10.59350/hke8v-d1e66".to_string(),
            work_type: WorkType::Article,
            state: State::Findable,
            schema_version: Some("https://commonmeta.org/commonmeta_v0.12".to_string()),
            contributors: vec![Contributor::unavailable()],
            ..NormalizedRecord::not_found()
        };
        let string = serde_json::to_string(&record).unwrap();
        let reread = build(&string, &MetadataOptions::default()).unwrap();
        assert_eq!(reread, record);
    }

    #[test]
    fn json_feed_api_url_variants() {
        assert_eq!(
            json_feed_api_url("https://api.rogue-scholar.org/posts/10.59350/hke8v-d1e66"),
            "https://api.rogue-scholar.org/posts/10.59350/hke8v-d1e66"
        );
        assert_eq!(
            json_feed_api_url("https://doi.org/10.59350/hke8v-d1e66"),
            "https://api.rogue-scholar.org/posts/10.59350/hke8v-d1e66"
        );
    }
}
