use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::fetch;
use crate::identifier::doi::validate_doi;

/// The source formats a reader exists for (or a registration agency can
/// report).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Bibtex,
    Cff,
    Codemeta,
    Commonmeta,
    Crossref,
    CrossrefXml,
    Csl,
    Datacite,
    DataciteXml,
    InvenioRdm,
    JsonFeedItem,
    Kbase,
    Ris,
    SchemaOrg,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Bibtex => "bibtex",
            Format::Cff => "cff",
            Format::Codemeta => "codemeta",
            Format::Commonmeta => "commonmeta",
            Format::Crossref => "crossref",
            Format::CrossrefXml => "crossref_xml",
            Format::Csl => "csl",
            Format::Datacite => "datacite",
            Format::DataciteXml => "datacite_xml",
            Format::InvenioRdm => "inveniordm",
            Format::JsonFeedItem => "json_feed_item",
            Format::Kbase => "kbase",
            Format::Ris => "ris",
            Format::SchemaOrg => "schema_org",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bibtex" => Ok(Format::Bibtex),
            "cff" => Ok(Format::Cff),
            "codemeta" => Ok(Format::Codemeta),
            "commonmeta" => Ok(Format::Commonmeta),
            "crossref" => Ok(Format::Crossref),
            "crossref_xml" => Ok(Format::CrossrefXml),
            "csl" => Ok(Format::Csl),
            "datacite" => Ok(Format::Datacite),
            "datacite_xml" => Ok(Format::DataciteXml),
            "inveniordm" => Ok(Format::InvenioRdm),
            "json_feed_item" => Ok(Format::JsonFeedItem),
            "kbase" => Ok(Format::Kbase),
            "ris" => Ok(Format::Ris),
            "schema_org" => Ok(Format::SchemaOrg),
            _ => Err(()),
        }
    }
}

/// Find the reader for an input, trying the identifier, the string plus file
/// extension, the bare string, and the bare filename, in that order. With
/// nothing to go on the default is `datacite`.
pub fn find_from_format(
    pid: Option<&str>,
    string: Option<&str>,
    ext: Option<&str>,
    filename: Option<&str>,
) -> Option<Format> {
    if let Some(pid) = pid {
        return Some(find_from_format_by_id(pid));
    }
    if let (Some(_), Some(ext)) = (string, ext) {
        return find_from_format_by_ext(ext);
    }
    if let Some(string) = string {
        return find_from_format_by_string(string);
    }
    if let Some(filename) = filename {
        return find_from_format_by_filename(filename);
    }
    Some(Format::Datacite)
}

/// Identifier branch: a resolvable DOI defers to the registration agency;
/// otherwise a fixed list of URL-shape patterns applies, with `schema_org`
/// as the terminal guess.
pub fn find_from_format_by_id(pid: &str) -> Format {
    if let Some(doi) = validate_doi(pid)
        && let Some(agency) = fetch::doi_registration_agency(doi)
        && let Ok(format) = Format::from_str(&agency.to_lowercase())
    {
        debug!(doi, agency, "format from registration agency");
        return format;
    }

    static URL_PATTERNS: Lazy<Vec<(Regex, Format)>> = Lazy::new(|| {
        // Ordering is precedence: the specific GitHub files must come
        // before the bare-repository rule.
        [
            (r"^(http|https)://github\.com/(.+)/CITATION\.cff$", Format::Cff),
            (
                r"^(http|https)://github\.com/(.+)/codemeta\.json$",
                Format::Codemeta,
            ),
            (r"^(http|https)://github\.com/(.+)$", Format::Cff),
            (
                r"^https://api\.rogue-scholar\.org/posts/(.+)$",
                Format::JsonFeedItem,
            ),
            (
                r"^https://zenodo\.org/api/records/(.+)$",
                Format::InvenioRdm,
            ),
        ]
        .into_iter()
        .map(|(pattern, format)| (Regex::new(pattern).unwrap(), format))
        .collect()
    });

    URL_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(pid))
        .map(|(_, format)| *format)
        .unwrap_or(Format::SchemaOrg)
}

/// File-extension branch: only `.bib` and `.ris` are recognizable.
pub fn find_from_format_by_ext(ext: &str) -> Option<Format> {
    match ext {
        ".bib" => Some(Format::Bibtex),
        ".ris" => Some(Format::Ris),
        _ => None,
    }
}

type JsonProbe = fn(&Value) -> bool;

/// Content-shape markers probed against parsed JSON, in precedence order.
static JSON_PROBES: &[(JsonProbe, Format)] = &[
    (
        |data| {
            data["schema_version"]
                .as_str()
                .is_some_and(|v| v.starts_with("https://commonmeta.org"))
        },
        Format::Commonmeta,
    ),
    (
        |data| data["@context"].as_str() == Some("http://schema.org"),
        Format::SchemaOrg,
    ),
    (
        |data| {
            data["@context"].as_str()
                == Some("https://raw.githubusercontent.com/codemeta/codemeta/master/codemeta.jsonld")
        },
        Format::Codemeta,
    ),
    (
        |data| data["blog"]["version"].as_str() == Some("https://jsonfeed.org/version/1.1"),
        Format::JsonFeedItem,
    ),
    (
        |data| {
            data["schemaVersion"]
                .as_str()
                .is_some_and(|v| v.starts_with("http://datacite.org/schema/kernel"))
        },
        Format::Datacite,
    ),
    (
        |data| data["source"].as_str() == Some("Crossref"),
        Format::Crossref,
    ),
    (
        |data| !data["issued"]["date-parts"].is_null(),
        Format::Csl,
    ),
    (
        |data| !data["conceptdoi"].is_null(),
        Format::InvenioRdm,
    ),
    (
        |data| !data["credit_metadata"].is_null(),
        Format::Kbase,
    ),
];

/// BibTeX entry types recognized behind a leading `@`.
const BIBTEX_ENTRY_TYPES: &[&str] = &[
    "article",
    "book",
    "booklet",
    "conference",
    "inbook",
    "incollection",
    "inproceedings",
    "manual",
    "mastersthesis",
    "misc",
    "phdthesis",
    "proceedings",
    "techreport",
    "unpublished",
];

/// Content branch: JSON markers, then XML elements, then the YAML
/// `cff-version` key, then literal RIS/BibTeX prefixes. Exhausting every
/// probe yields `None` ("format undetermined"), never an error.
pub fn find_from_format_by_string(string: &str) -> Option<Format> {
    if let Ok(data) = serde_json::from_str::<Value>(string)
        && let Some(format) = JSON_PROBES
            .iter()
            .find(|(probe, _)| probe(&data))
            .map(|(_, format)| *format)
    {
        return Some(format);
    }

    if let Some(format) = sniff_xml(string) {
        return Some(format);
    }

    // YAML is a superset of JSON, so a JSON document with a `cff-version`
    // key lands here too.
    if let Ok(data) = serde_yaml::from_str::<serde_yaml::Value>(string)
        && data.get("cff-version").is_some()
    {
        return Some(Format::Cff);
    }

    if string.starts_with("TY  - ") {
        return Some(Format::Ris);
    }
    if let Some(rest) = string.strip_prefix('@')
        && BIBTEX_ENTRY_TYPES
            .iter()
            .any(|entry_type| rest.starts_with(entry_type))
    {
        return Some(Format::Bibtex);
    }

    debug!("no format marker matched");
    None
}

/// Scan XML elements for the Crossref `doi_record` or DataCite `resource`
/// envelope.
fn sniff_xml(string: &str) -> Option<Format> {
    let mut reader = Reader::from_str(string);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"doi_record" {
                    return Some(Format::CrossrefXml);
                }
                if name.as_ref() == b"resource" {
                    return Some(Format::DataciteXml);
                }
            }
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
    }
}

/// Filename branch: only the conventional `CITATION.cff` name is
/// recognizable.
pub fn find_from_format_by_filename(filename: &str) -> Option<Format> {
    if filename == "CITATION.cff" {
        Some(Format::Cff)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commonmeta_schema_version_marker() {
        let string = r#"{"schema_version": "https://commonmeta.org/commonmeta_v0.12"}"#;
        assert_eq!(
            find_from_format_by_string(string),
            Some(Format::Commonmeta)
        );
    }

    #[test]
    fn schema_org_context_marker() {
        let string = r#"{"@context": "http://schema.org", "@type": "BlogPosting"}"#;
        assert_eq!(find_from_format_by_string(string), Some(Format::SchemaOrg));
    }

    #[test]
    fn codemeta_context_marker() {
        let string = r#"{"@context": "https://raw.githubusercontent.com/codemeta/codemeta/master/codemeta.jsonld"}"#;
        assert_eq!(find_from_format_by_string(string), Some(Format::Codemeta));
    }

    #[test]
    fn json_feed_blog_version_marker() {
        let string = r#"{"blog": {"version": "https://jsonfeed.org/version/1.1"}}"#;
        assert_eq!(
            find_from_format_by_string(string),
            Some(Format::JsonFeedItem)
        );
    }

    #[test]
    fn datacite_schema_version_marker() {
        let string = r#"{"schemaVersion": "http://datacite.org/schema/kernel-4"}"#;
        assert_eq!(find_from_format_by_string(string), Some(Format::Datacite));
    }

    #[test]
    fn crossref_source_marker() {
        let string = r#"{"source": "Crossref", "DOI": "10.1101/097196"}"#;
        assert_eq!(find_from_format_by_string(string), Some(Format::Crossref));
    }

    #[test]
    fn csl_issued_date_parts_marker() {
        let string = r#"{"issued": {"date-parts": [[2023, 6, 9]]}}"#;
        assert_eq!(find_from_format_by_string(string), Some(Format::Csl));
    }

    #[test]
    fn inveniordm_and_kbase_markers() {
        assert_eq!(
            find_from_format_by_string(r#"{"conceptdoi": "10.5281/zenodo.30799"}"#),
            Some(Format::InvenioRdm)
        );
        assert_eq!(
            find_from_format_by_string(r#"{"credit_metadata": {}}"#),
            Some(Format::Kbase)
        );
    }

    #[test]
    fn xml_envelopes() {
        assert_eq!(
            find_from_format_by_string(r#"<doi_records><doi_record owner="10.1101"/></doi_records>"#),
            Some(Format::CrossrefXml)
        );
        assert_eq!(
            find_from_format_by_string(
                r#"<resource xmlns="http://datacite.org/schema/kernel-4"></resource>"#
            ),
            Some(Format::DataciteXml)
        );
    }

    #[test]
    fn cff_version_as_yaml_and_as_json() {
        assert_eq!(
            find_from_format_by_string("cff-version: 1.2.0\ntitle: My software\n"),
            Some(Format::Cff)
        );
        assert_eq!(
            find_from_format_by_string(r#"{"cff-version": "1.2.0"}"#),
            Some(Format::Cff)
        );
    }

    #[test]
    fn ris_and_bibtex_prefixes() {
        assert_eq!(
            find_from_format_by_string("TY  - JOUR\nTI  - Title\nER  -"),
            Some(Format::Ris)
        );
        assert_eq!(
            find_from_format_by_string("@article{fenner2016, title={A}}"),
            Some(Format::Bibtex)
        );
        assert_eq!(find_from_format_by_string("@unknown{x}"), None);
    }

    #[test]
    fn undetermined_content_is_none() {
        assert_eq!(find_from_format_by_string("just some prose"), None);
        assert_eq!(find_from_format_by_string(r#"{"title": "plain json"}"#), None);
    }

    #[test]
    fn id_url_patterns_in_precedence_order() {
        assert_eq!(
            find_from_format_by_id("https://github.com/citation-file-format/ruby-cff/CITATION.cff"),
            Format::Cff
        );
        assert_eq!(
            find_from_format_by_id("https://github.com/datacite/metadata-reports/codemeta.json"),
            Format::Codemeta
        );
        assert_eq!(
            find_from_format_by_id("https://github.com/datacite/metadata-reports"),
            Format::Cff
        );
        assert_eq!(
            find_from_format_by_id(
                "https://api.rogue-scholar.org/posts/4e4bf150-751f-4245-b4ca-fe69e3c3bb24"
            ),
            Format::JsonFeedItem
        );
        assert_eq!(
            find_from_format_by_id("https://zenodo.org/api/records/5244404"),
            Format::InvenioRdm
        );
        assert_eq!(
            find_from_format_by_id("https://blog.example.org/some-post"),
            Format::SchemaOrg
        );
    }

    #[test]
    fn ext_branch() {
        assert_eq!(find_from_format_by_ext(".bib"), Some(Format::Bibtex));
        assert_eq!(find_from_format_by_ext(".ris"), Some(Format::Ris));
        assert_eq!(find_from_format_by_ext(".txt"), None);
    }

    #[test]
    fn filename_branch() {
        assert_eq!(
            find_from_format_by_filename("CITATION.cff"),
            Some(Format::Cff)
        );
        assert_eq!(find_from_format_by_filename("citation.cff"), None);
    }

    #[test]
    fn nothing_given_defaults_to_datacite() {
        assert_eq!(
            find_from_format(None, None, None, None),
            Some(Format::Datacite)
        );
    }

    #[test]
    fn ext_takes_precedence_over_string_probe() {
        let ris = "TY  - JOUR\nER  -";
        assert_eq!(
            find_from_format(None, Some(ris), Some(".bib"), None),
            Some(Format::Bibtex)
        );
        assert_eq!(
            find_from_format(None, Some(ris), Some(".xyz"), None),
            None
        );
    }

    #[test]
    fn format_round_trips_through_str() {
        for format in [
            Format::Bibtex,
            Format::Cff,
            Format::Codemeta,
            Format::Commonmeta,
            Format::Crossref,
            Format::CrossrefXml,
            Format::Csl,
            Format::Datacite,
            Format::DataciteXml,
            Format::InvenioRdm,
            Format::JsonFeedItem,
            Format::Kbase,
            Format::Ris,
            Format::SchemaOrg,
        ] {
            assert_eq!(format.as_str().parse::<Format>(), Ok(format));
        }
    }
}
