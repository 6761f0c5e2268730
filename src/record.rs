use serde::{Deserialize, Serialize};

use crate::contributor::Contributor;
use crate::license::License;
use crate::relation::{FundingReference, Reference, RelatedIdentifier};

/// The work types a normalized record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    Article,
    Book,
    BookChapter,
    Dataset,
    Dissertation,
    Document,
    JournalArticle,
    Other,
    Report,
    Software,
    WebPage,
}

/// Whether a record could be populated from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum State {
    #[default]
    Findable,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub title: String,
    #[serde(rename = "titleType", skip_serializing_if = "Option::is_none")]
    pub title_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub description: String,
    #[serde(rename = "descriptionType", skip_serializing_if = "Option::is_none")]
    pub description_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateIdentifier {
    pub alternate_identifier: String,
    pub alternate_identifier_type: String,
}

/// The venue a work appeared in (journal, blog, repository).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Container {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(rename = "identifierType", skip_serializing_if = "Option::is_none")]
    pub identifier_type: Option<String>,
}

impl Container {
    pub fn is_empty(&self) -> bool {
        self.container_type.is_none()
            && self.title.is_none()
            && self.identifier.is_none()
            && self.identifier_type.is_none()
    }
}

/// Date roles a record can carry, each an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecordDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
}

/// The canonical normalized representation of one scholarly work.
///
/// Built once per input document by a reader; immutable afterwards except
/// for the explicit caller-override merge in the facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Canonical DOI URL or canonical HTTPS URL.
    pub id: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Never empty; sources without identifiable contributors get the
    /// single `":(unav)"` organization.
    pub contributors: Vec<Contributor>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub titles: Vec<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub date: RecordDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub descriptions: Vec<Description>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subjects: Vec<Subject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alternate_identifiers: Vec<AlternateIdentifier>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related_identifiers: Vec<RelatedIdentifier>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub references: Vec<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub funding_references: Vec<FundingReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    pub state: State,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
}

impl NormalizedRecord {
    /// A placeholder record for inputs that could not be retrieved or
    /// parsed; `state` carries the failure, never an exception.
    pub fn not_found() -> Self {
        NormalizedRecord {
            id: String::new(),
            work_type: WorkType::Other,
            url: None,
            contributors: vec![Contributor::unavailable()],
            titles: Vec::new(),
            publisher: None,
            date: RecordDate::default(),
            license: None,
            descriptions: Vec::new(),
            subjects: Vec::new(),
            language: None,
            alternate_identifiers: Vec::new(),
            related_identifiers: Vec::new(),
            references: Vec::new(),
            funding_references: Vec::new(),
            container: None,
            state: State::NotFound,
            schema_version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let mut record = NormalizedRecord::not_found();
        record.id = "https://doi.org/10.59350/hke8v-d1e66".to_string();
        record.work_type = WorkType::Article;
        record.state = State::Findable;
        record.schema_version = Some("https://commonmeta.org/commonmeta_v0.12".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Article");
        assert_eq!(json["state"], "findable");
        assert_eq!(
            json["schema_version"],
            "https://commonmeta.org/commonmeta_v0.12"
        );
        assert_eq!(json["contributors"][0]["name"], ":(unav)");
        assert_eq!(json["contributors"][0]["type"], "Organization");
    }

    #[test]
    fn not_found_record_keeps_sentinel_contributor() {
        let record = NormalizedRecord::not_found();
        assert_eq!(record.state, State::NotFound);
        assert_eq!(record.contributors.len(), 1);
    }
}
