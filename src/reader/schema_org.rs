use serde::Deserialize;
use serde_json::Value;

use crate::contributor::{self, SchemaOrgAuthor, map_contributors};
use crate::date::strip_milliseconds;
use crate::identifier::{doi::normalize_doi, normalize_url};
use crate::license::{self, License};
use crate::reader::sanitize;
use crate::record::{
    Container, Description, NormalizedRecord, Publisher, RecordDate, State, Subject, Title,
    WorkType,
};

/// A Schema.org JSON-LD document, as embedded in web pages or served from
/// JSON-LD endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaOrgDocument {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    #[serde(rename = "@type")]
    pub doc_type: Option<String>,
    pub identifier: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
    pub headline: Option<String>,
    #[serde(default)]
    pub author: OneOrMany<SchemaOrgAuthor>,
    #[serde(default)]
    pub creator: OneOrMany<SchemaOrgAuthor>,
    pub description: Option<String>,
    #[serde(rename = "datePublished")]
    pub date_published: Option<String>,
    #[serde(rename = "dateModified")]
    pub date_modified: Option<String>,
    pub license: Option<String>,
    pub publisher: Option<SchemaOrgPublisher>,
    #[serde(rename = "inLanguage")]
    pub in_language: Option<String>,
    #[serde(default)]
    pub keywords: Keywords,
    #[serde(rename = "isPartOf")]
    pub is_part_of: Option<SchemaOrgContainer>,
    pub periodical: Option<SchemaOrgContainer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaOrgPublisher {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaOrgContainer {
    #[serde(rename = "@type")]
    pub container_type: Option<String>,
    pub name: Option<String>,
    pub issn: Option<String>,
}

/// Schema.org freely serializes single values and lists interchangeably.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Keywords arrive either as a comma-separated string or as a list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    #[default]
    Missing,
    Joined(String),
    List(Vec<String>),
}

impl Keywords {
    fn into_subjects(self) -> Vec<Subject> {
        let items = match self {
            Keywords::Missing => Vec::new(),
            Keywords::Joined(s) => s.split(',').map(str::to_string).collect(),
            Keywords::List(items) => items,
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|subject| Subject { subject })
            .collect()
    }
}

fn work_type(schema_type: Option<&str>) -> WorkType {
    match schema_type {
        Some("Article") | Some("BlogPosting") | Some("NewsArticle") => WorkType::Article,
        Some("ScholarlyArticle") => WorkType::JournalArticle,
        Some("Book") => WorkType::Book,
        Some("Chapter") => WorkType::BookChapter,
        Some("Dataset") => WorkType::Dataset,
        Some("Thesis") => WorkType::Dissertation,
        Some("Report") => WorkType::Report,
        Some("SoftwareSourceCode") | Some("SoftwareApplication") => WorkType::Software,
        Some("WebPage") | Some("WebSite") => WorkType::WebPage,
        Some(_) => WorkType::Document,
        None => WorkType::Other,
    }
}

fn normalized_date(text: &str) -> String {
    strip_milliseconds(text)
}

/// Read a Schema.org JSON-LD document into a normalized record.
pub fn read(string: &str) -> anyhow::Result<NormalizedRecord> {
    let value: Value = serde_json::from_str(string)?;
    let doc: SchemaOrgDocument = serde_json::from_value(unwrap_graph(value))?;
    Ok(read_document(doc))
}

pub fn read_document(doc: SchemaOrgDocument) -> NormalizedRecord {
    let url = doc.url.as_deref().and_then(|u| normalize_url(u, true, false));
    let id = doc
        .id
        .as_deref()
        .or(doc.identifier.as_deref())
        .and_then(|candidate| normalize_doi(candidate).or_else(|| normalize_url(candidate, true, false)))
        .or_else(|| url.clone());
    let Some(id) = id else {
        return NormalizedRecord::not_found();
    };

    let authors = doc.author.into_vec();
    let authors = if authors.is_empty() {
        doc.creator.into_vec()
    } else {
        authors
    };

    let container = doc.is_part_of.or(doc.periodical).map(|c| Container {
        container_type: c.container_type.or_else(|| Some("Periodical".to_string())),
        title: c.name,
        identifier: c.issn.clone(),
        identifier_type: c.issn.map(|_| "ISSN".to_string()),
    });

    NormalizedRecord {
        id,
        work_type: work_type(doc.doc_type.as_deref()),
        url,
        contributors: map_contributors(contributor::from_schema_org(&authors)),
        titles: doc
            .headline
            .or(doc.name)
            .as_deref()
            .map(sanitize)
            .filter(|t| !t.is_empty())
            .map(|title| Title {
                title,
                title_type: None,
            })
            .into_iter()
            .collect(),
        publisher: doc
            .publisher
            .and_then(|p| p.name)
            .map(|name| Publisher { name }),
        date: RecordDate {
            published: doc.date_published.as_deref().map(normalized_date),
            updated: doc.date_modified.as_deref().map(normalized_date),
            ..Default::default()
        },
        license: doc.license.map(|url| {
            license::resolve(License {
                id: None,
                url: Some(url),
            })
        }),
        descriptions: doc
            .description
            .as_deref()
            .map(sanitize)
            .filter(|d| !d.is_empty())
            .map(|description| Description {
                description,
                description_type: Some("Abstract".to_string()),
            })
            .into_iter()
            .collect(),
        subjects: doc.keywords.into_subjects(),
        language: doc.in_language,
        alternate_identifiers: Vec::new(),
        related_identifiers: Vec::new(),
        references: Vec::new(),
        funding_references: Vec::new(),
        container,
        state: State::Findable,
        schema_version: None,
    }
}

/// Schema.org pages sometimes wrap the document in an array or a `@graph`
/// list; pick the first node.
fn unwrap_graph(value: Value) -> Value {
    match value {
        Value::Array(mut nodes) if !nodes.is_empty() => nodes.remove(0),
        Value::Object(mut obj) => match obj.remove("@graph") {
            Some(Value::Array(mut nodes)) if !nodes.is_empty() => nodes.remove(0),
            _ => Value::Object(obj),
        },
        other => other,
    }
}
