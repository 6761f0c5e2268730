use serde::Deserialize;

use crate::contributor::{self, CslName, map_contributors};
use crate::date::from_date_parts;
use crate::identifier::{doi::normalize_doi, normalize_url};
use crate::reader::sanitize;
use crate::record::{
    Container, Description, NormalizedRecord, Publisher, RecordDate, State, Subject, Title,
    WorkType,
};

/// A CSL-JSON item ("citeproc JSON").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CslItem {
    pub id: Option<String>,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    #[serde(rename = "URL")]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub author: Vec<CslName>,
    pub issued: Option<CslDate>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(rename = "container-title")]
    pub container_title: Option<String>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CslDate {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<i32>>,
}

fn work_type(csl_type: Option<&str>) -> WorkType {
    match csl_type {
        Some("article-journal") => WorkType::JournalArticle,
        Some("post-weblog") | Some("article") => WorkType::Article,
        Some("book") => WorkType::Book,
        Some("chapter") => WorkType::BookChapter,
        Some("dataset") => WorkType::Dataset,
        Some("thesis") => WorkType::Dissertation,
        Some("report") => WorkType::Report,
        Some("software") => WorkType::Software,
        Some("webpage") => WorkType::WebPage,
        Some(_) => WorkType::Document,
        None => WorkType::Other,
    }
}

/// Read a CSL-JSON document into a normalized record.
pub fn read(string: &str) -> anyhow::Result<NormalizedRecord> {
    let item: CslItem = serde_json::from_str(string)?;
    Ok(read_item(item))
}

pub fn read_item(item: CslItem) -> NormalizedRecord {
    let url = item.url.as_deref().and_then(|u| normalize_url(u, true, false));
    let id = item
        .doi
        .as_deref()
        .or(item.id.as_deref())
        .and_then(normalize_doi)
        .or_else(|| url.clone());
    let Some(id) = id else {
        return NormalizedRecord::not_found();
    };

    let published = item
        .issued
        .as_ref()
        .and_then(|d| d.date_parts.first())
        .and_then(|parts| {
            from_date_parts(
                parts.first().copied().unwrap_or(0),
                parts.get(1).copied().unwrap_or(0),
                parts.get(2).copied().unwrap_or(0),
            )
        });

    let container = item.container_title.as_ref().map(|title| Container {
        container_type: Some("Periodical".to_string()),
        title: Some(title.clone()),
        ..Default::default()
    });

    NormalizedRecord {
        id,
        work_type: work_type(item.item_type.as_deref()),
        url,
        contributors: map_contributors(contributor::from_csl(&item.author)),
        titles: item
            .title
            .as_deref()
            .map(sanitize)
            .filter(|t| !t.is_empty())
            .map(|title| Title {
                title,
                title_type: None,
            })
            .into_iter()
            .collect(),
        publisher: item.publisher.map(|name| Publisher { name }),
        date: RecordDate {
            published,
            ..Default::default()
        },
        license: None,
        descriptions: item
            .abstract_text
            .as_deref()
            .map(sanitize)
            .filter(|d| !d.is_empty())
            .map(|description| Description {
                description,
                description_type: Some("Abstract".to_string()),
            })
            .into_iter()
            .collect(),
        subjects: item
            .categories
            .into_iter()
            .map(|subject| Subject { subject })
            .collect(),
        language: item.language,
        alternate_identifiers: Vec::new(),
        related_identifiers: Vec::new(),
        references: Vec::new(),
        funding_references: Vec::new(),
        container,
        state: State::Findable,
        schema_version: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributor::Contributor;

    fn blog_posting() -> String {
        serde_json::json!({
            "type": "post-weblog",
            "id": "https://doi.org/10.5438/4k3m-nyvg",
            "DOI": "10.5438/4k3m-nyvg",
            "URL": "https://blog.datacite.org/eating-your-own-dog-food",
            "title": "Eating your own Dog Food",
            "author": [{"given": "Martin", "family": "Fenner"}],
            "issued": {"date-parts": [[2016, 12, 20]]},
            "abstract": "Eating your own dog food is a slang term.",
            "container-title": "DataCite Blog",
            "publisher": "DataCite",
            "categories": ["datacite", "doi"]
        })
        .to_string()
    }

    #[test]
    fn reads_blog_posting() {
        let record = read(&blog_posting()).unwrap();
        assert_eq!(record.id, "https://doi.org/10.5438/4k3m-nyvg");
        assert_eq!(record.work_type, WorkType::Article);
        assert_eq!(
            record.url.as_deref(),
            Some("https://blog.datacite.org/eating-your-own-dog-food")
        );
        assert_eq!(record.titles[0].title, "Eating your own Dog Food");
        assert_eq!(record.date.published.as_deref(), Some("2016-12-20"));
        assert_eq!(
            record.container.unwrap().title.as_deref(),
            Some("DataCite Blog")
        );
    }

    #[test]
    fn author_given_family_maps_to_person() {
        let record = read(&blog_posting()).unwrap();
        match &record.contributors[0] {
            Contributor::Person {
                given_name,
                family_name,
                ..
            } => {
                assert_eq!(given_name.as_deref(), Some("Martin"));
                assert_eq!(family_name.as_deref(), Some("Fenner"));
            }
            other => panic!("expected person, got {other:?}"),
        }
    }

    #[test]
    fn missing_author_yields_unavailable_organization() {
        let record = read(
            &serde_json::json!({
                "type": "post-weblog",
                "DOI": "10.5438/4k3m-nyvg",
                "title": "Eating your own Dog Food"
            })
            .to_string(),
        )
        .unwrap();
        assert!(matches!(
            &record.contributors[0],
            Contributor::Organization { name, .. } if name == ":(unav)"
        ));
    }

    #[test]
    fn year_only_issued_date() {
        let record = read(
            &serde_json::json!({
                "DOI": "10.5438/4k3m-nyvg",
                "issued": {"date-parts": [[2016]]}
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(record.date.published.as_deref(), Some("2016"));
    }
}
