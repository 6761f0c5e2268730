use serde::Deserialize;
use serde_json::Value;

use crate::contributor::{self, JsonFeedAuthor, map_contributors};
use crate::date::to_iso_datetime;
use crate::identifier::{doi::normalize_doi, issn::normalize_issn, normalize_url};
use crate::license::{self, License};
use crate::reader::{human_case, sanitize};
use crate::record::{
    AlternateIdentifier, Container, Description, NormalizedRecord, Publisher, RecordDate, State,
    Subject, Title, WorkType,
};
use crate::relation::{
    FundingReference, Relationship, funding_from_award_url, references, related_identifiers,
};

/// Relation types a JSON Feed relationship may carry into the normalized
/// record; everything else (e.g. `HasAward`) is consumed elsewhere or
/// dropped.
const SUPPORTED_RELATION_TYPES: &[&str] = &["IsIdenticalTo", "IsPreprintOf", "IsTranslationOf"];

/// A rogue-scholar JSON Feed post, as fetched from the posts API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonFeedItem {
    pub id: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub language: Option<String>,
    #[serde(default)]
    pub authors: Vec<JsonFeedAuthor>,
    pub blog: Option<JsonFeedBlog>,
    #[serde(default)]
    pub reference: Vec<Value>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// The blog-level metadata nested in every post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonFeedBlog {
    pub title: Option<String>,
    pub issn: Option<String>,
    pub license: Option<String>,
    pub category: Option<String>,
    pub funding: Option<JsonFeedFunding>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonFeedFunding {
    pub funder_name: Option<String>,
    pub funder_id: Option<String>,
    pub award: Option<String>,
    pub award_number: Option<String>,
}

/// Read a JSON Feed post document into a normalized record.
pub fn read(string: &str) -> anyhow::Result<NormalizedRecord> {
    let item: JsonFeedItem = serde_json::from_str(string)?;
    Ok(read_item(item))
}

/// Normalize an already-parsed JSON Feed post.
pub fn read_item(item: JsonFeedItem) -> NormalizedRecord {
    let url = item.url.as_deref().and_then(|u| normalize_url(u, true, false));
    let id = item
        .doi
        .as_deref()
        .and_then(normalize_doi)
        .or_else(|| url.clone());
    let Some(id) = id else {
        return NormalizedRecord::not_found();
    };

    let contributors = map_contributors(contributor::from_json_feed(&item.authors));

    let titles = item
        .title
        .as_deref()
        .map(sanitize)
        .filter(|t| !t.is_empty())
        .map(|title| Title {
            title,
            title_type: None,
        })
        .into_iter()
        .collect();

    let blog = item.blog.unwrap_or_default();

    let publisher = blog.title.clone().map(|name| Publisher { name });

    let date = RecordDate {
        published: item.published_at.and_then(to_iso_datetime),
        updated: item.updated_at.and_then(to_iso_datetime),
        ..Default::default()
    };

    let license = blog.license.as_deref().map(|url| {
        license::resolve(License {
            id: None,
            url: Some(url.to_string()),
        })
    });

    let issn = blog.issn.as_deref().and_then(normalize_issn);
    let container = Container {
        container_type: Some("Periodical".to_string()),
        title: blog.title.clone(),
        identifier_type: issn.is_some().then(|| "ISSN".to_string()),
        identifier: issn,
    };

    let descriptions = item
        .summary
        .as_deref()
        .map(sanitize)
        .filter(|d| !d.is_empty())
        .map(|description| Description {
            description,
            description_type: Some("Abstract".to_string()),
        })
        .into_iter()
        .collect();

    let subjects = blog
        .category
        .as_deref()
        .map(|category| Subject {
            subject: human_case(category),
        })
        .into_iter()
        .collect();

    let funding_references = funding(&item.relationships, blog.funding.as_ref());

    let alternate_identifiers = item
        .id
        .map(|uuid| AlternateIdentifier {
            alternate_identifier: uuid,
            alternate_identifier_type: "UUID".to_string(),
        })
        .into_iter()
        .collect();

    NormalizedRecord {
        id,
        work_type: WorkType::Article,
        url,
        contributors,
        titles,
        publisher,
        date,
        license,
        descriptions,
        subjects,
        language: item.language,
        alternate_identifiers,
        related_identifiers: related_identifiers(&item.relationships, SUPPORTED_RELATION_TYPES),
        references: references(&item.reference),
        funding_references,
        container: Some(container),
        state: State::Findable,
        schema_version: None,
    }
}

/// Funding comes from two places: `HasAward` relationships whose award URL
/// carries a known funder prefix, and blog-level funding metadata.
fn funding(
    relationships: &[Relationship],
    blog_funding: Option<&JsonFeedFunding>,
) -> Vec<FundingReference> {
    let mut awards: Vec<FundingReference> = relationships
        .iter()
        .filter(|r| r.relation_type.as_deref() == Some("HasAward"))
        .filter_map(|r| r.url.as_deref().and_then(funding_from_award_url))
        .collect();

    if let Some(funding) = blog_funding {
        awards.push(FundingReference {
            funder_name: funding.funder_name.clone(),
            funder_identifier: funding.funder_id.clone(),
            funder_identifier_type: Some("Crossref Funder ID".to_string()),
            award_title: funding.award.clone(),
            award_number: funding.award_number.clone(),
        });
    }
    awards
}
