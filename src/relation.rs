use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifier::doi::{normalize_doi, validate_prefix};

/// A relationship between this work and another, as found in source
/// metadata: a target URL plus a relation-type tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationship {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub relation_type: Option<String>,
}

/// A normalized related-identifier entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
}

/// A normalized reference entry. A DOI displaces the URL: the URL is kept
/// only when no DOI is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A normalized funding reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FundingReference {
    #[serde(rename = "funderName", skip_serializing_if = "Option::is_none")]
    pub funder_name: Option<String>,
    #[serde(rename = "funderIdentifier", skip_serializing_if = "Option::is_none")]
    pub funder_identifier: Option<String>,
    #[serde(
        rename = "funderIdentifierType",
        skip_serializing_if = "Option::is_none"
    )]
    pub funder_identifier_type: Option<String>,
    #[serde(rename = "awardTitle", skip_serializing_if = "Option::is_none")]
    pub award_title: Option<String>,
    #[serde(rename = "awardNumber", skip_serializing_if = "Option::is_none")]
    pub award_number: Option<String>,
}

/// Filter relationships to the supported relation types, projecting each
/// survivor to `{id, type}`. Input order is preserved; entries with an
/// unsupported or missing type are dropped, not passed through.
pub fn related_identifiers(
    relationships: &[Relationship],
    supported: &[&str],
) -> Vec<RelatedIdentifier> {
    relationships
        .iter()
        .filter_map(|r| {
            let relation_type = r.relation_type.as_deref()?;
            if !supported.contains(&relation_type) {
                return None;
            }
            Some(RelatedIdentifier {
                id: r.url.clone()?,
                relation_type: relation_type.to_string(),
            })
        })
        .collect()
}

/// Expand a relation-type tag into the family of tags it matches when
/// filtering: `References` consolidates the `References`/`Cites` pair, every
/// other tag matches only itself.
pub fn consolidate_relation_type(tag: &str) -> Vec<&str> {
    if tag == "References" {
        vec!["References", "Cites"]
    } else {
        vec![tag]
    }
}

/// Extract references from raw JSON entries. Only object-shaped entries
/// count; nulls and scalars are skipped rather than propagated as partial
/// records. A DOI is normalized, and a URL survives only DOI-less entries.
pub fn references(entries: &[Value]) -> Vec<Reference> {
    entries
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let doi = obj
                .get("doi")
                .and_then(Value::as_str)
                .and_then(normalize_doi);
            let url = if doi.is_none() {
                obj.get("url").and_then(Value::as_str).map(str::to_string)
            } else {
                None
            };
            Some(Reference {
                key: obj.get("key").and_then(Value::as_str).map(str::to_string),
                doi,
                url,
            })
        })
        .collect()
}

/// Award DOI prefixes with a known funder. Kept as table data so new funder
/// prefixes are one row away.
pub const AWARD_FUNDERS: &[(&str, &str, &str)] = &[(
    "10.3030",
    "European Commission",
    "https://doi.org/10.13039/501100000780",
)];

/// Turn a `HasAward` relationship into a funding reference when its award
/// URL carries a DOI prefix listed in [`AWARD_FUNDERS`].
pub fn funding_from_award_url(url: &str) -> Option<FundingReference> {
    let prefix = validate_prefix(url)?;
    let (_, funder_name, funder_id) = AWARD_FUNDERS
        .iter()
        .find(|(award_prefix, _, _)| *award_prefix == prefix)?;
    Some(FundingReference {
        funder_name: Some((*funder_name).to_string()),
        funder_identifier: Some((*funder_id).to_string()),
        funder_identifier_type: Some("Crossref Funder ID".to_string()),
        award_number: url.rsplit('/').next().map(str::to_string),
        ..Default::default()
    })
}
