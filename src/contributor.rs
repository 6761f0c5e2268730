use serde::{Deserialize, Serialize};

use crate::identifier::{from_curie, normalize_url, orcid::normalize_orcid};

/// The sentinel name for records whose contributors cannot be determined;
/// a controlled "value unavailable" marker, not an empty field.
pub const UNAVAILABLE: &str = ":(unav)";

/// A normalized contributor, discriminated into a person or an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Contributor {
    Person {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(rename = "givenName", skip_serializing_if = "Option::is_none")]
        given_name: Option<String>,
        #[serde(rename = "familyName", skip_serializing_if = "Option::is_none")]
        family_name: Option<String>,
        #[serde(rename = "contributorRoles")]
        contributor_roles: Vec<String>,
    },
    Organization {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        #[serde(rename = "contributorRoles")]
        contributor_roles: Vec<String>,
    },
}

impl Contributor {
    /// The placeholder organization used when a source has no identifiable
    /// contributors at all.
    pub fn unavailable() -> Self {
        Contributor::Organization {
            id: None,
            name: UNAVAILABLE.to_string(),
            contributor_roles: vec!["Author".to_string()],
        }
    }

    pub fn roles(&self) -> &[String] {
        match self {
            Contributor::Person {
                contributor_roles, ..
            }
            | Contributor::Organization {
                contributor_roles, ..
            } => contributor_roles,
        }
    }
}

/// The common shape every per-source adapter produces before the shared
/// person/organization classifier runs.
#[derive(Debug, Clone, Default)]
pub struct RawContributor {
    pub id: Option<String>,
    /// Source-declared kind, when the source carries one (`Person`,
    /// `Organization`). The classifier treats it as a hint, not gospel.
    pub kind: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub roles: Vec<String>,
}

/// Academic-title suffixes stripped from the trailing comma clause of a name
/// before classification ("Jane Doe, PhD" classifies like "Jane Doe").
const ACADEMIC_TITLES: &[&str] = &[
    "MD", "PhD", "DVM", "DDS", "DMD", "JD", "MBA", "MPH", "MS", "MA", "MFA", "MSc", "MEd", "MEng",
    "MPhil", "MRes", "LLM", "LLB", "BSc", "BA", "BFA", "BEd", "BEng", "BPhil",
];

fn strip_academic_title(name: &str) -> &str {
    match name.split_once(", ") {
        Some((base, suffix)) if ACADEMIC_TITLES.contains(&suffix) => base,
        _ => name,
    }
}

/// Classify one raw contributor into a person or an organization.
///
/// An explicit family name always wins. Otherwise a single `name` string is
/// split heuristically: more than one token whose last token is not
/// parenthesized reads as a human name (given = all but last token, family =
/// last token); anything else reads as an organization.
pub fn classify(raw: RawContributor) -> Contributor {
    let roles = if raw.roles.is_empty() {
        vec!["Author".to_string()]
    } else {
        raw.roles
    };

    if raw.family_name.is_some() {
        return Contributor::Person {
            id: raw.id,
            given_name: raw.given_name,
            family_name: raw.family_name,
            contributor_roles: roles,
        };
    }

    let Some(name) = raw.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return Contributor::Organization {
            id: raw.id,
            name: UNAVAILABLE.to_string(),
            contributor_roles: roles,
        };
    };

    if raw.kind.as_deref() == Some("Organization") {
        return Contributor::Organization {
            id: raw.id,
            name: name.to_string(),
            contributor_roles: roles,
        };
    }

    let name = strip_academic_title(name);
    let tokens: Vec<&str> = name.split(' ').collect();
    let person_hint = raw.kind.as_deref() == Some("Person");
    // Parentheses around the last token indicate an organization.
    let splittable = tokens.len() > 1 && !tokens.last().unwrap().starts_with('(');

    if splittable && (person_hint || raw.kind.is_none()) {
        let family = tokens.last().unwrap().to_string();
        let given = tokens[..tokens.len() - 1].join(" ");
        Contributor::Person {
            id: raw.id,
            given_name: Some(given),
            family_name: Some(family),
            contributor_roles: roles,
        }
    } else if person_hint {
        // Declared a person but the name cannot be split; keep it whole.
        Contributor::Person {
            id: raw.id,
            given_name: None,
            family_name: Some(name.to_string()),
            contributor_roles: roles,
        }
    } else {
        Contributor::Organization {
            id: raw.id,
            name: name.to_string(),
            contributor_roles: roles,
        }
    }
}

/// Run the classifier over an adapted contributor list, falling back to the
/// single `":(unav)"` organization when the source has none.
pub fn map_contributors(raw: Vec<RawContributor>) -> Vec<Contributor> {
    if raw.is_empty() {
        return vec![Contributor::unavailable()];
    }
    raw.into_iter().map(classify).collect()
}

// --- Per-source adapters ------------------------------------------------

/// A CSL-JSON name object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CslName {
    pub family: Option<String>,
    pub given: Option<String>,
    pub literal: Option<String>,
    pub name: Option<String>,
}

/// CSL names: `literal` or `name` mark an organization, `given`/`family`
/// mark a person.
pub fn from_csl(names: &[CslName]) -> Vec<RawContributor> {
    names
        .iter()
        .map(|n| {
            if let Some(literal) = n.literal.as_ref().or(n.name.as_ref()) {
                RawContributor {
                    kind: Some("Organization".to_string()),
                    name: Some(literal.clone()),
                    ..Default::default()
                }
            } else {
                RawContributor {
                    given_name: n.given.clone(),
                    family_name: n.family.clone(),
                    ..Default::default()
                }
            }
        })
        .collect()
}

/// A contributor element from Crossref deposit XML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefXmlContributor {
    pub given_name: Option<String>,
    pub surname: Option<String>,
    /// Organization contributors carry a bare `name` instead.
    pub name: Option<String>,
    pub contributor_role: Option<String>,
    #[serde(rename = "ORCID")]
    pub orcid: Option<String>,
}

fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Crossref XML contributors: `given_name`/`surname` with a lowercase
/// `contributor_role` attribute and an optional ORCID URL.
pub fn from_crossref_xml(contributors: &[CrossrefXmlContributor]) -> Vec<RawContributor> {
    contributors
        .iter()
        .map(|c| {
            let role = capitalize(c.contributor_role.as_deref().unwrap_or("author"));
            RawContributor {
                id: c.orcid.as_deref().and_then(normalize_orcid),
                kind: c.name.is_some().then(|| "Organization".to_string()),
                name: c.name.clone(),
                given_name: c.given_name.clone(),
                family_name: c.surname.clone(),
                roles: vec![role],
            }
        })
        .collect()
}

/// A contributor element from a kbase CreditMetadata record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KbaseContributor {
    pub name: Option<String>,
    pub contributor_id: Option<String>,
    #[serde(default)]
    pub contributor_roles: Vec<String>,
}

/// DataCite contributor types mapped to normalized role tags; unknown types
/// collapse to `Other`.
const DATACITE_CONTRIBUTOR_ROLES: &[(&str, &str)] = &[
    ("ContactPerson", "ContactPerson"),
    ("DataCollector", "DataCollection"),
    ("DataCurator", "DataCuration"),
    ("Editor", "Editor"),
    ("Producer", "Producer"),
    ("ProjectLeader", "ProjectLeader"),
    ("ProjectManager", "ProjectAdministration"),
    ("Researcher", "Investigation"),
    ("Supervisor", "Supervision"),
    ("Translator", "Translation"),
];

fn pascal_case(role: &str) -> String {
    role.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

/// Map a prefixed kbase role (`CRediT:...` or `DataCite:...`) to a
/// normalized role tag.
fn map_kbase_role(role: &str) -> Option<String> {
    let (scheme, tag) = role.split_once(':')?;
    match scheme {
        "CRediT" => Some(pascal_case(tag)),
        "DataCite" => Some(
            DATACITE_CONTRIBUTOR_ROLES
                .iter()
                .find(|(datacite, _)| *datacite == tag)
                .map(|(_, mapped)| (*mapped).to_string())
                .unwrap_or_else(|| "Other".to_string()),
        ),
        _ => Some(tag.to_string()),
    }
}

/// kbase contributors: CURIE contributor ids and prefixed role vocabularies.
pub fn from_kbase(contributors: &[KbaseContributor]) -> Vec<RawContributor> {
    contributors
        .iter()
        .map(|c| RawContributor {
            id: c.contributor_id.as_deref().and_then(from_curie),
            name: c.name.clone(),
            roles: c
                .contributor_roles
                .iter()
                .filter_map(|r| map_kbase_role(r))
                .collect(),
            ..Default::default()
        })
        .collect()
}

/// A creator element from Schema.org JSON-LD.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaOrgAuthor {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    #[serde(rename = "@type", default)]
    pub kind: SchemaOrgType,
    pub name: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: Option<String>,
    #[serde(rename = "familyName")]
    pub family_name: Option<String>,
}

/// Schema.org `@type` may be a single string or a list of strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrgType {
    #[default]
    Missing,
    One(String),
    Many(Vec<String>),
}

impl SchemaOrgType {
    fn person_or_organization(&self) -> Option<String> {
        match self {
            SchemaOrgType::Missing => None,
            SchemaOrgType::One(t) => Some(t.clone()),
            SchemaOrgType::Many(ts) => ts
                .iter()
                .find(|t| matches!(t.as_str(), "Person" | "Organization"))
                .cloned(),
        }
    }
}

/// Schema.org creators: an `@id` on the orcid.org host forces Person, and
/// `@type` may be a string or a list.
pub fn from_schema_org(authors: &[SchemaOrgAuthor]) -> Vec<RawContributor> {
    authors
        .iter()
        .map(|a| {
            let orcid = a.id.as_deref().and_then(normalize_orcid);
            let kind = if orcid.is_some() {
                Some("Person".to_string())
            } else {
                a.kind.person_or_organization()
            };
            RawContributor {
                id: orcid.or_else(|| a.id.clone()),
                kind,
                name: a.name.clone(),
                given_name: a.given_name.clone(),
                family_name: a.family_name.clone(),
                ..Default::default()
            }
        })
        .collect()
}

/// A JSON Feed author: a display name plus a URL that usually is the
/// author's ORCID.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonFeedAuthor {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// JSON Feed authors: the `url` field is the author's identifier.
pub fn from_json_feed(authors: &[JsonFeedAuthor]) -> Vec<RawContributor> {
    authors
        .iter()
        .map(|a| {
            let id = a
                .url
                .as_deref()
                .and_then(|u| normalize_orcid(u).or_else(|| normalize_url(u, true, false)));
            RawContributor {
                id,
                name: a.name.clone(),
                ..Default::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> RawContributor {
        RawContributor {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_list_yields_unavailable_organization() {
        let contributors = map_contributors(Vec::new());
        assert_eq!(contributors.len(), 1);
        assert_eq!(
            contributors[0],
            Contributor::Organization {
                id: None,
                name: UNAVAILABLE.to_string(),
                contributor_roles: vec!["Author".to_string()],
            }
        );
    }

    #[test]
    fn splits_two_token_name_into_person() {
        let c = classify(named("Matt Wedel"));
        assert_eq!(
            c,
            Contributor::Person {
                id: None,
                given_name: Some("Matt".to_string()),
                family_name: Some("Wedel".to_string()),
                contributor_roles: vec!["Author".to_string()],
            }
        );
    }

    #[test]
    fn multi_token_given_name() {
        let c = classify(named("Juan Pablo Alperin"));
        match c {
            Contributor::Person {
                given_name,
                family_name,
                ..
            } => {
                assert_eq!(given_name.as_deref(), Some("Juan Pablo"));
                assert_eq!(family_name.as_deref(), Some("Alperin"));
            }
            other => panic!("expected person, got {other:?}"),
        }
    }

    #[test]
    fn single_token_name_is_organization() {
        assert!(matches!(
            classify(named("UNESCO")),
            Contributor::Organization { .. }
        ));
    }

    #[test]
    fn parenthesized_last_token_is_organization() {
        assert!(matches!(
            classify(named("Research Councils UK (RCUK)")),
            Contributor::Organization { .. }
        ));
    }

    #[test]
    fn academic_title_suffix_is_stripped() {
        let c = classify(named("Jane Doe, PhD"));
        match c {
            Contributor::Person {
                given_name,
                family_name,
                ..
            } => {
                assert_eq!(given_name.as_deref(), Some("Jane"));
                assert_eq!(family_name.as_deref(), Some("Doe"));
            }
            other => panic!("expected person, got {other:?}"),
        }
        // Only the listed titles are stripped; other comma clauses stay.
        match classify(named("Jane Doe, Esq")) {
            Contributor::Person { family_name, .. } => {
                assert_eq!(family_name.as_deref(), Some("Esq"));
            }
            other => panic!("expected person, got {other:?}"),
        }
    }

    #[test]
    fn explicit_family_name_wins() {
        let c = classify(RawContributor {
            family_name: Some("Garza".to_string()),
            given_name: Some("Kristian".to_string()),
            kind: Some("Organization".to_string()),
            ..Default::default()
        });
        assert!(matches!(c, Contributor::Person { .. }));
    }

    #[test]
    fn declared_organization_is_not_split() {
        let c = classify(RawContributor {
            name: Some("Open Science Framework".to_string()),
            kind: Some("Organization".to_string()),
            ..Default::default()
        });
        assert!(matches!(c, Contributor::Organization { .. }));
    }

    #[test]
    fn csl_literal_is_organization() {
        let names = vec![CslName {
            literal: Some("World Health Organization".to_string()),
            ..Default::default()
        }];
        let contributors = map_contributors(from_csl(&names));
        assert!(matches!(
            &contributors[0],
            Contributor::Organization { name, .. } if name == "World Health Organization"
        ));
    }

    #[test]
    fn csl_given_family_is_person() {
        let names = vec![CslName {
            given: Some("Martin".to_string()),
            family: Some("Fenner".to_string()),
            ..Default::default()
        }];
        let contributors = map_contributors(from_csl(&names));
        assert!(matches!(
            &contributors[0],
            Contributor::Person { family_name: Some(f), .. } if f == "Fenner"
        ));
    }

    #[test]
    fn crossref_xml_role_is_capitalized() {
        let raw = from_crossref_xml(&[CrossrefXmlContributor {
            given_name: Some("Martin".to_string()),
            surname: Some("Fenner".to_string()),
            contributor_role: Some("editor".to_string()),
            ..Default::default()
        }]);
        let contributors = map_contributors(raw);
        assert_eq!(contributors[0].roles(), ["Editor".to_string()]);
    }

    #[test]
    fn kbase_roles_map_through_tables() {
        assert_eq!(
            map_kbase_role("CRediT:writing_original_draft").as_deref(),
            Some("WritingOriginalDraft")
        );
        assert_eq!(
            map_kbase_role("DataCite:DataCurator").as_deref(),
            Some("DataCuration")
        );
        assert_eq!(
            map_kbase_role("DataCite:SomethingNew").as_deref(),
            Some("Other")
        );
        assert_eq!(map_kbase_role("Custom:Reviewer").as_deref(), Some("Reviewer"));
        assert_eq!(map_kbase_role("unprefixed"), None);
    }

    #[test]
    fn kbase_curie_id_becomes_orcid_url() {
        let raw = from_kbase(&[KbaseContributor {
            name: Some("Jane Doe".to_string()),
            contributor_id: Some("ORCID:0000-0003-1419-2405".to_string()),
            contributor_roles: vec!["CRediT:conceptualization".to_string()],
        }]);
        let contributors = map_contributors(raw);
        match &contributors[0] {
            Contributor::Person { id, .. } => {
                assert_eq!(
                    id.as_deref(),
                    Some("https://orcid.org/0000-0003-1419-2405")
                );
            }
            other => panic!("expected person, got {other:?}"),
        }
    }

    #[test]
    fn schema_org_orcid_id_forces_person() {
        let raw = from_schema_org(&[SchemaOrgAuthor {
            id: Some("https://orcid.org/0000-0003-1419-2405".to_string()),
            name: Some("Martin Fenner".to_string()),
            ..Default::default()
        }]);
        let contributors = map_contributors(raw);
        assert!(matches!(&contributors[0], Contributor::Person { .. }));
    }

    #[test]
    fn schema_org_type_list_is_searched() {
        let author: SchemaOrgAuthor = serde_json::from_str(
            r#"{"@type": ["Thing", "Organization"], "name": "Front Matter"}"#,
        )
        .unwrap();
        let contributors = map_contributors(from_schema_org(&[author]));
        assert!(matches!(&contributors[0], Contributor::Organization { .. }));
    }

    #[test]
    fn json_feed_author_url_becomes_id() {
        let raw = from_json_feed(&[JsonFeedAuthor {
            name: Some("Matt Wedel".to_string()),
            url: Some("https://orcid.org/0000-0001-6082-3103".to_string()),
        }]);
        let contributors = map_contributors(raw);
        match &contributors[0] {
            Contributor::Person { id, .. } => {
                assert_eq!(
                    id.as_deref(),
                    Some("https://orcid.org/0000-0001-6082-3103")
                );
            }
            other => panic!("expected person, got {other:?}"),
        }
    }
}
