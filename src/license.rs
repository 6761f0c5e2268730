use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::identifier::normalize_url;

/// A rights statement as it travels through a normalized record: either a
/// resolved SPDX pair or the raw `{id, url}` candidate when no SPDX license
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpdxLicense {
    #[serde(rename = "licenseId")]
    license_id: String,
    #[serde(rename = "seeAlso")]
    see_also: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SpdxTable {
    licenses: Vec<SpdxLicense>,
}

static SPDX_LICENSES: Lazy<Vec<SpdxLicense>> = Lazy::new(|| {
    let table: SpdxTable = serde_json::from_str(include_str!("../resources/spdx/licenses.json"))
        .expect("bundled SPDX table is well-formed");
    table.licenses
});

const CC_FAMILIES: &[&str] = &[
    "by", "by-nc", "by-nd-nc", "by-nc-sa", "by-nd", "by-sa", "by-nc-nd",
];
const CC_VERSIONS: &[&str] = &["1.0", "2.0", "2.5", "3.0", "4.0"];

/// Historic Creative Commons URL variants (no `/legalcode` suffix, retired
/// `/us` ports, the public-domain mark) mapped to their canonical form.
static LEGACY_CC_URLS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for family in CC_FAMILIES {
        for version in CC_VERSIONS {
            table.insert(
                format!("https://creativecommons.org/licenses/{family}/{version}"),
                format!("https://creativecommons.org/licenses/{family}/{version}/legalcode"),
            );
        }
    }
    table.insert(
        "https://creativecommons.org/licenses/by/3.0/us".to_string(),
        "https://creativecommons.org/licenses/by/3.0/legalcode".to_string(),
    );
    table.insert(
        "https://creativecommons.org/licenses/by-nc-sa/3.0/us".to_string(),
        "https://creativecommons.org/licenses/by-nc-sa/3.0/legalcode".to_string(),
    );
    table.insert(
        "https://creativecommons.org/licenses/publicdomain".to_string(),
        "https://creativecommons.org/licenses/publicdomain/".to_string(),
    );
    table.insert(
        "https://creativecommons.org/publicdomain/zero/1.0".to_string(),
        "https://creativecommons.org/publicdomain/zero/1.0/legalcode".to_string(),
    );
    table
});

/// Normalize a Creative Commons URL: upgrade the scheme, strip the trailing
/// slash, and map historic variants to their canonical `/legalcode` form.
/// Non-CC URLs pass through unchanged.
pub fn normalize_cc_url(url: &str) -> Option<String> {
    let url = normalize_url(url, true, false)?;
    Some(LEGACY_CC_URLS.get(&url).cloned().unwrap_or(url))
}

/// Resolve a rights candidate against the bundled SPDX table.
///
/// The identifier match (case-insensitive) is tried before the canonical-URL
/// match; the first table hit wins, so table order breaks ties. On a hit only
/// the SPDX `{id, url}` pair survives; on a miss the candidate is returned
/// unchanged rather than erroring.
pub fn resolve(candidate: License) -> License {
    let url = candidate.url.as_deref().and_then(normalize_cc_url);
    let id = candidate.id.clone();

    let by_id = SPDX_LICENSES.iter().find(|lic| {
        id.as_deref()
            .is_some_and(|id| lic.license_id.eq_ignore_ascii_case(id))
    });
    let hit = by_id.or_else(|| {
        SPDX_LICENSES.iter().find(|lic| {
            url.as_deref()
                .is_some_and(|url| lic.see_also.first().map(String::as_str) == Some(url))
        })
    });

    match hit {
        Some(lic) => License {
            id: Some(lic.license_id.clone()),
            url: lic.see_also.first().cloned(),
        },
        None => License {
            id: candidate.id,
            url,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_cc_by_url_without_legalcode_suffix() {
        let resolved = resolve(License {
            id: None,
            url: Some("https://creativecommons.org/licenses/by/4.0".to_string()),
        });
        assert_eq!(resolved.id.as_deref(), Some("CC-BY-4.0"));
        assert_eq!(
            resolved.url.as_deref(),
            Some("https://creativecommons.org/licenses/by/4.0/legalcode")
        );
    }

    #[test]
    fn resolves_insecure_trailing_slash_variant() {
        let resolved = resolve(License {
            id: None,
            url: Some("http://creativecommons.org/licenses/by/4.0/".to_string()),
        });
        assert_eq!(resolved.id.as_deref(), Some("CC-BY-4.0"));
    }

    #[test]
    fn id_match_is_case_insensitive() {
        let resolved = resolve(License {
            id: Some("cc-by-4.0".to_string()),
            url: None,
        });
        assert_eq!(resolved.id.as_deref(), Some("CC-BY-4.0"));
        assert_eq!(
            resolved.url.as_deref(),
            Some("https://creativecommons.org/licenses/by/4.0/legalcode")
        );
    }

    #[test]
    fn id_match_wins_over_url_match() {
        let resolved = resolve(License {
            id: Some("MIT".to_string()),
            url: Some("https://creativecommons.org/licenses/by/4.0".to_string()),
        });
        assert_eq!(resolved.id.as_deref(), Some("MIT"));
    }

    #[test]
    fn unknown_candidate_passes_through() {
        let candidate = License {
            id: Some("My-Custom-License".to_string()),
            url: Some("https://example.com/license".to_string()),
        };
        let resolved = resolve(candidate.clone());
        assert_eq!(resolved, candidate);
    }

    #[test]
    fn cc_zero_legacy_url_resolves() {
        let resolved = resolve(License {
            id: None,
            url: Some("https://creativecommons.org/publicdomain/zero/1.0".to_string()),
        });
        assert_eq!(resolved.id.as_deref(), Some("CC0-1.0"));
    }
}
