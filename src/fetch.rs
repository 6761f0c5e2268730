use std::time::Duration;

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, warn};

const USER_AGENT: &str = "commonmeta/0.1 (+https://commonmeta.org)";

fn agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(Duration::from_secs(5)))
        .timeout_global(Some(Duration::from_secs(10)))
        .build();
    ureq::Agent::new_with_config(config)
}

fn get(url: &str) -> anyhow::Result<String> {
    agent()
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .with_context(|| format!("request failed for {url}"))?
        .into_body()
        .read_to_string()
        .context("failed to read response body")
}

/// Fetch a JSON document. Any transport error or non-success status reads as
/// "document not found" (`None`); the caller turns that into record state,
/// never into a panic or retry.
pub fn get_json(url: &str) -> Option<Value> {
    match get(url) {
        Ok(body) => match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(url, %err, "response was not valid JSON");
                None
            }
        },
        Err(err) => {
            warn!(url, %err, "fetch failed");
            None
        }
    }
}

/// Look up the registration agency for a DOI via the doi.org `/ra` endpoint.
/// Returns the agency name (e.g. `Crossref`, `DataCite`) or `None` when the
/// DOI is unregistered or the lookup fails.
pub fn doi_registration_agency(doi: &str) -> Option<String> {
    let url = format!("https://doi.org/ra/{doi}");
    let body = get_json(&url)?;
    let agency = body
        .get(0)?
        .get("RA")
        .and_then(Value::as_str)
        .map(str::to_string);
    debug!(doi, ?agency, "registration agency lookup");
    agency
}
