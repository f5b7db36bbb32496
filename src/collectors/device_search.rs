use log::{info, warn};
use serde_json::Value;

use crate::capabilities::HttpFetch;
use crate::config::RunConfig;
use crate::errors::CollectorError;
use crate::models::{CollectorOutcome, OutcomeKind};
use crate::policy::RequestPolicy;

const DEVICE_SEARCH_ENDPOINT: &str = "https://api.shodan.io/shodan/host/search";

/// Query the internet-wide device-search service for the free-text query.
///
/// There is no unauthenticated mode: a missing API key is recorded as a
/// configuration failure without touching the network.
pub fn collect(
    query: &str,
    config: &RunConfig,
    policy: &RequestPolicy,
    http: &dyn HttpFetch,
) -> CollectorOutcome {
    match search(query, config, policy, http) {
        Ok(payload) => {
            info!("device-search: results for '{}'", query);
            CollectorOutcome::success(OutcomeKind::DeviceSearch, query, payload)
        }
        Err(err) => {
            warn!("device-search failed for '{}': {}", query, err);
            CollectorOutcome::failure(OutcomeKind::DeviceSearch, query, err)
        }
    }
}

fn search(
    query: &str,
    config: &RunConfig,
    policy: &RequestPolicy,
    http: &dyn HttpFetch,
) -> Result<Value, CollectorError> {
    let api_key = config
        .device_search_api_key
        .as_deref()
        .ok_or_else(|| {
            CollectorError::Configuration("device search API key not configured".to_string())
        })?;

    let url = reqwest::Url::parse_with_params(
        DEVICE_SEARCH_ENDPOINT,
        &[("key", api_key), ("query", query)],
    )
    .map_err(|e| CollectorError::Validation(format!("could not encode query: {}", e)))?;

    policy.throttle();
    let response = http.get(url.as_str(), policy.next_identity())?;
    if !response.is_success() {
        return Err(CollectorError::http_status(response.status));
    }

    serde_json::from_str(&response.body)
        .map_err(|e| CollectorError::Parse(format!("device-search response was not JSON: {}", e)))
}
