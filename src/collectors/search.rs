use log::{info, warn};
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::json;

use crate::capabilities::HttpFetch;
use crate::config::RunConfig;
use crate::errors::CollectorError;
use crate::models::{CollectorOutcome, OutcomeKind};
use crate::policy::RequestPolicy;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const RESULT_SELECTOR: &str = ".result__a";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// Issue one paginated search query and extract title+link pairs in
/// document order, capped at `search_max_results`. Truncation beyond the
/// cap is silent.
pub fn collect(
    query: &str,
    config: &RunConfig,
    policy: &RequestPolicy,
    http: &dyn HttpFetch,
) -> CollectorOutcome {
    match fetch_results(query, config, policy, http) {
        Ok(hits) => {
            info!("search: found {} results for '{}'", hits.len(), query);
            CollectorOutcome::success(
                OutcomeKind::Search,
                query,
                json!({ "query": query, "results": hits }),
            )
        }
        Err(err) => {
            warn!("search failed for '{}': {}", query, err);
            CollectorOutcome::failure(OutcomeKind::Search, query, err)
        }
    }
}

fn fetch_results(
    query: &str,
    config: &RunConfig,
    policy: &RequestPolicy,
    http: &dyn HttpFetch,
) -> Result<Vec<SearchHit>, CollectorError> {
    let url = reqwest::Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query)])
        .map_err(|e| CollectorError::Validation(format!("could not encode query: {}", e)))?;

    policy.throttle();
    let response = http.get(url.as_str(), policy.next_identity())?;
    if !response.is_success() {
        return Err(CollectorError::http_status(response.status));
    }

    extract_hits(&response.body, config.search_max_results)
}

/// Pull title+href pairs out of the result page, in document order.
fn extract_hits(html: &str, max_results: usize) -> Result<Vec<SearchHit>, CollectorError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(RESULT_SELECTOR)
        .map_err(|e| CollectorError::Parse(format!("bad result selector: {}", e)))?;

    let hits = document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let title = anchor.text().collect::<String>().trim().to_string();
            Some(SearchHit { title, url: href.to_string() })
        })
        .take(max_results)
        .collect();

    Ok(hits)
}
