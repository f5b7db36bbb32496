use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};
use scraper::{Html, Selector};
use serde_json::{json, Value};

use crate::capabilities::{HttpFetch, HttpResponse};
use crate::config::RunConfig;
use crate::errors::CollectorError;
use crate::models::{CollectorOutcome, OutcomeKind};
use crate::policy::RequestPolicy;

/// Fetch one URL and extract title, meta tags, body text, and outbound
/// links. Non-textual content types produce a payload with just the
/// status and content type.
pub fn collect(
    url: &str,
    config: &RunConfig,
    policy: &RequestPolicy,
    http: &dyn HttpFetch,
) -> CollectorOutcome {
    policy.throttle();
    let response = match http.get(url, policy.next_identity()) {
        Ok(response) => response,
        Err(err) => {
            warn!("scrape failed for {}: {}", url, err);
            return CollectorOutcome::failure(OutcomeKind::Scrape, url, err);
        }
    };

    match build_payload(url, &response, config.scrape_max_chars) {
        Ok(payload) => {
            info!("scraped {} (status {})", url, response.status);
            CollectorOutcome::success(OutcomeKind::Scrape, url, payload)
        }
        Err(err) => {
            warn!("scrape parse failed for {}: {}", url, err);
            CollectorOutcome::failure(OutcomeKind::Scrape, url, err)
        }
    }
}

fn is_textual(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.contains("text") || ct.contains("html"))
        .unwrap_or(false)
}

fn build_payload(
    url: &str,
    response: &HttpResponse,
    max_chars: usize,
) -> Result<Value, CollectorError> {
    if !is_textual(response.content_type.as_deref()) {
        return Ok(json!({
            "url": url,
            "status": response.status,
            "content_type": response.content_type,
        }));
    }

    let page = extract_page(&response.body, max_chars)?;
    Ok(json!({
        "url": url,
        "status": response.status,
        "title": page.title,
        "meta": page.meta,
        "text": page.text,
        "links": page.links,
    }))
}

struct ExtractedPage {
    title: String,
    meta: BTreeMap<String, String>,
    text: String,
    links: Vec<String>,
}

fn extract_page(html: &str, max_chars: usize) -> Result<ExtractedPage, CollectorError> {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title")
        .map_err(|e| CollectorError::Parse(format!("bad title selector: {}", e)))?;
    let meta_selector = Selector::parse("meta")
        .map_err(|e| CollectorError::Parse(format!("bad meta selector: {}", e)))?;
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| CollectorError::Parse(format!("bad link selector: {}", e)))?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    // name takes precedence over property; the last occurrence of a key wins
    let mut meta = BTreeMap::new();
    for tag in document.select(&meta_selector) {
        let key = tag.value().attr("name").or_else(|| tag.value().attr("property"));
        if let (Some(key), Some(content)) = (key, tag.value().attr("content")) {
            meta.insert(key.to_string(), content.to_string());
        }
    }

    let text: String = document
        .root_element()
        .text()
        .collect::<String>()
        .chars()
        .take(max_chars)
        .collect();

    // Set semantics: duplicates removed, order not guaranteed beyond the
    // set's own (sorted) iteration.
    let links: Vec<String> = document
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Ok(ExtractedPage { title, meta, text, links })
}
