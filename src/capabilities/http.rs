use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::errors::CollectorError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Minimal view of an HTTP response, enough for every collector.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One bounded HTTP GET with a caller-chosen client identity.
pub trait HttpFetch {
    fn get(&self, url: &str, identity: &str) -> Result<HttpResponse, CollectorError>;
}

/// Real transport backed by a single blocking reqwest client.
///
/// The proxy, when configured, is baked into the client at construction so
/// it applies uniformly to every request for the run's duration.
pub struct ReqwestFetch {
    client: Client,
}

impl ReqwestFetch {
    pub fn new(proxy: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().timeout(HTTP_TIMEOUT);
        if let Some(addr) = proxy {
            let proxy = reqwest::Proxy::all(addr)
                .context(format!("Invalid proxy address: {}", addr))?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(ReqwestFetch { client })
    }
}

impl HttpFetch for ReqwestFetch {
    fn get(&self, url: &str, identity: &str) -> Result<HttpResponse, CollectorError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, identity)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    CollectorError::network(format!("request to {} timed out", url))
                } else {
                    CollectorError::network(format!("request to {} failed: {}", url, e))
                }
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .text()
            .map_err(|e| CollectorError::network(format!("failed to read body from {}: {}", url, e)))?;

        Ok(HttpResponse { status, content_type, body })
    }
}
