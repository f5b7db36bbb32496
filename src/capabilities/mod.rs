//! External service seams.
//!
//! Every collector talks to the outside world through one of these traits.
//! The concrete providers are resolved once at process start and injected
//! into the orchestrator, so tests can substitute stubs and optional
//! capabilities (OCR) are gated in one place instead of checked ad hoc.

mod http;
mod whois;
mod dns;
mod ocr;

pub use http::{HttpFetch, HttpResponse, ReqwestFetch};
pub use whois::{WhoisLookup, TcpWhois};
pub use dns::{DnsLookup, DnsRecordType, HickoryDns};
pub use ocr::{OcrCapability, OcrEngine, resolve_ocr};

use anyhow::Result;

use crate::policy::RequestPolicy;

/// The full set of external capabilities available to a run.
pub struct Capabilities {
    pub http: Box<dyn HttpFetch>,
    pub whois: Box<dyn WhoisLookup>,
    pub dns: Box<dyn DnsLookup>,
    pub ocr: OcrCapability,
}

impl Capabilities {
    /// Resolve the real providers against the active policy.
    pub fn resolve(policy: &RequestPolicy) -> Result<Self> {
        Ok(Capabilities {
            http: Box::new(ReqwestFetch::new(policy.proxy())?),
            whois: Box::new(TcpWhois::default()),
            dns: Box::new(HickoryDns::new()?),
            ocr: resolve_ocr(),
        })
    }
}
