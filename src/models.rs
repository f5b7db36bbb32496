use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{CollectorError, CollectorFailure};

/// The kind of collector that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    Search,
    Scrape,
    Whois,
    Dns,
    GeoIp,
    DeviceSearch,
    FileMetadata,
    Ocr,
    Plugin,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Search => write!(f, "search"),
            OutcomeKind::Scrape => write!(f, "scrape"),
            OutcomeKind::Whois => write!(f, "whois"),
            OutcomeKind::Dns => write!(f, "dns"),
            OutcomeKind::GeoIp => write!(f, "geo-ip"),
            OutcomeKind::DeviceSearch => write!(f, "device-search"),
            OutcomeKind::FileMetadata => write!(f, "file-metadata"),
            OutcomeKind::Ocr => write!(f, "ocr"),
            OutcomeKind::Plugin => write!(f, "plugin"),
        }
    }
}

/// Tagged result of one collector invocation.
///
/// Exactly one of `payload`/`failure` is set; the only way to build an
/// outcome is through [`CollectorOutcome::success`] and
/// [`CollectorOutcome::failure`], which enforce that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorOutcome {
    pub kind: OutcomeKind,
    /// The input descriptor: query string, domain, IP, URL, or file path.
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CollectorFailure>,
}

impl CollectorOutcome {
    /// Record a successful collection.
    pub fn success(kind: OutcomeKind, target: impl Into<String>, payload: Value) -> Self {
        CollectorOutcome {
            kind,
            target: target.into(),
            payload: Some(payload),
            failure: None,
        }
    }

    /// Record a failed collection. The error is folded into a
    /// serializable failure record; nothing propagates past this point.
    pub fn failure(kind: OutcomeKind, target: impl Into<String>, err: CollectorError) -> Self {
        CollectorOutcome {
            kind,
            target: target.into(),
            payload: None,
            failure: Some(err.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.payload.is_some()
    }
}

/// The aggregate root for one pipeline invocation.
///
/// Entries are append-only; their order is the source of truth for
/// provenance. The record is sealed (correlation computed, `finished_at`
/// set) exactly once, after the collection phase, and never mutated after
/// export begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub entries: Vec<CollectorOutcome>,
    pub correlation: BTreeMap<String, Vec<String>>,
}

impl RunRecord {
    pub fn start() -> Self {
        RunRecord {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            entries: Vec::new(),
            correlation: BTreeMap::new(),
        }
    }

    pub fn append(&mut self, outcome: CollectorOutcome) {
        self.entries.push(outcome);
    }

    /// Store the correlation index and mark the run finished.
    pub fn seal(&mut self, correlation: BTreeMap<String, Vec<String>>) {
        self.correlation = correlation;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_sealed(&self) -> bool {
        self.finished_at.is_some()
    }
}
