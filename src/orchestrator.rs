//! Run orchestration.
//!
//! Owns the run record from start to seal: plugin registration first, then
//! the built-in collectors in a fixed precedence order, each outcome
//! appended and exported as soon as it returns so partial progress
//! survives a later failure. No retries anywhere; a collector failure is a
//! recorded outcome, never an abort.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::capabilities::{Capabilities, DnsRecordType};
use crate::collectors::{device_search, domain, filemeta, geoip, ocr, scrape, search};
use crate::config::RunConfig;
use crate::correlate::correlate;
use crate::export::Exporter;
use crate::models::{CollectorOutcome, RunRecord};
use crate::plugins::PluginRegistry;
use crate::policy::RequestPolicy;

/// One pipeline invocation. Presence of a field activates the
/// corresponding collector(s); an empty request still produces a sealed
/// (empty) run summary.
#[derive(Debug, Default, Clone)]
pub struct RunRequest {
    pub query: Option<String>,
    pub domain: Option<String>,
    pub ip: Option<String>,
    pub url: Option<String>,
    pub metadata_file: Option<PathBuf>,
    pub ocr_file: Option<PathBuf>,
    /// WHOIS runs iff explicitly requested (see the domain collector).
    pub whois: bool,
    pub dns: bool,
    pub device_search: bool,
    pub scrape: bool,
}

pub struct Orchestrator {
    config: RunConfig,
    policy: RequestPolicy,
    capabilities: Capabilities,
    registry: PluginRegistry,
}

impl Orchestrator {
    pub fn new(
        config: RunConfig,
        policy: RequestPolicy,
        capabilities: Capabilities,
        registry: PluginRegistry,
    ) -> Self {
        Orchestrator { config, policy, capabilities, registry }
    }

    /// Drive the collection phase to completion and return the sealed
    /// record. The run always completes and always produces a summary,
    /// even if every collector failed.
    pub fn run(&self, request: &RunRequest) -> Result<RunRecord> {
        let mut record = RunRecord::start();
        let mut exporter = Exporter::new(self.config.output_dir.clone());
        info!("Starting OSINT run {}", record.run_id);

        // Plugins append before any built-in collector runs
        self.registry.register_all(&self.config, &mut record);

        // Fixed precedence order: deterministic output ordering, not a
        // technical necessity.
        if let Some(query) = &request.query {
            let outcome = search::collect(query, &self.config, &self.policy, &*self.capabilities.http);
            let name = format!("search_{}", short_hash(query));
            self.record_outcome(&mut record, &mut exporter, outcome, &name);
        }

        if let Some(domain_name) = &request.domain {
            if request.whois {
                let outcome =
                    domain::collect_whois(domain_name, &self.policy, &*self.capabilities.whois);
                let name = format!("whois_{}", domain_name);
                self.record_outcome(&mut record, &mut exporter, outcome, &name);
            }
            if request.dns {
                for record_type in [DnsRecordType::A, DnsRecordType::Mx] {
                    let outcome = domain::collect_dns(
                        domain_name,
                        record_type,
                        &self.policy,
                        &*self.capabilities.dns,
                    );
                    let name = format!(
                        "dns_{}_{}",
                        record_type.label().to_lowercase(),
                        domain_name
                    );
                    self.record_outcome(&mut record, &mut exporter, outcome, &name);
                }
            }
        }

        if let Some(ip) = &request.ip {
            let outcome = geoip::collect(ip, &self.config, &self.policy, &*self.capabilities.http);
            let name = format!("ip_{}", sanitize_ip(ip));
            self.record_outcome(&mut record, &mut exporter, outcome, &name);
        }

        if request.device_search {
            if let Some(query) = &request.query {
                let outcome = device_search::collect(
                    query,
                    &self.config,
                    &self.policy,
                    &*self.capabilities.http,
                );
                let name = format!("device_search_{}", short_hash(query));
                self.record_outcome(&mut record, &mut exporter, outcome, &name);
            }
        }

        if request.scrape {
            if let Some(url) = &request.url {
                let outcome = scrape::collect(url, &self.config, &self.policy, &*self.capabilities.http);
                let name = format!("scrape_{}", short_hash(url));
                self.record_outcome(&mut record, &mut exporter, outcome, &name);
            }
        }

        if let Some(path) = &request.metadata_file {
            let outcome = filemeta::collect(path);
            let name = format!("metadata_{}", file_stem(path));
            self.record_outcome(&mut record, &mut exporter, outcome, &name);
        }

        if let Some(path) = &request.ocr_file {
            let outcome = ocr::collect(path, &self.capabilities.ocr);
            let name = format!("ocr_{}", file_stem(path));
            self.record_outcome(&mut record, &mut exporter, outcome, &name);
        }

        // Collection is done: correlate over the read-only entries, seal,
        // and persist the full record.
        let correlation = correlate(&record.entries);
        record.seal(correlation);

        exporter
            .export_json(&record.correlation, "correlation")
            .context("Failed to export correlation index")?;
        exporter
            .export_json(&record, "run_summary")
            .context("Failed to export run summary")?;
        if let Err(e) = exporter.export_csv(&entry_rows(&record), "entries") {
            warn!("Failed to export entries table: {}", e);
        }

        if self.config.encrypt_results {
            match &self.config.encryption_key {
                Some(key) => exporter.encrypt_produced(key),
                // Already-produced plaintext artifacts stay valid.
                None => error!("encrypt_results is set but no encryption_key is configured"),
            }
        }

        info!(
            "OSINT run {} completed: {} entries, {} correlated tokens",
            record.run_id,
            record.entries.len(),
            record.correlation.len()
        );
        Ok(record)
    }

    /// Streaming append: export the outcome immediately, then record it.
    /// An export error is logged; it never drops the entry.
    fn record_outcome(
        &self,
        record: &mut RunRecord,
        exporter: &mut Exporter,
        outcome: CollectorOutcome,
        artifact: &str,
    ) {
        if let Err(e) = exporter.export_json(&outcome, artifact) {
            warn!("Failed to export artifact '{}': {}", artifact, e);
        }
        record.append(outcome);
    }
}

/// One tabular row per entry for the `entries.csv` artifact.
fn entry_rows(record: &RunRecord) -> Vec<BTreeMap<String, Value>> {
    record
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            BTreeMap::from([
                ("index".to_string(), json!(index)),
                ("kind".to_string(), json!(entry.kind.to_string())),
                ("target".to_string(), json!(entry.target)),
                (
                    "status".to_string(),
                    json!(if entry.is_success() { "ok" } else { "failed" }),
                ),
            ])
        })
        .collect()
}

/// First 8 hex digits of the SHA-256 of a free-text target; keeps artifact
/// names deterministic without leaking the full query into the filename.
fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    format!("{:x}", digest)[..8].to_string()
}

fn sanitize_ip(ip: &str) -> String {
    ip.replace(['.', ':'], "_")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_is_deterministic() {
        assert_eq!(short_hash("example query"), short_hash("example query"));
        assert_ne!(short_hash("one"), short_hash("two"));
        assert_eq!(short_hash("anything").len(), 8);
    }

    #[test]
    fn test_sanitize_ip_handles_v4_and_v6() {
        assert_eq!(sanitize_ip("8.8.8.8"), "8_8_8_8");
        assert_eq!(sanitize_ip("2001:db8::1"), "2001_db8__1");
    }

    #[test]
    fn test_file_stem_fallback() {
        assert_eq!(file_stem(Path::new("/tmp/report.pdf")), "report");
        assert_eq!(file_stem(Path::new("/")), "file");
    }

    #[test]
    fn test_entry_rows_cover_all_entries() {
        let mut record = RunRecord::start();
        record.append(CollectorOutcome::success(
            crate::models::OutcomeKind::Search,
            "q",
            json!({}),
        ));
        record.append(CollectorOutcome::failure(
            crate::models::OutcomeKind::Whois,
            "example.com",
            crate::errors::CollectorError::network("down"),
        ));

        let rows = entry_rows(&record);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["status"], json!("ok"));
        assert_eq!(rows[1]["status"], json!("failed"));
        assert_eq!(rows[1]["index"], json!(1));
    }
}
