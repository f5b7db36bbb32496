//! End-to-end pipeline scenarios with stubbed external capabilities.
//!
//! These tests drive the orchestrator through whole runs — plugins,
//! collectors, correlation, export, encryption — without touching the
//! network.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use tempfile::TempDir;

use osint_collector::capabilities::{
    Capabilities, DnsLookup, DnsRecordType, HttpFetch, HttpResponse, OcrCapability, WhoisLookup,
};
use osint_collector::config::RunConfig;
use osint_collector::errors::CollectorError;
use osint_collector::export::decrypt_file;
use osint_collector::models::OutcomeKind;
use osint_collector::orchestrator::{Orchestrator, RunRequest};
use osint_collector::plugins::PluginRegistry;
use osint_collector::policy::RequestPolicy;

/// HTTP stub routing on the request URL, so one stub serves search,
/// scrape, geolocation, and device-search.
struct StubHttp;

impl HttpFetch for StubHttp {
    fn get(&self, url: &str, _identity: &str) -> Result<HttpResponse, CollectorError> {
        if url.contains("duckduckgo") {
            Ok(HttpResponse {
                status: 200,
                content_type: Some("text/html".to_string()),
                body: r#"<a class="result__a" href="https://hit.example/">A hit</a>"#.to_string(),
            })
        } else if url.contains("ipinfo.io") {
            Ok(HttpResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: r#"{"ip": "8.8.8.8", "city": "Mountain View"}"#.to_string(),
            })
        } else {
            // Scrape target
            Ok(HttpResponse {
                status: 200,
                content_type: Some("text/html".to_string()),
                body: "<html><head><title>Contact</title></head>\
                       <body>contact me at a@b.com or 5551234567</body></html>"
                    .to_string(),
            })
        }
    }
}

struct FailingWhois;

impl WhoisLookup for FailingWhois {
    fn lookup(&self, domain: &str) -> Result<String, CollectorError> {
        Err(CollectorError::network(format!(
            "whois query for {} timed out",
            domain
        )))
    }
}

struct OkWhois;

impl WhoisLookup for OkWhois {
    fn lookup(&self, domain: &str) -> Result<String, CollectorError> {
        Ok(format!("Domain Name: {}\nRegistrar: Stub Registry", domain))
    }
}

struct OkDns;

impl DnsLookup for OkDns {
    fn resolve(
        &self,
        _name: &str,
        record_type: DnsRecordType,
    ) -> Result<Vec<String>, CollectorError> {
        match record_type {
            DnsRecordType::A => Ok(vec!["192.0.2.10".to_string()]),
            DnsRecordType::Mx => Ok(vec!["10 mail.example.com.".to_string()]),
        }
    }
}

fn stub_capabilities(whois_fails: bool) -> Capabilities {
    Capabilities {
        http: Box::new(StubHttp),
        whois: if whois_fails { Box::new(FailingWhois) } else { Box::new(OkWhois) },
        dns: Box::new(OkDns),
        ocr: OcrCapability::Unavailable("not built".to_string()),
    }
}

fn test_config(output_dir: &Path) -> RunConfig {
    let mut config = RunConfig::default();
    config.output_dir = output_dir.to_path_buf();
    config.request_delay_seconds = 0.0;
    config
}

fn orchestrator_for(config: RunConfig, whois_fails: bool) -> Orchestrator {
    let policy = RequestPolicy::from_config(&config);
    let registry = PluginRegistry::discover(&config);
    Orchestrator::new(config, policy, stub_capabilities(whois_fails), registry)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// A request activating nothing still yields a sealed, exported summary
/// with empty entries and an empty correlation mapping.
#[test]
fn test_empty_request_produces_sealed_empty_summary() -> Result<()> {
    let dir = TempDir::new()?;
    let orchestrator = orchestrator_for(test_config(dir.path()), false);

    let record = orchestrator.run(&RunRequest::default())?;

    assert!(record.entries.is_empty());
    assert!(record.correlation.is_empty());
    assert!(record.is_sealed());

    let summary = read_json(&dir.path().join("run_summary.json"));
    assert_eq!(summary["entries"].as_array().unwrap().len(), 0);
    Ok(())
}

/// WHOIS timing out must not abort the run: the summary carries one
/// whois failure entry and the DNS successes, and is sealed.
#[test]
fn test_whois_failure_dns_success_still_seals() -> Result<()> {
    let dir = TempDir::new()?;
    let orchestrator = orchestrator_for(test_config(dir.path()), true);

    let record = orchestrator.run(&RunRequest {
        domain: Some("example.com".to_string()),
        whois: true,
        dns: true,
        ..Default::default()
    })?;

    assert!(record.is_sealed());
    assert_eq!(record.entries.len(), 3); // whois + DNS A + DNS MX

    let whois_entries: Vec<_> = record
        .entries
        .iter()
        .filter(|e| e.kind == OutcomeKind::Whois)
        .collect();
    assert_eq!(whois_entries.len(), 1);
    assert!(!whois_entries[0].is_success());

    let dns_entries: Vec<_> = record
        .entries
        .iter()
        .filter(|e| e.kind == OutcomeKind::Dns)
        .collect();
    assert_eq!(dns_entries.len(), 2);
    assert!(dns_entries.iter().all(|e| e.is_success()));

    // Failure is inspectable in the persisted summary too
    let summary = read_json(&dir.path().join("run_summary.json"));
    let first = &summary["entries"][0];
    assert_eq!(first["kind"], "whois");
    assert!(first["failure"]["message"]
        .as_str()
        .unwrap()
        .contains("timed out"));
    Ok(())
}

/// Entries appear in the fixed precedence order regardless of outcome.
#[test]
fn test_fixed_precedence_ordering() -> Result<()> {
    let dir = TempDir::new()?;
    let orchestrator = orchestrator_for(test_config(dir.path()), true);

    let record = orchestrator.run(&RunRequest {
        query: Some("target corp".to_string()),
        domain: Some("example.com".to_string()),
        ip: Some("8.8.8.8".to_string()),
        url: Some("https://page.example/contact".to_string()),
        whois: true,
        dns: true,
        scrape: true,
        ..Default::default()
    })?;

    let kinds: Vec<OutcomeKind> = record.entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            OutcomeKind::Search,
            OutcomeKind::Whois,
            OutcomeKind::Dns,
            OutcomeKind::Dns,
            OutcomeKind::GeoIp,
            OutcomeKind::Scrape,
        ]
    );
    Ok(())
}

/// Every entry carries exactly one of payload/failure.
#[test]
fn test_exactly_one_of_payload_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let orchestrator = orchestrator_for(test_config(dir.path()), true);

    let record = orchestrator.run(&RunRequest {
        query: Some("q".to_string()),
        domain: Some("example.com".to_string()),
        whois: true,
        dns: true,
        ocr_file: Some(dir.path().join("missing.png")),
        ..Default::default()
    })?;

    assert!(!record.entries.is_empty());
    for entry in &record.entries {
        assert_ne!(
            entry.payload.is_some(),
            entry.failure.is_some(),
            "entry for {} must have exactly one of payload/failure",
            entry.target
        );
    }
    Ok(())
}

/// The scraped page's email-like and phone-like tokens end up in the
/// correlation index, keyed to the page URL.
#[test]
fn test_correlation_from_scraped_page() -> Result<()> {
    let dir = TempDir::new()?;
    let orchestrator = orchestrator_for(test_config(dir.path()), false);

    let url = "https://page.example/contact";
    let record = orchestrator.run(&RunRequest {
        url: Some(url.to_string()),
        scrape: true,
        ..Default::default()
    })?;

    assert_eq!(record.correlation["a@b.com"], vec![url.to_string()]);
    assert_eq!(record.correlation["5551234567"], vec![url.to_string()]);

    let exported = read_json(&dir.path().join("correlation.json"));
    assert_eq!(exported["a@b.com"][0], url);
    Ok(())
}

/// Per-outcome artifacts are written as each collector returns, with
/// deterministic names.
#[test]
fn test_per_outcome_artifacts_exist() -> Result<()> {
    let dir = TempDir::new()?;
    let orchestrator = orchestrator_for(test_config(dir.path()), false);

    orchestrator.run(&RunRequest {
        domain: Some("example.com".to_string()),
        ip: Some("8.8.8.8".to_string()),
        whois: true,
        dns: true,
        ..Default::default()
    })?;

    assert!(dir.path().join("whois_example.com.json").exists());
    assert!(dir.path().join("dns_a_example.com.json").exists());
    assert!(dir.path().join("dns_mx_example.com.json").exists());
    assert!(dir.path().join("ip_8_8_8_8.json").exists());
    assert!(dir.path().join("correlation.json").exists());
    assert!(dir.path().join("run_summary.json").exists());
    assert!(dir.path().join("entries.csv").exists());
    Ok(())
}

/// With encryption enabled, every JSON artifact gains an `.enc` sibling
/// that decrypts back to the plaintext; the plaintext stays on disk.
#[test]
fn test_encrypted_run_artifacts() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = test_config(dir.path());
    config.encrypt_results = true;
    config.encryption_key = Some("run passphrase".to_string());
    let orchestrator = orchestrator_for(config, false);

    orchestrator.run(&RunRequest {
        domain: Some("example.com".to_string()),
        dns: true,
        ..Default::default()
    })?;

    for name in ["dns_a_example.com", "dns_mx_example.com", "correlation", "run_summary"] {
        let plain = dir.path().join(format!("{}.json", name));
        let enc = dir.path().join(format!("{}.json.enc", name));
        assert!(plain.exists(), "{} plaintext must remain", name);
        assert!(enc.exists(), "{} must have an encrypted sibling", name);

        let decrypted = decrypt_file(&enc, "run passphrase")?;
        assert_eq!(decrypted, fs::read(&plain)?);
        assert!(decrypt_file(&enc, "wrong passphrase").is_err());
    }
    Ok(())
}

/// Encryption enabled without a key is reported but leaves the plaintext
/// artifacts valid and the run completed.
#[test]
fn test_missing_encryption_key_is_nonfatal() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = test_config(dir.path());
    config.encrypt_results = true;
    config.encryption_key = None;
    let orchestrator = orchestrator_for(config, false);

    let record = orchestrator.run(&RunRequest {
        domain: Some("example.com".to_string()),
        dns: true,
        ..Default::default()
    })?;

    assert!(record.is_sealed());
    assert!(dir.path().join("run_summary.json").exists());
    assert!(!dir.path().join("run_summary.json.enc").exists());
    Ok(())
}

/// Plugin entries land before any built-in collector output.
#[test]
fn test_plugin_entries_precede_collectors() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = test_config(dir.path());
    config.plugins = vec!["host-info".to_string()];
    let orchestrator = orchestrator_for(config, false);

    let record = orchestrator.run(&RunRequest {
        query: Some("anything".to_string()),
        ..Default::default()
    })?;

    assert_eq!(record.entries.len(), 2);
    assert_eq!(record.entries[0].kind, OutcomeKind::Plugin);
    assert_eq!(record.entries[1].kind, OutcomeKind::Search);
    Ok(())
}

/// Device search without a configured key records a configuration
/// failure entry but the run still completes.
#[test]
fn test_device_search_without_key_is_recorded() -> Result<()> {
    let dir = TempDir::new()?;
    let orchestrator = orchestrator_for(test_config(dir.path()), false);

    let record = orchestrator.run(&RunRequest {
        query: Some("apache".to_string()),
        device_search: true,
        ..Default::default()
    })?;

    let device_entry = record
        .entries
        .iter()
        .find(|e| e.kind == OutcomeKind::DeviceSearch)
        .expect("device-search entry should be recorded");
    assert!(!device_entry.is_success());
    assert!(record.is_sealed());
    Ok(())
}
