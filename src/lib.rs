//! # osint-collector
//!
//! A modular OSINT collection and correlation pipeline.
//!
//! ## Overview
//!
//! One run fans a single request (query, domain, IP, URL, local files)
//! across a set of collectors, aggregates every outcome into an
//! append-only run record, derives a lexical correlation index over the
//! accumulated results, and persists the artifacts — optionally encrypted
//! at rest.
//!
//! ## Features
//!
//! - **Collectors**: web search, page scraping, WHOIS, DNS (A/MX),
//!   IP geolocation, device search, file metadata (PDF/EXIF), OCR
//! - **Rate/identity policy**: rotating client identities and a polite
//!   inter-request delay, with optional uniform proxy routing
//! - **Plugins**: compiled-in extension units that append entries to the
//!   live run record
//! - **Correlation**: repeated email-like and phone-like tokens indexed
//!   across independent sources
//! - **Export**: deterministic JSON artifacts, tabular CSV, and additive
//!   AES-256-GCM encryption of produced artifacts
//!
//! ## Usage
//!
//! ```no_run
//! use osint_collector::capabilities::Capabilities;
//! use osint_collector::config::RunConfig;
//! use osint_collector::orchestrator::{Orchestrator, RunRequest};
//! use osint_collector::plugins::PluginRegistry;
//! use osint_collector::policy::RequestPolicy;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = RunConfig::default();
//! let policy = RequestPolicy::from_config(&config);
//! let capabilities = Capabilities::resolve(&policy)?;
//! let registry = PluginRegistry::discover(&config);
//!
//! let orchestrator = Orchestrator::new(config, policy, capabilities, registry);
//! let record = orchestrator.run(&RunRequest {
//!     domain: Some("example.com".to_string()),
//!     dns: true,
//!     ..Default::default()
//! })?;
//!
//! println!("{} entries collected", record.entries.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Run record and collector outcome data model
//! - [`errors`]: Typed failure taxonomy for collectors
//! - [`config`]: YAML run configuration
//! - [`policy`]: Rate limiting and client identity rotation
//! - [`capabilities`]: External service seams (HTTP, WHOIS, DNS, OCR)
//! - [`collectors`]: One module per collector kind
//! - [`plugins`]: Compiled-in extension registry
//! - [`correlate`]: Lexical correlation engine
//! - [`export`]: Artifact export and at-rest encryption
//! - [`orchestrator`]: Fixed-precedence run sequencing
//!
//! ## Feature Flags
//!
//! - `ocr`: Compile in the tesseract-backed text recognition engine

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Run record and collector outcome data model
pub mod models;

/// Typed failure taxonomy for collectors and export
pub mod errors;

/// Configuration management
pub mod config;

/// Rate limiting and client identity rotation
pub mod policy;

/// External service capabilities (HTTP, WHOIS, DNS, OCR)
pub mod capabilities;

/// Collector implementations, one module per kind
pub mod collectors;

/// Compiled-in plugin registry
pub mod plugins;

/// Lexical cross-source correlation
pub mod correlate;

/// Artifact export and at-rest encryption
pub mod export;

/// Run orchestration and sequencing
pub mod orchestrator;
