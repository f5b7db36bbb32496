use std::time::Duration;

use anyhow::{Context, Result};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::Resolver;

use crate::errors::CollectorError;

const DNS_TIMEOUT: Duration = Duration::from_secs(10);

/// Record types the domain collector asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsRecordType {
    A,
    Mx,
}

impl DnsRecordType {
    pub fn label(&self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::Mx => "MX",
        }
    }
}

impl From<DnsRecordType> for RecordType {
    fn from(rt: DnsRecordType) -> Self {
        match rt {
            DnsRecordType::A => RecordType::A,
            DnsRecordType::Mx => RecordType::MX,
        }
    }
}

/// One bounded DNS lookup, answers returned in text form.
pub trait DnsLookup {
    fn resolve(&self, name: &str, record_type: DnsRecordType)
        -> Result<Vec<String>, CollectorError>;
}

/// Synchronous resolver using the system's upstream servers.
pub struct HickoryDns {
    resolver: Resolver,
}

impl HickoryDns {
    pub fn new() -> Result<Self> {
        let mut opts = ResolverOpts::default();
        opts.timeout = DNS_TIMEOUT;
        let resolver = Resolver::new(ResolverConfig::default(), opts)
            .context("Failed to construct DNS resolver")?;
        Ok(HickoryDns { resolver })
    }
}

impl DnsLookup for HickoryDns {
    fn resolve(
        &self,
        name: &str,
        record_type: DnsRecordType,
    ) -> Result<Vec<String>, CollectorError> {
        let lookup = self
            .resolver
            .lookup(name, record_type.into())
            .map_err(|e| {
                CollectorError::network(format!(
                    "{} lookup for {} failed: {}",
                    record_type.label(),
                    name,
                    e
                ))
            })?;

        Ok(lookup.iter().map(|rdata| rdata.to_string()).collect())
    }
}
