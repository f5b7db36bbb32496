use log::{info, warn};
use serde_json::json;

use crate::capabilities::{DnsLookup, DnsRecordType, WhoisLookup};
use crate::models::{CollectorOutcome, OutcomeKind};
use crate::policy::RequestPolicy;

/// Run a WHOIS lookup for the domain.
///
/// WHOIS runs only when explicitly requested. The toolkit this replaces
/// ran it for every domain because of a default-on flag; explicit
/// activation is the intended contract.
pub fn collect_whois(
    domain: &str,
    policy: &RequestPolicy,
    whois: &dyn WhoisLookup,
) -> CollectorOutcome {
    policy.throttle();
    match whois.lookup(domain) {
        Ok(raw) => {
            info!("whois: {} bytes for {}", raw.len(), domain);
            CollectorOutcome::success(
                OutcomeKind::Whois,
                domain,
                json!({ "domain": domain, "raw": raw }),
            )
        }
        Err(err) => {
            warn!("whois failed for {}: {}", domain, err);
            CollectorOutcome::failure(OutcomeKind::Whois, domain, err)
        }
    }
}

/// Resolve one record type for the domain, answers in text form.
pub fn collect_dns(
    domain: &str,
    record_type: DnsRecordType,
    policy: &RequestPolicy,
    dns: &dyn DnsLookup,
) -> CollectorOutcome {
    policy.throttle();
    match dns.resolve(domain, record_type) {
        Ok(answers) => {
            info!(
                "dns: {} {} answers for {}",
                answers.len(),
                record_type.label(),
                domain
            );
            CollectorOutcome::success(
                OutcomeKind::Dns,
                domain,
                json!({
                    "domain": domain,
                    "record_type": record_type.label(),
                    "answers": answers,
                }),
            )
        }
        Err(err) => {
            warn!("dns {} failed for {}: {}", record_type.label(), domain, err);
            CollectorOutcome::failure(OutcomeKind::Dns, domain, err)
        }
    }
}
