use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::errors::CollectorError;

const WHOIS_PORT: u16 = 43;
const WHOIS_TIMEOUT: Duration = Duration::from_secs(10);

/// One bounded WHOIS query for a domain, returning the raw response text.
pub trait WhoisLookup {
    fn lookup(&self, domain: &str) -> Result<String, CollectorError>;
}

/// Plain port-43 WHOIS client.
///
/// The registry server is picked from a small table keyed by TLD, with the
/// IANA server as the fallback. A single connection per invocation; no
/// referral chasing.
#[derive(Debug, Default)]
pub struct TcpWhois;

fn server_for(domain: &str) -> &'static str {
    let tld = domain.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match tld.as_str() {
        "com" | "net" => "whois.verisign-grs.com",
        "org" => "whois.publicinterestregistry.org",
        "io" => "whois.nic.io",
        "info" => "whois.nic.info",
        "dev" | "app" | "page" => "whois.nic.google",
        _ => "whois.iana.org",
    }
}

impl WhoisLookup for TcpWhois {
    fn lookup(&self, domain: &str) -> Result<String, CollectorError> {
        if domain.is_empty() || !domain.contains('.') {
            return Err(CollectorError::Validation(format!(
                "'{}' is not a plausible domain name",
                domain
            )));
        }

        let server = server_for(domain);
        let addr = (server, WHOIS_PORT)
            .to_socket_addrs()
            .map_err(|e| CollectorError::network(format!("failed to resolve {}: {}", server, e)))?
            .next()
            .ok_or_else(|| CollectorError::network(format!("no address for {}", server)))?;

        let mut stream = TcpStream::connect_timeout(&addr, WHOIS_TIMEOUT)
            .map_err(|e| CollectorError::network(format!("connect to {} failed: {}", server, e)))?;
        stream
            .set_read_timeout(Some(WHOIS_TIMEOUT))
            .and_then(|_| stream.set_write_timeout(Some(WHOIS_TIMEOUT)))
            .map_err(|e| CollectorError::network(format!("socket setup failed: {}", e)))?;

        stream
            .write_all(format!("{}\r\n", domain).as_bytes())
            .map_err(|e| CollectorError::network(format!("whois write failed: {}", e)))?;

        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .map_err(|e| CollectorError::network(format!("whois read failed: {}", e)))?;

        Ok(response)
    }
}
