use std::net::IpAddr;
use std::str::FromStr;

use log::{info, warn};
use serde_json::Value;

use crate::capabilities::HttpFetch;
use crate::config::RunConfig;
use crate::errors::CollectorError;
use crate::models::{CollectorOutcome, OutcomeKind};
use crate::policy::RequestPolicy;

const GEO_ENDPOINT: &str = "https://ipinfo.io";

/// Geolocate one IP literal (v4 or v6).
///
/// A configured token is passed along; without one the free endpoint is
/// used as-is (limited, but functional).
pub fn collect(
    ip: &str,
    config: &RunConfig,
    policy: &RequestPolicy,
    http: &dyn HttpFetch,
) -> CollectorOutcome {
    match lookup(ip, config, policy, http) {
        Ok(payload) => {
            info!("geo-ip: resolved {}", ip);
            CollectorOutcome::success(OutcomeKind::GeoIp, ip, payload)
        }
        Err(err) => {
            warn!("geo-ip failed for {}: {}", ip, err);
            CollectorOutcome::failure(OutcomeKind::GeoIp, ip, err)
        }
    }
}

fn lookup(
    ip: &str,
    config: &RunConfig,
    policy: &RequestPolicy,
    http: &dyn HttpFetch,
) -> Result<Value, CollectorError> {
    IpAddr::from_str(ip)
        .map_err(|_| CollectorError::Validation(format!("'{}' is not a valid IP literal", ip)))?;

    let url = match &config.geo_ip_token {
        Some(token) => format!("{}/{}/json?token={}", GEO_ENDPOINT, ip, token),
        None => format!("{}/{}/json", GEO_ENDPOINT, ip),
    };

    policy.throttle();
    let response = http.get(&url, policy.next_identity())?;
    if !response.is_success() {
        return Err(CollectorError::http_status(response.status));
    }

    serde_json::from_str(&response.body)
        .map_err(|e| CollectorError::Parse(format!("geo response was not JSON: {}", e)))
}
