use std::thread;
use std::time::Duration;

use rand::seq::SliceRandom;

use crate::config::{RunConfig, DEFAULT_IDENTITIES};

/// Rate/identity policy shared by every network-bound collector.
///
/// Supplies a randomized client identity per request and enforces the
/// configured minimum delay between calls. The pause is a sequential,
/// non-overlapping sleep: this is politeness policy, not contention
/// control. Proxy routing is a static per-run value.
#[derive(Debug, Clone)]
pub struct RequestPolicy {
    identities: Vec<String>,
    delay: Duration,
    proxy: Option<String>,
}

impl RequestPolicy {
    pub fn from_config(config: &RunConfig) -> Self {
        let identities = if config.identity_pool.is_empty() {
            DEFAULT_IDENTITIES.iter().map(|s| s.to_string()).collect()
        } else {
            config.identity_pool.clone()
        };

        let delay = Duration::from_secs_f64(config.request_delay_seconds.max(0.0));

        let proxy = if config.use_proxy {
            Some(config.proxy_address.clone())
        } else {
            None
        };

        RequestPolicy { identities, delay, proxy }
    }

    /// Pick a client identity uniformly at random. The pool is guaranteed
    /// non-empty, so this never returns an unset identity.
    pub fn next_identity(&self) -> &str {
        self.identities
            .choose(&mut rand::thread_rng())
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_IDENTITIES[0])
    }

    /// Block for the configured inter-request delay.
    pub fn throttle(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    /// Proxy address applied to every collector transport for the run,
    /// when proxy routing is enabled.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_with(pool: Vec<String>, delay: f64, use_proxy: bool) -> RequestPolicy {
        let mut config = RunConfig::default();
        config.identity_pool = pool;
        config.request_delay_seconds = delay;
        config.use_proxy = use_proxy;
        RequestPolicy::from_config(&config)
    }

    #[test]
    fn test_identity_always_from_pool() {
        let pool = vec!["agent-a".to_string(), "agent-b".to_string()];
        let policy = policy_with(pool.clone(), 0.0, false);
        for _ in 0..50 {
            let identity = policy.next_identity();
            assert!(pool.iter().any(|p| p == identity));
        }
    }

    #[test]
    fn test_empty_pool_falls_back_to_defaults() {
        let policy = policy_with(Vec::new(), 0.0, false);
        let identity = policy.next_identity();
        assert!(DEFAULT_IDENTITIES.contains(&identity));
    }

    #[test]
    fn test_negative_delay_clamped_to_zero() {
        let policy = policy_with(Vec::new(), -5.0, false);
        assert!(policy.delay().is_zero());
        // Must return immediately
        policy.throttle();
    }

    #[test]
    fn test_proxy_disabled_by_default() {
        let policy = policy_with(Vec::new(), 0.0, false);
        assert!(policy.proxy().is_none());
    }

    #[test]
    fn test_proxy_enabled_uses_configured_address() {
        let policy = policy_with(Vec::new(), 0.0, true);
        assert_eq!(policy.proxy(), Some("socks5h://127.0.0.1:9050"));
    }
}
