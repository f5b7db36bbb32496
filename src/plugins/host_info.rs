use anyhow::Result;
use serde_json::json;

use crate::config::RunConfig;
use crate::models::{CollectorOutcome, OutcomeKind, RunRecord};
use crate::plugins::Plugin;

/// Built-in plugin recording where the run happened.
pub struct HostInfoPlugin;

impl Plugin for HostInfoPlugin {
    fn name(&self) -> &str {
        "host-info"
    }

    fn register(&self, _config: &RunConfig, record: &mut RunRecord) -> Result<()> {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        record.append(CollectorOutcome::success(
            OutcomeKind::Plugin,
            self.name(),
            json!({
                "hostname": host,
                "os": std::env::consts::OS,
                "collector_version": env!("CARGO_PKG_VERSION"),
            }),
        ));
        Ok(())
    }
}
