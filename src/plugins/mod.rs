//! Extension plugins.
//!
//! Plugins append extra entries to the run record before the built-in
//! collectors run. The catalog is compiled in; the config names which
//! plugins are active for a run. This replaces dynamic code loading with
//! a static registry while keeping the same registration contract.

mod host_info;

pub use host_info::HostInfoPlugin;

use anyhow::Result;
use log::{info, warn};

use crate::config::RunConfig;
use crate::models::RunRecord;

/// An extension unit contributing entries to the live run record.
///
/// `register` is invoked once per run. A plugin returning an error is
/// logged and skipped; entries it appended before failing remain.
pub trait Plugin {
    fn name(&self) -> &str;
    fn register(&self, config: &RunConfig, record: &mut RunRecord) -> Result<()>;
}

/// The plugins activated for one run, in discovery order.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

fn catalog_lookup(name: &str) -> Option<Box<dyn Plugin>> {
    match name {
        "host-info" => Some(Box::new(HostInfoPlugin)),
        _ => None,
    }
}

impl PluginRegistry {
    /// Resolve the config-declared plugin names against the compiled-in
    /// catalog. Unknown names are non-fatal: logged and skipped.
    pub fn discover(config: &RunConfig) -> Self {
        let mut plugins = Vec::new();
        for name in &config.plugins {
            match catalog_lookup(name) {
                Some(plugin) => {
                    info!("Plugin loaded: {}", name);
                    plugins.push(plugin);
                }
                None => warn!("Unknown plugin '{}', skipping", name),
            }
        }
        PluginRegistry { plugins }
    }

    /// Registry with an explicit plugin list (used by tests and embedders).
    pub fn with_plugins(plugins: Vec<Box<dyn Plugin>>) -> Self {
        PluginRegistry { plugins }
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Invoke every plugin against the live record, in discovery order.
    /// A plugin error never aborts the run.
    pub fn register_all(&self, config: &RunConfig, record: &mut RunRecord) {
        for plugin in &self.plugins {
            if let Err(e) = plugin.register(config, record) {
                warn!("Plugin '{}' registration error: {}", plugin.name(), e);
            }
        }
    }
}
