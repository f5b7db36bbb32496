use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Serialize, Deserialize};

/// Stock client identities used when the configured pool is empty.
pub const DEFAULT_IDENTITIES: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:117.0) Gecko/20100101 Firefox/117.0",
    "curl/7.68.0",
];

/// Immutable configuration for one pipeline run.
///
/// Loaded once from YAML (or built from defaults), optionally overridden by
/// CLI flags before the run starts, and never written to afterwards.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RunConfig {
    /// Pool of client identity strings (user agents) rotated per request.
    #[serde(default = "default_identity_pool")]
    pub identity_pool: Vec<String>,

    /// Route all collector transports through the configured proxy.
    #[serde(default)]
    pub use_proxy: bool,

    /// Proxy address applied uniformly when `use_proxy` is set.
    #[serde(default = "default_proxy_address")]
    pub proxy_address: String,

    /// Minimum delay between network-bound collector calls, in seconds.
    #[serde(default = "default_request_delay")]
    pub request_delay_seconds: f64,

    /// API key for the device-search service. Absent means the collector
    /// records a configuration failure instead of calling out.
    #[serde(default)]
    pub device_search_api_key: Option<String>,

    /// Token for the IP geolocation service. Absent degrades to the
    /// unauthenticated endpoint.
    #[serde(default)]
    pub geo_ip_token: Option<String>,

    /// Directory all artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Encrypt every structured artifact produced during the run.
    #[serde(default)]
    pub encrypt_results: bool,

    /// Symmetric passphrase; required iff `encrypt_results` is set.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Names of plugins to activate from the compiled-in catalog.
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Cap on extracted search results per query.
    #[serde(default = "default_search_max_results")]
    pub search_max_results: usize,

    /// Cap on extracted body text per scraped page, in characters.
    #[serde(default = "default_scrape_max_chars")]
    pub scrape_max_chars: usize,
}

fn default_identity_pool() -> Vec<String> {
    DEFAULT_IDENTITIES.iter().map(|s| s.to_string()).collect()
}

fn default_proxy_address() -> String {
    "socks5h://127.0.0.1:9050".to_string()
}

fn default_request_delay() -> f64 {
    1.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("osint_output")
}

fn default_search_max_results() -> usize {
    8
}

fn default_scrape_max_chars() -> usize {
    100_000
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            identity_pool: default_identity_pool(),
            use_proxy: false,
            proxy_address: default_proxy_address(),
            request_delay_seconds: default_request_delay(),
            device_search_api_key: None,
            geo_ip_token: None,
            output_dir: default_output_dir(),
            encrypt_results: false,
            encryption_key: None,
            plugins: Vec::new(),
            search_max_results: default_search_max_results(),
            scrape_max_chars: default_scrape_max_chars(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: RunConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        RunConfig::default().save_to_yaml_file(path)
    }
}

/// Load a configuration file or fall back to defaults.
///
/// If a path is given and exists it is loaded (parse errors are fatal);
/// a given-but-missing path gets a default file written so the next run
/// picks it up. No path at all means plain defaults.
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<RunConfig> {
    match config_path {
        Some(path) if path.exists() => RunConfig::from_yaml_file(path),
        Some(path) => {
            info!("Config {} not found, creating default", path.display());
            let config = RunConfig::default();
            config.save_to_yaml_file(path)?;
            Ok(config)
        }
        None => Ok(RunConfig::default()),
    }
}
