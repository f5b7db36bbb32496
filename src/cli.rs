use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the OSINT collection pipeline.
///
/// One run drives any subset of the collectors: presence of a target flag
/// activates its collector(s). Options that override configuration values
/// (proxy, output directory) are applied before the run starts.
#[derive(Parser, Debug)]
#[clap(name = "osint-collector", about = "Modular OSINT collection and correlation pipeline")]
pub struct Args {
    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Free-text query for search (and device-search when enabled)
    #[clap(short, long)]
    pub query: Option<String>,

    /// Domain to analyze
    #[clap(long)]
    pub domain: Option<String>,

    /// IP literal (v4 or v6) to geolocate
    #[clap(long)]
    pub ip: Option<String>,

    /// URL for the scrape collector
    #[clap(long)]
    pub url: Option<String>,

    /// Run a WHOIS lookup for the domain
    #[clap(long)]
    pub whois: bool,

    /// Run DNS lookups (A and MX) for the domain
    #[clap(long)]
    pub dns: bool,

    /// Run a device search for the query (requires an API key in config)
    #[clap(long)]
    pub device_search: bool,

    /// Scrape the provided URL
    #[clap(long)]
    pub scrape: bool,

    /// Extract metadata from a local file (PDF or image)
    #[clap(long)]
    pub metadata: Option<PathBuf>,

    /// Run text recognition over a local image file
    #[clap(long)]
    pub ocr: Option<PathBuf>,

    /// Route all requests through the configured proxy
    #[clap(long)]
    pub use_proxy: bool,

    /// Output directory (overrides the configured one)
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "config.yaml")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_basic_args_parsing() {
        let args = Args::parse_from(&[
            "osint-collector",
            "--query", "john doe",
            "--output-dir", "/tmp/run",
            "--verbose",
        ]);

        assert_eq!(args.query, Some("john doe".to_string()));
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/run")));
        assert!(args.verbose);
        assert!(!args.use_proxy);
        assert!(!args.whois);
    }

    #[test]
    fn test_domain_analysis_args() {
        let args = Args::parse_from(&[
            "osint-collector",
            "--domain", "example.com",
            "--whois",
            "--dns",
        ]);

        assert_eq!(args.domain, Some("example.com".to_string()));
        assert!(args.whois);
        assert!(args.dns);
        assert!(!args.scrape);
    }

    #[test]
    fn test_scrape_and_file_args() {
        let args = Args::parse_from(&[
            "osint-collector",
            "--url", "https://example.com/about",
            "--scrape",
            "--metadata", "/tmp/report.pdf",
            "--ocr", "/tmp/photo.png",
        ]);

        assert_eq!(args.url, Some("https://example.com/about".to_string()));
        assert!(args.scrape);
        assert_eq!(args.metadata, Some(PathBuf::from("/tmp/report.pdf")));
        assert_eq!(args.ocr, Some(PathBuf::from("/tmp/photo.png")));
    }

    #[test]
    fn test_default_values() {
        let args = Args::parse_from(&["osint-collector"]);

        assert!(args.query.is_none());
        assert!(args.domain.is_none());
        assert!(args.ip.is_none());
        assert!(!args.verbose);
        assert!(!args.device_search);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_proxy_and_config_args() {
        let args = Args::parse_from(&[
            "osint-collector",
            "--config", "/etc/osint/config.yaml",
            "--use-proxy",
            "--ip", "8.8.8.8",
        ]);

        assert_eq!(args.config, Some(PathBuf::from("/etc/osint/config.yaml")));
        assert!(args.use_proxy);
        assert_eq!(args.ip, Some("8.8.8.8".to_string()));
    }

    #[test]
    fn test_init_config_subcommand() {
        let args = Args::parse_from(&[
            "osint-collector",
            "init-config",
            "custom-config.yaml",
        ]);

        match args.command {
            Some(Commands::InitConfig { path }) => {
                assert_eq!(path, PathBuf::from("custom-config.yaml"));
            }
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_init_config_default_path() {
        let args = Args::parse_from(&["osint-collector", "init-config"]);

        match args.command {
            Some(Commands::InitConfig { path }) => {
                assert_eq!(path, PathBuf::from("config.yaml"));
            }
            _ => panic!("Expected InitConfig command"),
        }
    }
}
