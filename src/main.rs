use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use osint_collector::capabilities::Capabilities;
use osint_collector::cli::{Args, Commands};
use osint_collector::config::{load_or_create_config, RunConfig};
use osint_collector::orchestrator::{Orchestrator, RunRequest};
use osint_collector::plugins::PluginRegistry;
use osint_collector::policy::RequestPolicy;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    info!("Starting OSINT collection run");

    // Load configuration and apply CLI overrides
    let config = load_and_process_config(&args)?;

    // Resolve policy, external capabilities, and plugins once
    let policy = RequestPolicy::from_config(&config);
    let capabilities =
        Capabilities::resolve(&policy).context("Failed to resolve collector capabilities")?;
    let registry = PluginRegistry::discover(&config);

    let output_dir = config.output_dir.clone();
    let orchestrator = Orchestrator::new(config, policy, capabilities, registry);
    let record = orchestrator.run(&build_request(&args))?;

    info!(
        "OSINT run completed: {} entries, outputs in {}",
        record.entries.len(),
        output_dir.display()
    );
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-config)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            RunConfig::create_default_config_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}

/// Load configuration and fold in CLI overrides. The result is immutable
/// for the duration of the run.
fn load_and_process_config(args: &Args) -> Result<RunConfig> {
    let mut config = load_or_create_config(args.config.as_deref())?;
    if args.use_proxy {
        config.use_proxy = true;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    Ok(config)
}

/// Map CLI flags onto the run request.
fn build_request(args: &Args) -> RunRequest {
    RunRequest {
        query: args.query.clone(),
        domain: args.domain.clone(),
        ip: args.ip.clone(),
        url: args.url.clone(),
        metadata_file: args.metadata.clone(),
        ocr_file: args.ocr.clone(),
        whois: args.whois,
        dns: args.dns,
        device_search: args.device_search,
        scrape: args.scrape,
    }
}
