use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode, ColorChoice};

use bucket_collector::cli::{Args, Commands};
use bucket_collector::cloud::client::build_client_pairs;
use bucket_collector::collectors::collector::{collect_buckets, CollectionOutcome};
use bucket_collector::collectors::failure_report::FailureReport;
use bucket_collector::config::{load_or_default, load_profiles_json, FleetConfig};
use bucket_collector::constants::{DEFAULT_PROFILES_FILE, REPORT_FILE_PREFIX, REPORT_TIMESTAMP_FORMAT};
use bucket_collector::utils::{report, summary};

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    info!("Starting fleet bucket collection");
    let start_time = Utc::now();

    let config = resolve_config(&args)?;

    // Build one client pair per (profile, region)
    let pairs = build_client_pairs(&config.profiles, &config.regions, config.credentials_file.as_deref());

    let outcome = collect_buckets(pairs, config.collector_options())?;

    FailureReport::new(&outcome.failures).report_failures();

    if outcome.all_failed() {
        return Err(anyhow!(
            "All {} (profile, region) pairs failed; no report written",
            outcome.pairs_attempted
        ));
    }

    let timestamp = start_time.format(REPORT_TIMESTAMP_FORMAT).to_string();
    write_outputs(&config.output_dir, &timestamp, &start_time.to_rfc3339(), &outcome)?;

    info!("Fleet bucket collection completed successfully");
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

/// Handle subcommands
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            FleetConfig::create_default_config_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}

/// Merge config file, profiles file and command line into one validated configuration
fn resolve_config(args: &Args) -> Result<FleetConfig> {
    let mut config = load_or_default(args.config.as_deref())?;

    if let Some(profiles_file) = &args.profiles_file {
        config.profiles = load_profiles_json(profiles_file)?;
    } else if config.profiles.is_empty() && args.profiles.is_empty() {
        let default_file = Path::new(DEFAULT_PROFILES_FILE);
        if default_file.exists() {
            info!("Reading profiles from {}", default_file.display());
            config.profiles = load_profiles_json(default_file)?;
        }
    }

    args.apply_to(&mut config);
    config.validate()?;

    info!("Scanning {} profiles across {} regions", config.profiles.len(), config.regions.len());
    Ok(config)
}

/// Write the CSV report and the JSON run summary
fn write_outputs(output_dir: &Path, timestamp: &str, start_time: &str, outcome: &CollectionOutcome) -> Result<()> {
    let report_path = report::write_report(output_dir, timestamp, &outcome.records)?;
    let report_name = report_path.file_name().and_then(|n| n.to_str());

    if outcome.unknown_logging_count() > 0 {
        warn!("{} buckets have an unknown logging state", outcome.unknown_logging_count());
    }

    let summary_json = summary::create_run_summary(
        start_time,
        &Utc::now().to_rfc3339(),
        outcome,
        report_name,
    )?;
    let summary_path = output_dir.join(format!("{}-{}-summary.json", REPORT_FILE_PREFIX, timestamp));

    fs::write(&summary_path, &summary_json)
        .context("Failed to write run summary")?;

    info!("Run summary written to {}", summary_path.display());
    Ok(())
}
