use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::FleetConfig;

/// Command-line arguments for the bucket-collector tool.
///
/// Values given here override the ones loaded from the YAML config file.
#[derive(Parser, Debug)]
#[clap(name = "bucket-collector", about = "Fleet-wide S3 bucket compliance collector")]
pub struct Args {
    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// JSON file listing profiles as {"profiles": [...]}
    #[clap(long)]
    pub profiles_file: Option<PathBuf>,

    /// AWS profile to scan (repeatable)
    #[clap(short, long = "profile")]
    pub profiles: Vec<String>,

    /// AWS region to scan (repeatable)
    #[clap(short, long = "region")]
    pub regions: Vec<String>,

    /// Page size for bucket inventory requests (1-50)
    #[clap(long)]
    pub page_size: Option<i64>,

    /// Maximum number of (profile, region) pairs scanned at once
    #[clap(long)]
    pub max_concurrent_pairs: Option<usize>,

    /// Cancel unfinished pairs after this many seconds
    #[clap(long)]
    pub deadline_secs: Option<u64>,

    /// Shared credentials file to read profiles from
    #[clap(long)]
    pub credentials_file: Option<PathBuf>,

    /// Directory for the report and run summary
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// Overlay the values given on the command line onto `config`
    pub fn apply_to(&self, config: &mut FleetConfig) {
        if !self.profiles.is_empty() {
            config.profiles = self.profiles.clone();
        }
        if !self.regions.is_empty() {
            config.regions = self.regions.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(max_pairs) = self.max_concurrent_pairs {
            config.max_concurrent_pairs = max_pairs;
        }
        if let Some(deadline) = self.deadline_secs {
            config.deadline_secs = Some(deadline);
        }
        if let Some(credentials) = &self.credentials_file {
            config.credentials_file = Some(credentials.clone());
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
    }
}

/// Available subcommands for the collector.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "fleet.yaml")]
        path: PathBuf,
    },
}
