use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::collectors::collector::CollectorOptions;
use crate::constants::{
    default_concurrent_pairs, DEFAULT_CONCURRENT_LOOKUPS, DEFAULT_OUTPUT_DIR, DEFAULT_REGIONS,
    DESCRIBE_BUCKETS_PAGE_SIZE, MAX_DESCRIBE_BUCKETS_PAGE_SIZE,
};

/// Run configuration for a fleet scan
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FleetConfig {
    #[serde(default)]
    pub profiles: Vec<String>,
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_concurrent_pairs")]
    pub max_concurrent_pairs: usize,
    #[serde(default = "default_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
    /// Seconds after which unfinished pairs are cancelled
    #[serde(default)]
    pub deadline_secs: Option<u64>,
    /// Shared credentials file; the provider's usual lookup when unset
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_regions() -> Vec<String> {
    DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect()
}

fn default_page_size() -> i64 {
    DESCRIBE_BUCKETS_PAGE_SIZE
}

fn default_concurrent_lookups() -> usize {
    DEFAULT_CONCURRENT_LOOKUPS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for FleetConfig {
    fn default() -> Self {
        FleetConfig {
            profiles: Vec::new(),
            regions: default_regions(),
            page_size: default_page_size(),
            max_concurrent_pairs: default_concurrent_pairs(),
            max_concurrent_lookups: default_concurrent_lookups(),
            deadline_secs: None,
            credentials_file: None,
            output_dir: default_output_dir(),
        }
    }
}

impl FleetConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: FleetConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create directory {}", parent.display()))?;
            }
        }

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        FleetConfig::default().save_to_yaml_file(path)
    }

    /// Check the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            bail!("No profiles configured; pass --profile, --profiles-file or set `profiles` in the config");
        }
        if self.profiles.iter().any(|p| p.trim().is_empty()) {
            bail!("Profile names must not be blank");
        }
        if self.regions.is_empty() {
            bail!("No regions configured");
        }
        if !(1..=MAX_DESCRIBE_BUCKETS_PAGE_SIZE).contains(&self.page_size) {
            bail!("page_size must be between 1 and {}, got {}", MAX_DESCRIBE_BUCKETS_PAGE_SIZE, self.page_size);
        }
        if self.max_concurrent_pairs == 0 {
            bail!("max_concurrent_pairs must be at least 1");
        }
        if self.max_concurrent_lookups == 0 {
            bail!("max_concurrent_lookups must be at least 1");
        }
        if self.deadline_secs == Some(0) {
            bail!("deadline_secs must be at least 1 when set");
        }
        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Orchestrator tuning derived from this configuration
    pub fn collector_options(&self) -> CollectorOptions {
        CollectorOptions {
            page_size: self.page_size,
            max_concurrent_pairs: self.max_concurrent_pairs,
            max_concurrent_lookups: self.max_concurrent_lookups,
            deadline: self.deadline(),
        }
    }
}

/// Load a configuration file, or fall back to defaults when none is given.
///
/// A path that is given but missing is an error rather than a silent default.
pub fn load_or_default(config_path: Option<&Path>) -> Result<FleetConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file {} does not exist; create one with `init-config`", path.display());
            }
            FleetConfig::from_yaml_file(path)
        },
        None => {
            debug!("No config file given, using defaults");
            Ok(FleetConfig::default())
        }
    }
}
