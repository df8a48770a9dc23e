use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use rusoto_core::{HttpClient, Region};
use rusoto_credential::ProfileProvider;
use rusoto_s3::S3Client;

use crate::cloud::macie::{BucketInventory, MacieInventoryClient};
use crate::cloud::s3::{BucketLoggingLookup, S3LoggingClient};
use crate::models::{FailureKind, PairFailure};

/// One (profile, region) scanning unit and its two API handles.
///
/// Moved into exactly one worker and dropped when that worker finishes.
pub struct ClientPair {
    profile: String,
    region: String,
    inventory: Box<dyn BucketInventory>,
    logging: Box<dyn BucketLoggingLookup>,
}

impl ClientPair {
    pub fn new(
        profile: &str,
        region: &str,
        inventory: Box<dyn BucketInventory>,
        logging: Box<dyn BucketLoggingLookup>,
    ) -> Self {
        ClientPair {
            profile: profile.to_string(),
            region: region.to_string(),
            inventory,
            logging,
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn inventory(&self) -> &dyn BucketInventory {
        self.inventory.as_ref()
    }

    pub fn logging(&self) -> &dyn BucketLoggingLookup {
        self.logging.as_ref()
    }

    /// `profile/region`, used in logs
    pub fn label(&self) -> String {
        format!("{}/{}", self.profile, self.region)
    }
}

impl fmt::Debug for ClientPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientPair")
            .field("profile", &self.profile)
            .field("region", &self.region)
            .finish()
    }
}

/// Client pairs that were built, plus a failure for every pair that was not
#[derive(Debug, Default)]
pub struct ClientPairs {
    pub pairs: Vec<ClientPair>,
    pub failures: Vec<PairFailure>,
}

impl ClientPairs {
    /// Number of (profile, region) combinations requested
    pub fn attempted(&self) -> usize {
        self.pairs.len() + self.failures.len()
    }
}

/// Parse a region name, rejecting anything rusoto does not know
pub fn parse_region(region_name: &str) -> Result<Region> {
    region_name.trim().parse::<Region>()
        .map_err(|e| anyhow!("Invalid region '{}': {}", region_name, e))
}

/// Build a credentials provider for a named profile.
///
/// Reads the default shared credentials file unless `credentials_file` is given.
/// The file itself is only read when credentials are first requested.
fn profile_provider(profile: &str, credentials_file: Option<&Path>) -> Result<ProfileProvider> {
    if profile.trim().is_empty() {
        return Err(anyhow!("Profile name is empty"));
    }

    let provider = match credentials_file {
        Some(path) => ProfileProvider::with_configuration(path, profile),
        None => {
            let mut provider = ProfileProvider::new()
                .map_err(|e| anyhow!("Failed to create AWS profile provider: {}", e))?;
            provider.set_profile(profile);
            provider
        }
    };

    Ok(provider)
}

/// Create the inventory and object-store clients for one (profile, region) pair.
///
/// No network calls are made here.
pub fn create_client_pair(profile: &str, region_name: &str, credentials_file: Option<&Path>) -> Result<ClientPair> {
    let region = parse_region(region_name)?;
    let provider = profile_provider(profile, credentials_file)?;

    let s3_http = HttpClient::new().context("Failed to create HTTP client for S3")?;
    let s3_client = S3Client::new_with(s3_http, provider.clone(), region.clone());

    let macie_http = HttpClient::new().context("Failed to create HTTP client for Macie")?;
    let macie_client = rusoto_core::Client::new_with(provider, macie_http);

    debug!("Created clients for {}/{}", profile, region.name());

    Ok(ClientPair::new(
        profile,
        region_name,
        Box::new(MacieInventoryClient::new(macie_client, region)),
        Box::new(S3LoggingClient::new(s3_client)),
    ))
}

/// Build the cross product of client pairs for the given profiles and regions.
///
/// A pair that cannot be built is recorded as a construction failure and
/// does not stop the remaining pairs from being built.
pub fn build_client_pairs(profiles: &[String], regions: &[String], credentials_file: Option<&Path>) -> ClientPairs {
    let mut output = ClientPairs::default();

    for profile in profiles {
        for region in regions {
            match create_client_pair(profile, region, credentials_file) {
                Ok(pair) => output.pairs.push(pair),
                Err(e) => {
                    warn!("Skipping {}/{}: {:#}", profile, region, e);
                    output.failures.push(PairFailure::new(
                        profile,
                        region,
                        FailureKind::Construction,
                        format!("{:#}", e),
                    ));
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(parse_region("us-east-1").unwrap(), Region::UsEast1);
        assert_eq!(parse_region("us-west-2").unwrap(), Region::UsWest2);
        assert!(parse_region("mars-north-1").is_err());
    }

    #[test]
    fn test_cross_product_is_built() {
        let temp_dir = TempDir::new().unwrap();
        let credentials = temp_dir.path().join("credentials");
        fs::write(&credentials, "[dev]\naws_access_key_id = A\naws_secret_access_key = B\n").unwrap();

        let output = build_client_pairs(
            &strings(&["dev", "prod"]),
            &strings(&["us-east-1", "us-west-2"]),
            Some(&credentials),
        );

        assert_eq!(output.pairs.len(), 4);
        assert!(output.failures.is_empty());
        assert_eq!(output.attempted(), 4);

        let labels: Vec<String> = output.pairs.iter().map(|p| p.label()).collect();
        assert!(labels.contains(&"dev/us-east-1".to_string()));
        assert!(labels.contains(&"prod/us-west-2".to_string()));
    }

    #[test]
    fn test_construction_failure_is_attributed_to_its_pair() {
        let temp_dir = TempDir::new().unwrap();
        let credentials = temp_dir.path().join("credentials");
        fs::write(&credentials, "").unwrap();

        let output = build_client_pairs(
            &strings(&["dev", " "]),
            &strings(&["us-east-1", "not-a-region"]),
            Some(&credentials),
        );

        assert_eq!(output.pairs.len(), 1);
        assert_eq!(output.pairs[0].label(), "dev/us-east-1");
        assert_eq!(output.failures.len(), 3);
        assert_eq!(output.attempted(), 4);
        assert!(output.failures.iter().all(|f| f.kind == FailureKind::Construction));
        assert!(output.failures.iter().any(|f| f.profile == "dev" && f.region == "not-a-region"));
        assert!(output.failures.iter().any(|f| f.profile == " " && f.region == "us-east-1"));
    }
}
