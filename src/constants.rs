//! Global constants for the bucket collector.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Fleet defaults
/// Regions scanned when neither the config file nor the command line names any
pub const DEFAULT_REGIONS: &[&str] = &["us-east-1", "us-east-2", "us-west-1", "us-west-2"];

/// Default profiles file, in the `{"profiles": [...]}` format
pub const DEFAULT_PROFILES_FILE: &str = "profiles.json";

/// Default output directory for reports and run summaries
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

// Inventory API constants
/// Page size hint for DescribeBuckets
pub const DESCRIBE_BUCKETS_PAGE_SIZE: i64 = 50;

/// Largest page size the inventory API accepts
pub const MAX_DESCRIBE_BUCKETS_PAGE_SIZE: i64 = 50;

/// Signing name and endpoint prefix of the inventory service
pub const INVENTORY_SERVICE_NAME: &str = "macie2";

/// REST path of the DescribeBuckets operation
pub const DESCRIBE_BUCKETS_PATH: &str = "/datasources/s3";

// Concurrency constants
/// Upper bound for the default number of concurrently scanning pairs
pub const MAX_DEFAULT_CONCURRENT_PAIRS: usize = 32;

/// Default number of in-flight logging lookups per pair
pub const DEFAULT_CONCURRENT_LOOKUPS: usize = 8;

/// Default number of concurrently scanning (profile, region) pairs (2x CPUs, capped)
pub fn default_concurrent_pairs() -> usize {
    std::cmp::min(num_cpus::get() * 2, MAX_DEFAULT_CONCURRENT_PAIRS)
}

// Report constants
/// Column headers of the tabular report; row order must match
pub const REPORT_HEADERS: [&str; 6] = [
    "Account ID",
    "Bucket Name",
    "Encryption",
    "isVersioned?",
    "No. of Objects Unencrypted",
    "isLoggingEnabled?",
];

/// Prefix of per-run report and summary file names
pub const REPORT_FILE_PREFIX: &str = "s3-report";

/// Timestamp format used in per-run file names
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";
