//! Cloud API clients used by the collector.
//!
//! Every (profile, region) pair gets its own pair of clients; nothing here is
//! a process-wide singleton.
//!
//! ## Clients
//!
//! - **Inventory**: Macie2 `DescribeBuckets`, paged bucket metadata
//!   (encryption, versioning, unencrypted object counts)
//! - **Object store**: S3 `GetBucketLogging`, per-bucket access logging state
//!
//! Both sit behind traits ([`macie::BucketInventory`] and
//! [`s3::BucketLoggingLookup`]) so the collector can be driven by any
//! implementation.
//!
//! ## Usage Example
//!
//! ```no_run
//! use bucket_collector::cloud::client::build_client_pairs;
//!
//! let profiles = vec!["dev".to_string(), "prod".to_string()];
//! let regions = vec!["us-east-1".to_string()];
//!
//! let built = build_client_pairs(&profiles, &regions, None);
//! println!("{} pairs ready, {} failed", built.pairs.len(), built.failures.len());
//! ```

/// Per-(profile, region) client factory
pub mod client;

/// Macie2 bucket inventory client
pub mod macie;

/// S3 bucket logging lookup
pub mod s3;
