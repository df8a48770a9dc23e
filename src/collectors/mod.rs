//! Bucket collection pipeline.
//!
//! Each (profile, region) client pair runs as its own worker: the
//! enumerator pages the bucket inventory, the enricher adds the access
//! logging state, and the batch lands in the shared aggregator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Collector Orchestrator         │
//! ├─────────────────────────────────────────┤
//! │        One worker per client pair       │
//! │  ┌────────────┬───────────┐             │
//! │  │ Enumerator │ Enricher  │             │
//! │  └────────────┴───────────┘             │
//! ├─────────────────────────────────────────┤
//! │   Result Aggregator │ Failure Report    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use bucket_collector::cloud::client::build_client_pairs;
//! use bucket_collector::collectors::collector::{collect_buckets, CollectorOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let profiles = vec!["dev".to_string(), "prod".to_string()];
//! let regions = vec!["us-east-1".to_string()];
//!
//! let pairs = build_client_pairs(&profiles, &regions, None);
//! let outcome = collect_buckets(pairs, CollectorOptions::default())?;
//!
//! println!("Collected {} buckets", outcome.records.len());
//! # Ok(())
//! # }
//! ```

/// Thread-safe record sink shared by all workers
pub mod aggregator;

/// Fleet-wide orchestration
pub mod collector;

/// Per-bucket access logging lookups
pub mod enricher;

/// Paginated bucket enumeration
pub mod enumerator;

/// Summary of pairs that contributed no records
pub mod failure_report;
