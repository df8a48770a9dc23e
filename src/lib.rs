//! # bucket-collector
//!
//! A fleet-wide S3 bucket compliance collector written in Rust.
//!
//! ## Overview
//!
//! bucket-collector scans every bucket across a fleet of AWS accounts
//! (profiles) and regions and produces one merged table of compliance
//! attributes per bucket: encryption, versioning, unencrypted object count
//! and access logging state.
//!
//! ## Features
//!
//! - **Parallel scanning**: one worker per (profile, region) pair, bounded by a semaphore
//! - **Failure isolation**: a failing pair is reported and never affects other pairs
//! - **Tri-state logging**: a failed lookup is `Unknown`, never silently `false`
//! - **Cancellation**: caller-driven or deadline-driven, with every worker accounted for
//! - **Reports**: CSV report plus a JSON run summary
//!
//! ## Usage
//!
//! ```no_run
//! use bucket_collector::cloud::client::build_client_pairs;
//! use bucket_collector::collectors::collector::{collect_buckets, CollectorOptions};
//! use bucket_collector::utils::report::write_report;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let profiles = vec!["dev".to_string()];
//! let regions = vec!["us-east-1".to_string(), "us-west-2".to_string()];
//!
//! let pairs = build_client_pairs(&profiles, &regions, None);
//! let outcome = collect_buckets(pairs, CollectorOptions::default())?;
//!
//! write_report(Path::new("reports"), "2024-01-01_120000", &outcome.records)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Bucket records and failure diagnostics
//! - [`collectors`]: Enumeration, enrichment, aggregation and orchestration
//! - [`config`]: YAML run configuration and profile lists
//! - [`cloud`]: Client construction and the inventory and object-store APIs
//! - [`utils`]: CSV report and JSON run summary
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Bucket collection pipeline
pub mod collectors;

/// Report and summary output
pub mod utils;

/// AWS client construction and API adapters
pub mod cloud;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;
