//! Output utilities for collection runs.
//!
//! ## Components
//!
//! - **Report**: the per-run CSV report, one row per bucket
//! - **Summary**: the JSON run summary with failure and data-quality counters
//!
//! ### Writing a Report
//!
//! ```no_run
//! use bucket_collector::utils::report::write_report;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let path = write_report(Path::new("reports"), "2024-01-01_120000", &[])?;
//! println!("Report written to {}", path.display());
//! # Ok(())
//! # }
//! ```

/// Run summary generation
pub mod summary;

/// Tabular CSV report
pub mod report;
