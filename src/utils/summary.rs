use serde_json::json;
use uuid::Uuid;
use anyhow::{Result, Context};

use crate::collectors::collector::CollectionOutcome;

/// Create a JSON summary of a collection run.
///
/// The summary sits next to the tabular report and records what the run
/// covered, which pairs failed and why, and the data-quality counters an
/// auditor needs before trusting the report.
///
/// # Arguments
///
/// * `start_time` - RFC 3339 timestamp of when the run started
/// * `end_time` - RFC 3339 timestamp of when the run finished
/// * `outcome` - Result of the collection
/// * `report_file` - File name of the tabular report, if one was written
///
/// # Example Output
///
/// ```json
/// {
///   "run_id": "550e8400-e29b-41d4-a716-446655440000",
///   "start_time": "2024-01-15T14:30:52Z",
///   "pairs_attempted": 8,
///   "pairs_failed": 1,
///   "record_count": 42,
///   "failures": [...],
///   "duplicates": [...]
/// }
/// ```
pub fn create_run_summary(
    start_time: &str,
    end_time: &str,
    outcome: &CollectionOutcome,
    report_file: Option<&str>,
) -> Result<String> {
    let failure_list: Vec<_> = outcome.failures.iter()
        .map(|failure| {
            json!({
                "profile": failure.profile,
                "region": failure.region,
                "kind": failure.kind.to_string(),
                "message": failure.message
            })
        })
        .collect();

    let summary = json!({
        "run_id": Uuid::new_v4().to_string(),
        "start_time": start_time,
        "end_time": end_time,
        "collector_version": env!("CARGO_PKG_VERSION"),
        "pairs_attempted": outcome.pairs_attempted,
        "pairs_succeeded": outcome.pairs_succeeded,
        "pairs_failed": outcome.failure_count(),
        "failures": failure_list,
        "record_count": outcome.records.len(),
        "unknown_logging_count": outcome.unknown_logging_count(),
        "unencrypted_object_total": outcome.unencrypted_object_total(),
        "duplicates": outcome.duplicates,
        "report_file": report_file
    });

    serde_json::to_string_pretty(&summary).context("Failed to serialize run summary to JSON")
}
