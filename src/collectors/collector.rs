use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future;
use log::{info, warn, debug};
use serde::{Serialize, Deserialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::cloud::client::{ClientPair, ClientPairs};
use crate::collectors::aggregator::ResultCollection;
use crate::collectors::enricher::enrich_buckets;
use crate::collectors::enumerator::describe_all_buckets;
use crate::constants::{default_concurrent_pairs, DEFAULT_CONCURRENT_LOOKUPS, DESCRIBE_BUCKETS_PAGE_SIZE};
use crate::models::{BucketRecord, FailureKind, LoggingStatus, PairFailure};

/// Tuning for one collection run
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorOptions {
    /// Page size hint for the inventory listing
    pub page_size: i64,
    /// Pairs scanning at the same time
    pub max_concurrent_pairs: usize,
    /// In-flight logging lookups per pair
    pub max_concurrent_lookups: usize,
    /// Cancel every unfinished pair once this much time has passed
    pub deadline: Option<Duration>,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        CollectorOptions {
            page_size: DESCRIBE_BUCKETS_PAGE_SIZE,
            max_concurrent_pairs: default_concurrent_pairs(),
            max_concurrent_lookups: DEFAULT_CONCURRENT_LOOKUPS,
            deadline: None,
        }
    }
}

/// A bucket key that was discovered more than once in a run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DuplicateBucket {
    pub account_id: String,
    pub bucket_name: String,
    pub occurrences: usize,
}

/// Everything a run produced: records from successful pairs plus diagnostics
#[derive(Debug, Clone, Default)]
pub struct CollectionOutcome {
    pub records: Vec<BucketRecord>,
    pub pairs_attempted: usize,
    pub pairs_succeeded: usize,
    pub failures: Vec<PairFailure>,
    pub duplicates: Vec<DuplicateBucket>,
}

impl CollectionOutcome {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when pairs were attempted and none of them succeeded
    pub fn all_failed(&self) -> bool {
        self.pairs_attempted > 0 && self.pairs_succeeded == 0
    }

    pub fn unknown_logging_count(&self) -> usize {
        self.records.iter().filter(|r| r.logging == LoggingStatus::Unknown).count()
    }

    pub fn unencrypted_object_total(&self) -> u64 {
        self.records.iter().map(|r| r.unencrypted_object_count).fold(0u64, u64::saturating_add)
    }
}

/// Enumerate and enrich the buckets of one pair
pub async fn scan_pair(pair: &ClientPair, options: &CollectorOptions) -> Result<Vec<BucketRecord>> {
    let label = pair.label();

    let descriptors = describe_all_buckets(pair.inventory(), options.page_size, &label).await?;
    let records = enrich_buckets(pair.logging(), descriptors, options.max_concurrent_lookups).await;

    let unknown = records.iter().filter(|r| !r.logging.is_known()).count();
    if unknown > 0 {
        warn!("{}: logging state unknown for {} of {} buckets", label, unknown, records.len());
    }

    Ok(records)
}

/// Run one pair to completion and insert its batch; returns the batch size
async fn run_worker(
    pair: ClientPair,
    options: CollectorOptions,
    results: Arc<ResultCollection>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
) -> Result<usize, PairFailure> {
    let cancelled = |pair: &ClientPair| {
        PairFailure::new(pair.profile(), pair.region(), FailureKind::Cancelled, "run cancelled before the scan finished")
    };

    // Acquire a permit from the semaphore, limiting concurrently scanning pairs
    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(cancelled(&pair)),
        permit = semaphore.acquire() => permit.map_err(|_| cancelled(&pair))?,
    };

    info!("Scanning buckets for {}", pair.label());

    let scanned = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(cancelled(&pair)),
        scanned = scan_pair(&pair, &options) => scanned,
    };

    match scanned {
        Ok(batch) => {
            let count = batch.len();
            results.insert(batch);
            debug!("{}: inserted {} records", pair.label(), count);
            Ok(count)
        },
        Err(e) => {
            warn!("Scan failed for {}: {:#}", pair.label(), e);
            Err(PairFailure::new(pair.profile(), pair.region(), FailureKind::Enumeration, format!("{:#}", e)))
        }
    }
}

/// Scan every client pair concurrently and merge the results.
///
/// One task is spawned per pair. A failing, panicking or cancelled pair
/// contributes no records and is reported in `failures`; it never affects
/// the records of other pairs. Returns only after every task has finished.
///
/// # Arguments
///
/// * `pairs` - Client pairs to scan, each moved into its own task
/// * `options` - Page size, concurrency limits and optional deadline
/// * `cancel` - Cancels all unfinished pairs when triggered by the caller
pub async fn collect_fleet(
    pairs: Vec<ClientPair>,
    options: CollectorOptions,
    cancel: CancellationToken,
) -> CollectionOutcome {
    let pairs_attempted = pairs.len();
    let results = Arc::new(ResultCollection::new());
    let semaphore = Arc::new(Semaphore::new(options.max_concurrent_pairs.max(1)));

    // The deadline only cancels this run, never the caller's token
    let run_token = cancel.child_token();
    let deadline_watcher = options.deadline.map(|deadline| {
        let token = run_token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            warn!("Run deadline of {:?} reached, cancelling unfinished scans", deadline);
            token.cancel();
        })
    });

    info!("Starting bucket collection across {} client pairs", pairs_attempted);

    let mut labels = Vec::with_capacity(pairs_attempted);
    let handles: Vec<_> = pairs
        .into_iter()
        .map(|pair| {
            labels.push((pair.profile().to_string(), pair.region().to_string()));
            tokio::spawn(run_worker(
                pair,
                options.clone(),
                Arc::clone(&results),
                Arc::clone(&semaphore),
                run_token.clone(),
            ))
        })
        .collect();

    // Wait for every worker, successful or not
    let joined = future::join_all(handles).await;

    if let Some(watcher) = deadline_watcher {
        watcher.abort();
    }

    let mut pairs_succeeded = 0;
    let mut failures = Vec::new();
    for ((profile, region), result) in labels.into_iter().zip(joined) {
        match result {
            Ok(Ok(_)) => pairs_succeeded += 1,
            Ok(Err(failure)) => failures.push(failure),
            Err(join_error) => {
                let kind = if join_error.is_panic() { FailureKind::Panicked } else { FailureKind::Cancelled };
                warn!("Worker for {}/{} did not complete: {}", profile, region, join_error);
                failures.push(PairFailure::new(&profile, &region, kind, join_error.to_string()));
            }
        }
    }

    let duplicates: Vec<DuplicateBucket> = results
        .duplicate_keys()
        .into_iter()
        .map(|(account_id, bucket_name, occurrences)| DuplicateBucket { account_id, bucket_name, occurrences })
        .collect();
    for duplicate in &duplicates {
        warn!("Bucket {} in account {} was discovered {} times",
              duplicate.bucket_name, duplicate.account_id, duplicate.occurrences);
    }

    let records = match Arc::try_unwrap(results) {
        Ok(collection) => collection.into_records(),
        Err(shared) => shared.snapshot(),
    };

    info!("Collected {} bucket records from {}/{} client pairs",
          records.len(), pairs_succeeded, pairs_attempted);

    CollectionOutcome {
        records,
        pairs_attempted,
        pairs_succeeded,
        failures,
        duplicates,
    }
}

/// Scan the output of the client factory, folding its construction failures into the outcome
pub async fn collect_from_client_pairs(
    built: ClientPairs,
    options: CollectorOptions,
    cancel: CancellationToken,
) -> CollectionOutcome {
    let ClientPairs { pairs, failures: construction_failures } = built;

    let mut outcome = collect_fleet(pairs, options, cancel).await;
    outcome.pairs_attempted += construction_failures.len();

    let mut failures = construction_failures;
    failures.append(&mut outcome.failures);
    outcome.failures = failures;

    outcome
}

/// Synchronous entry point that runs the collection on its own Tokio runtime
pub fn collect_buckets(built: ClientPairs, options: CollectorOptions) -> Result<CollectionOutcome> {
    // Create a new runtime for running the async function
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    Ok(runtime.block_on(collect_from_client_pairs(built, options, CancellationToken::new())))
}
