//! Shared, append-only sink for bucket records.
//!
//! Workers insert whole batches; the caller reads a snapshot once every
//! worker has joined.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::BucketRecord;

/// Thread-safe append-only collection of bucket records
#[derive(Debug, Default)]
pub struct ResultCollection {
    items: Mutex<Vec<BucketRecord>>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    // Records are only ever appended, so a poisoned lock still guards a consistent vector.
    fn items(&self) -> MutexGuard<'_, Vec<BucketRecord>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a whole batch under one lock acquisition
    pub fn insert(&self, batch: Vec<BucketRecord>) {
        if batch.is_empty() {
            return;
        }
        let mut items = self.items();
        items.extend(batch);
    }

    /// Copy of the records inserted so far
    pub fn snapshot(&self) -> Vec<BucketRecord> {
        self.items().clone()
    }

    /// Take the records out, leaving the collection empty
    pub fn into_records(self) -> Vec<BucketRecord> {
        self.items.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// (account id, bucket name) keys seen more than once, with their counts.
    ///
    /// Duplicates are reported, never removed.
    pub fn duplicate_keys(&self) -> Vec<(String, String, usize)> {
        let items = self.items();
        let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
        for record in items.iter() {
            *counts.entry(record.key()).or_insert(0) += 1;
        }

        let mut duplicates: Vec<(String, String, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|((account, bucket), count)| (account.to_string(), bucket.to_string(), count))
            .collect();
        duplicates.sort();
        duplicates
    }
}
