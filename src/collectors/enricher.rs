use futures::stream::{self, StreamExt};
use log::warn;

use crate::cloud::s3::BucketLoggingLookup;
use crate::models::{BucketDescriptor, BucketRecord, LoggingStatus};

/// Look up the access logging state of one bucket.
///
/// A failed lookup is logged and reported as `LoggingStatus::Unknown`;
/// it never aborts the caller.
pub async fn lookup_logging(lookup: &dyn BucketLoggingLookup, bucket: &str) -> LoggingStatus {
    match lookup.logging_enabled(bucket).await {
        Ok(enabled) => LoggingStatus::from(enabled),
        Err(e) => {
            warn!("Could not determine logging for bucket {}: {:#}", bucket, e);
            LoggingStatus::Unknown
        }
    }
}

/// Turn descriptors into complete records, running up to `max_in_flight`
/// lookups at once. Output order matches input order.
pub async fn enrich_buckets(
    lookup: &dyn BucketLoggingLookup,
    descriptors: Vec<BucketDescriptor>,
    max_in_flight: usize,
) -> Vec<BucketRecord> {
    stream::iter(descriptors)
        .map(|descriptor| async move {
            let logging = lookup_logging(lookup, &descriptor.bucket_name).await;
            BucketRecord::from_descriptor(descriptor, logging)
        })
        .buffered(max_in_flight.max(1))
        .collect()
        .await
}
