use anyhow::{anyhow, Result};
use log::debug;
use rusoto_s3::{GetBucketLoggingRequest, S3Client, S3};

/// Per-bucket access logging lookup against the object store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BucketLoggingLookup: Send + Sync {
    /// `Ok(true)` when the bucket has a logging configuration, `Ok(false)` when it has none
    async fn logging_enabled(&self, bucket: &str) -> Result<bool>;
}

/// S3 client scoped to one profile and region.
///
/// # Fields
///
/// * `client` - Rusoto S3 client built with the pair's profile credentials
pub struct S3LoggingClient {
    client: S3Client,
}

impl S3LoggingClient {
    pub fn new(client: S3Client) -> Self {
        S3LoggingClient { client }
    }
}

#[async_trait::async_trait]
impl BucketLoggingLookup for S3LoggingClient {
    async fn logging_enabled(&self, bucket: &str) -> Result<bool> {
        let request = GetBucketLoggingRequest {
            bucket: bucket.to_string(),
            ..Default::default()
        };

        let output = self.client.get_bucket_logging(request).await
            .map_err(|e| anyhow!("GetBucketLogging failed for {}: {}", bucket, e))?;

        let enabled = output.logging_enabled.is_some();
        debug!("Bucket {} logging enabled: {}", bucket, enabled);
        Ok(enabled)
    }
}
