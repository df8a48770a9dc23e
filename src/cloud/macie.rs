//! Bucket inventory backed by the Macie2 `DescribeBuckets` operation.
//!
//! Rusoto ships no Macie2 service crate, so requests are built and signed
//! directly with `rusoto_core`, the same way the generated service clients do it.

use anyhow::{anyhow, Context, Result};
use log::debug;
use rusoto_core::signature::SignedRequest;
use rusoto_core::{Client, Region};
use serde::{Deserialize, Serialize};

use crate::constants::{DESCRIBE_BUCKETS_PATH, INVENTORY_SERVICE_NAME};
use crate::models::{BucketDescriptor, EncryptionType};

/// One page of bucket descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketPage {
    pub buckets: Vec<BucketDescriptor>,
    pub next_token: Option<String>,
}

impl BucketPage {
    /// The final page carries no continuation token
    pub fn is_last_page(&self) -> bool {
        self.next_token.as_deref().map_or(true, str::is_empty)
    }
}

/// Paged bucket inventory for one (profile, region) pair
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BucketInventory: Send + Sync {
    /// Fetch the page that follows `next_token` (`None` for the first page)
    async fn describe_buckets(&self, page_size: i64, next_token: Option<String>) -> Result<BucketPage>;
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DescribeBucketsRequest {
    max_results: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct DescribeBucketsResponse {
    #[serde(default)]
    buckets: Vec<BucketMetadata>,
    next_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct BucketMetadata {
    account_id: Option<String>,
    bucket_name: Option<String>,
    server_side_encryption: Option<ServerSideEncryption>,
    object_count_by_encryption_type: Option<ObjectCountByEncryptionType>,
    versioning: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct ServerSideEncryption {
    #[serde(rename = "type")]
    encryption_type: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ObjectCountByEncryptionType {
    unencrypted: Option<i64>,
}

impl BucketMetadata {
    fn into_descriptor(self) -> Result<BucketDescriptor> {
        let bucket_name = self.bucket_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("Bucket descriptor has no bucket name"))?;

        let account_id = self.account_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("Bucket {} has no account id", bucket_name))?;

        let versioning_enabled = self.versioning
            .ok_or_else(|| anyhow!("Bucket {} has no versioning flag", bucket_name))?;

        let unencrypted = self.object_count_by_encryption_type
            .and_then(|counts| counts.unencrypted)
            .ok_or_else(|| anyhow!("Bucket {} has no unencrypted object count", bucket_name))?;
        let unencrypted_object_count = u64::try_from(unencrypted)
            .map_err(|_| anyhow!("Bucket {} has a negative unencrypted object count: {}", bucket_name, unencrypted))?;

        let encryption_type = EncryptionType::from_api_value(
            self.server_side_encryption
                .as_ref()
                .and_then(|sse| sse.encryption_type.as_deref()),
        );

        Ok(BucketDescriptor {
            account_id,
            bucket_name,
            encryption_type,
            unencrypted_object_count,
            versioning_enabled,
        })
    }
}

/// Decode a DescribeBuckets response body into a page.
///
/// A page containing any incomplete descriptor is rejected as a whole.
pub fn parse_describe_buckets_response(body: &[u8]) -> Result<BucketPage> {
    let response: DescribeBucketsResponse = serde_json::from_slice(body)
        .context("Failed to parse DescribeBuckets response")?;

    let buckets = response.buckets
        .into_iter()
        .map(BucketMetadata::into_descriptor)
        .collect::<Result<Vec<_>>>()
        .context("Malformed bucket descriptor in DescribeBuckets page")?;

    Ok(BucketPage {
        buckets,
        next_token: response.next_token.filter(|token| !token.is_empty()),
    })
}

/// Signed Macie2 client scoped to one profile and region
pub struct MacieInventoryClient {
    client: Client,
    region: Region,
}

impl MacieInventoryClient {
    pub fn new(client: Client, region: Region) -> Self {
        MacieInventoryClient { client, region }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

#[async_trait::async_trait]
impl BucketInventory for MacieInventoryClient {
    async fn describe_buckets(&self, page_size: i64, next_token: Option<String>) -> Result<BucketPage> {
        let payload = serde_json::to_vec(&DescribeBucketsRequest {
            max_results: page_size,
            next_token,
        })
        .context("Failed to encode DescribeBuckets request")?;

        let mut request = SignedRequest::new("POST", INVENTORY_SERVICE_NAME, &self.region, DESCRIBE_BUCKETS_PATH);
        request.set_content_type("application/json".to_string());
        request.set_payload(Some(payload));

        let mut response = self.client.sign_and_dispatch(request).await
            .map_err(|e| anyhow!("DescribeBuckets request failed in {}: {:?}", self.region.name(), e))?;

        let response = response.buffer().await
            .context("Failed to read DescribeBuckets response body")?;

        if !response.status.is_success() {
            return Err(anyhow!(
                "DescribeBuckets returned HTTP {} in {}: {}",
                response.status,
                self.region.name(),
                String::from_utf8_lossy(&response.body[..])
            ));
        }

        let page = parse_describe_buckets_response(&response.body[..])?;
        debug!("DescribeBuckets page in {}: {} buckets, last page: {}",
               self.region.name(), page.buckets.len(), page.is_last_page());
        Ok(page)
    }
}
