use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use crate::cloud::macie::BucketInventory;
use crate::models::BucketDescriptor;

/// Page through the inventory until the final page and return every descriptor.
///
/// All or nothing: if any page request fails, the descriptors fetched so far
/// are dropped and the error is returned.
///
/// # Arguments
///
/// * `inventory` - Inventory client of one (profile, region) pair
/// * `page_size` - Page size hint sent with every request
/// * `label` - Pair label used in log messages
pub async fn describe_all_buckets(
    inventory: &dyn BucketInventory,
    page_size: i64,
    label: &str,
) -> Result<Vec<BucketDescriptor>> {
    let mut descriptors = Vec::new();
    let mut next_token: Option<String> = None;
    let mut sent_tokens: HashSet<String> = HashSet::new();
    let mut page_number = 0usize;

    loop {
        page_number += 1;
        let page = inventory.describe_buckets(page_size, next_token.clone()).await
            .with_context(|| format!("Failed to fetch bucket page {} for {}", page_number, label))?;

        debug!("{}: page {} returned {} buckets", label, page_number, page.buckets.len());
        let last_page = page.is_last_page();

        descriptors.extend(page.buckets);

        if last_page {
            break;
        }

        // Any token seen before means the listing cycles
        if let Some(token) = &page.next_token {
            if !sent_tokens.insert(token.clone()) {
                return Err(anyhow!(
                    "Inventory for {} returned the same continuation token twice (page {})",
                    label, page_number
                ));
            }
        }
        next_token = page.next_token;
    }

    match descriptors.first() {
        Some(first) => info!("Total buckets in {} ({}): {}", first.account_id, label, descriptors.len()),
        None => info!("Total buckets in {}: 0", label),
    }

    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::macie::{BucketPage, MockBucketInventory};
    use crate::models::EncryptionType;
    use mockall::Sequence;

    fn descriptor(name: &str) -> BucketDescriptor {
        BucketDescriptor {
            account_id: "111122223333".to_string(),
            bucket_name: name.to_string(),
            encryption_type: EncryptionType::SseKms,
            unencrypted_object_count: 0,
            versioning_enabled: true,
        }
    }

    fn page(names: &[&str], next_token: Option<&str>) -> BucketPage {
        BucketPage {
            buckets: names.iter().map(|n| descriptor(n)).collect(),
            next_token: next_token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_pages_until_last_page() {
        let mut inventory = MockBucketInventory::new();
        let mut seq = Sequence::new();

        inventory.expect_describe_buckets()
            .withf(|size, token| *size == 50 && token.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["b1", "b2"], Some("t1"))));
        inventory.expect_describe_buckets()
            .withf(|_, token| token.as_deref() == Some("t1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&[], Some("t2"))));
        inventory.expect_describe_buckets()
            .withf(|_, token| token.as_deref() == Some("t2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["b3"], None)));

        let buckets = describe_all_buckets(&inventory, 50, "dev/us-east-1").await.unwrap();
        let names: Vec<&str> = buckets.iter().map(|b| b.bucket_name.as_str()).collect();
        assert_eq!(names, vec!["b1", "b2", "b3"]);
    }

    #[tokio::test]
    async fn test_empty_inventory() {
        let mut inventory = MockBucketInventory::new();
        inventory.expect_describe_buckets()
            .times(1)
            .returning(|_, _| Ok(BucketPage::default()));

        let buckets = describe_all_buckets(&inventory, 50, "dev/us-east-1").await.unwrap();
        assert!(buckets.is_empty());
    }

    #[tokio::test]
    async fn test_failure_mid_enumeration_discards_everything() {
        let mut inventory = MockBucketInventory::new();
        let mut seq = Sequence::new();

        inventory.expect_describe_buckets()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["b1"], Some("t1"))));
        inventory.expect_describe_buckets()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(anyhow!("connection reset")));

        let err = describe_all_buckets(&inventory, 50, "dev/us-east-1").await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("page 2"));
        assert!(message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_token_cycle_is_an_error() {
        let mut inventory = MockBucketInventory::new();
        let mut seq = Sequence::new();

        inventory.expect_describe_buckets()
            .withf(|_, token| token.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["b1"], Some("A"))));
        inventory.expect_describe_buckets()
            .withf(|_, token| token.as_deref() == Some("A"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["b2"], Some("B"))));
        inventory.expect_describe_buckets()
            .withf(|_, token| token.as_deref() == Some("B"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["b3"], Some("A"))));

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            describe_all_buckets(&inventory, 50, "dev/us-east-1"),
        ).await.expect("enumeration did not stop on a token cycle");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("same continuation token"));
        assert!(err.to_string().contains("page 3"));
    }

    #[tokio::test]
    async fn test_repeated_token_is_an_error() {
        let mut inventory = MockBucketInventory::new();
        inventory.expect_describe_buckets()
            .returning(|_, _| Ok(page(&["b1"], Some("stuck"))));

        let err = describe_all_buckets(&inventory, 50, "dev/us-east-1").await.unwrap_err();
        assert!(err.to_string().contains("same continuation token"));
    }
}
