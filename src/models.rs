use std::fmt;

use serde::{Serialize, Deserialize};

/// Server-side encryption reported by the inventory API for a bucket's default configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EncryptionType {
    None,
    SseS3,
    SseKms,
    SseKmsDsse,
    /// The inventory reported UNKNOWN or omitted the field
    Unknown,
    Other(String),
}

impl EncryptionType {
    /// Map the raw inventory value (`NONE`, `AES256`, `aws:kms`, ...) to a variant
    pub fn from_api_value(value: Option<&str>) -> Self {
        match value {
            None => EncryptionType::Unknown,
            Some(raw) => match raw {
                "NONE" => EncryptionType::None,
                "AES256" => EncryptionType::SseS3,
                "aws:kms" => EncryptionType::SseKms,
                "aws:kms:dsse" => EncryptionType::SseKmsDsse,
                "UNKNOWN" | "" => EncryptionType::Unknown,
                other => EncryptionType::Other(other.to_string()),
            },
        }
    }
}

impl fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionType::None => write!(f, "NONE"),
            EncryptionType::SseS3 => write!(f, "SSE-S3"),
            EncryptionType::SseKms => write!(f, "SSE-KMS"),
            EncryptionType::SseKmsDsse => write!(f, "DSSE-KMS"),
            EncryptionType::Unknown => write!(f, "UNKNOWN"),
            EncryptionType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Outcome of a bucket logging lookup.
///
/// `Unknown` means the lookup itself failed; it is never folded into `Disabled`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoggingStatus {
    Enabled,
    Disabled,
    Unknown,
}

impl LoggingStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, LoggingStatus::Unknown)
    }
}

impl From<bool> for LoggingStatus {
    fn from(enabled: bool) -> Self {
        if enabled { LoggingStatus::Enabled } else { LoggingStatus::Disabled }
    }
}

impl fmt::Display for LoggingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingStatus::Enabled => write!(f, "true"),
            LoggingStatus::Disabled => write!(f, "false"),
            LoggingStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Raw bucket descriptor as listed by the inventory API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BucketDescriptor {
    pub account_id: String,
    pub bucket_name: String,
    pub encryption_type: EncryptionType,
    pub unencrypted_object_count: u64,
    pub versioning_enabled: bool,
}

/// One bucket's collected compliance attributes
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BucketRecord {
    pub account_id: String,
    pub bucket_name: String,
    pub encryption_type: EncryptionType,
    pub unencrypted_object_count: u64,
    pub versioning_enabled: bool,
    pub logging: LoggingStatus,
}

impl BucketRecord {
    /// Complete a descriptor with its logging status
    pub fn from_descriptor(descriptor: BucketDescriptor, logging: LoggingStatus) -> Self {
        BucketRecord {
            account_id: descriptor.account_id,
            bucket_name: descriptor.bucket_name,
            encryption_type: descriptor.encryption_type,
            unencrypted_object_count: descriptor.unencrypted_object_count,
            versioning_enabled: descriptor.versioning_enabled,
            logging,
        }
    }

    /// Natural key of a bucket within the fleet
    pub fn key(&self) -> (&str, &str) {
        (&self.account_id, &self.bucket_name)
    }
}

/// Why a (profile, region) pair contributed no records
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Construction,
    Enumeration,
    Cancelled,
    Panicked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Construction => write!(f, "construction"),
            FailureKind::Enumeration => write!(f, "enumeration"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Panicked => write!(f, "panicked"),
        }
    }
}

/// Diagnostic for one failed (profile, region) pair
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    pub profile: String,
    pub region: String,
    pub kind: FailureKind,
    pub message: String,
}

impl PairFailure {
    pub fn new(profile: &str, region: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        PairFailure {
            profile: profile.to_string(),
            region: region.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PairFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}): {}", self.profile, self.region, self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encryption_type_mapping() {
        assert_eq!(EncryptionType::from_api_value(Some("NONE")), EncryptionType::None);
        assert_eq!(EncryptionType::from_api_value(Some("AES256")), EncryptionType::SseS3);
        assert_eq!(EncryptionType::from_api_value(Some("aws:kms")), EncryptionType::SseKms);
        assert_eq!(EncryptionType::from_api_value(Some("aws:kms:dsse")), EncryptionType::SseKmsDsse);
        assert_eq!(EncryptionType::from_api_value(Some("UNKNOWN")), EncryptionType::Unknown);
        assert_eq!(EncryptionType::from_api_value(None), EncryptionType::Unknown);
        assert_eq!(
            EncryptionType::from_api_value(Some("aws:future")),
            EncryptionType::Other("aws:future".to_string())
        );
    }

    #[test]
    fn test_encryption_type_display() {
        assert_eq!(EncryptionType::SseS3.to_string(), "SSE-S3");
        assert_eq!(EncryptionType::SseKms.to_string(), "SSE-KMS");
        assert_eq!(EncryptionType::None.to_string(), "NONE");
        assert_eq!(EncryptionType::Other("x".to_string()).to_string(), "x");
    }

    #[test]
    fn test_logging_status() {
        assert_eq!(LoggingStatus::from(true), LoggingStatus::Enabled);
        assert_eq!(LoggingStatus::from(false), LoggingStatus::Disabled);
        assert!(!LoggingStatus::Unknown.is_known());
        assert!(LoggingStatus::Disabled.is_known());
        assert_eq!(LoggingStatus::Unknown.to_string(), "unknown");
        assert_ne!(LoggingStatus::Unknown, LoggingStatus::Disabled);
    }

    #[test]
    fn test_record_from_descriptor() {
        let descriptor = BucketDescriptor {
            account_id: "111122223333".to_string(),
            bucket_name: "b1".to_string(),
            encryption_type: EncryptionType::SseS3,
            unencrypted_object_count: 0,
            versioning_enabled: true,
        };

        let record = BucketRecord::from_descriptor(descriptor, LoggingStatus::Enabled);
        assert_eq!(record.key(), ("111122223333", "b1"));
        assert_eq!(record.encryption_type, EncryptionType::SseS3);
        assert!(record.versioning_enabled);
        assert_eq!(record.logging, LoggingStatus::Enabled);
    }

    #[test]
    fn test_pair_failure_display() {
        let failure = PairFailure::new("dev", "us-east-1", FailureKind::Enumeration, "network error");
        assert_eq!(failure.to_string(), "dev/us-east-1 (enumeration): network error");
    }
}
