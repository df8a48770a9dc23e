//! Pair failure reporting
//!
//! Summarizes the (profile, region) pairs that contributed no records and
//! gives operators a hint about the likely cause.

use log::warn;

use crate::models::{FailureKind, PairFailure};

/// Likely cause of a pair failure, derived from its error message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    AccessDenied,
    MacieNotEnabled,
    Credentials,
    Other,
}

impl FailureCause {
    /// Classify an error message
    pub fn classify(error_msg: &str) -> Self {
        let lower = error_msg.to_lowercase();
        if lower.contains("macie is not enabled") || lower.contains("macie isn't enabled") {
            FailureCause::MacieNotEnabled
        } else if lower.contains("accessdenied")
            || lower.contains("access denied")
            || lower.contains("http 403")
        {
            FailureCause::AccessDenied
        } else if lower.contains("profile")
            || lower.contains("credentials")
            || lower.contains("invalidclienttokenid")
            || lower.contains("expiredtoken")
            || lower.contains("unrecognizedclientexception")
        {
            FailureCause::Credentials
        } else {
            FailureCause::Other
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            FailureCause::AccessDenied => Some("grant macie2:DescribeBuckets and s3:GetBucketLogging to the profile's role"),
            FailureCause::MacieNotEnabled => Some("enable Amazon Macie in this account and region, or drop the pair from the fleet"),
            FailureCause::Credentials => Some("check the profile exists in the shared credentials file and its keys are current"),
            FailureCause::Other => None,
        }
    }
}

/// Read-only view over the failures of one run
#[derive(Debug, Clone, Copy)]
pub struct FailureReport<'a> {
    failures: &'a [PairFailure],
}

impl<'a> FailureReport<'a> {
    pub fn new(failures: &'a [PairFailure]) -> Self {
        FailureReport { failures }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of failures of the given kind
    pub fn count_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    /// Log the failures with a remediation hint per failed pair
    pub fn report_failures(&self) {
        if self.failures.is_empty() {
            return;
        }

        warn!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        warn!("⚠️  Failed Account Scans");
        warn!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        warn!(
            "{} (profile, region) pair(s) contributed no records \
             (construction: {}, enumeration: {}, cancelled: {}, panicked: {}):",
            self.failures.len(),
            self.count_of(FailureKind::Construction),
            self.count_of(FailureKind::Enumeration),
            self.count_of(FailureKind::Cancelled),
            self.count_of(FailureKind::Panicked),
        );
        warn!("");

        for failure in self.failures {
            warn!("  • {}", failure);
            if let Some(hint) = FailureCause::classify(&failure.message).hint() {
                warn!("      hint: {}", hint);
            }
        }

        warn!("");
        warn!("Note: records from the remaining pairs were collected.");
        warn!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}
