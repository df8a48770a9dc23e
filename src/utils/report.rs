use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::constants::{REPORT_FILE_PREFIX, REPORT_HEADERS};
use crate::models::BucketRecord;

/// File name of the tabular report for a run started at `timestamp`
pub fn report_file_name(timestamp: &str) -> String {
    format!("{}-{}.csv", REPORT_FILE_PREFIX, timestamp)
}

/// One report row, in header order
fn report_row(record: &BucketRecord) -> [String; 6] {
    [
        record.account_id.clone(),
        record.bucket_name.clone(),
        record.encryption_type.to_string(),
        record.versioning_enabled.to_string(),
        record.unencrypted_object_count.to_string(),
        record.logging.to_string(),
    ]
}

/// Write the records as a CSV report in `output_dir`.
///
/// Records are sorted by (account id, bucket name) so consecutive runs diff cleanly.
/// Returns the path of the written file.
pub fn write_report(output_dir: &Path, timestamp: &str, records: &[BucketRecord]) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .context(format!("Failed to create output directory {}", output_dir.display()))?;

    let path = output_dir.join(report_file_name(timestamp));
    let mut writer = csv::Writer::from_path(&path)
        .context(format!("Failed to create report file {}", path.display()))?;

    writer.write_record(REPORT_HEADERS)
        .context("Failed to write report header")?;

    let mut sorted: Vec<&BucketRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.key().cmp(&b.key()));

    for record in sorted {
        writer.write_record(report_row(record))
            .context(format!("Failed to write report row for bucket {}", record.bucket_name))?;
    }

    writer.flush()
        .context(format!("Failed to flush report file {}", path.display()))?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncryptionType, LoggingStatus};
    use tempfile::tempdir;

    fn record(account: &str, bucket: &str, encryption: EncryptionType, logging: LoggingStatus) -> BucketRecord {
        BucketRecord {
            account_id: account.to_string(),
            bucket_name: bucket.to_string(),
            encryption_type: encryption,
            unencrypted_object_count: 12,
            versioning_enabled: true,
            logging,
        }
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("2024-01-01_120000"), "s3-report-2024-01-01_120000.csv");
    }

    #[test]
    fn test_write_report() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("reports");
        let records = vec![
            record("222", "zeta", EncryptionType::SseKms, LoggingStatus::Unknown),
            record("111", "alpha", EncryptionType::None, LoggingStatus::Enabled),
            record("111", "beta, with comma", EncryptionType::SseS3, LoggingStatus::Disabled),
        ];

        let path = write_report(&output, "2024-01-01_120000", &records).unwrap();
        assert!(path.ends_with("s3-report-2024-01-01_120000.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, REPORT_HEADERS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "alpha");
        assert_eq!(&rows[0][2], "NONE");
        assert_eq!(&rows[0][5], "true");
        assert_eq!(&rows[1][1], "beta, with comma");
        assert_eq!(&rows[1][5], "false");
        assert_eq!(&rows[2][0], "222");
        assert_eq!(&rows[2][3], "true");
        assert_eq!(&rows[2][4], "12");
        assert_eq!(&rows[2][5], "unknown");
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let dir = tempdir().unwrap();
        let path = write_report(dir.path(), "ts", &[]).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("Account ID,Bucket Name,Encryption"));
    }
}
