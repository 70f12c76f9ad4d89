//! Transfer stage: validated local files move into the staging bucket.

use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{IngestError, ShareIoSnafu};
use crate::ledger::{LedgerClient, LedgerEntry, LoadStatus};
use crate::partition::DayPartition;
use crate::storage::StorageProviderRef;
use crate::validate::validate_file;

/// File extension of incoming report files.
pub const REPORT_EXTENSION: &str = "dat";

/// Per-day counters reported by the transfer stage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub uploaded: usize,
    pub already_registered: usize,
    pub invalid: usize,
}

impl TransferSummary {
    pub fn merge(&mut self, other: Self) {
        self.uploaded += other.uploaded;
        self.already_registered += other.already_registered;
        self.invalid += other.invalid;
    }
}

/// Uploads validated files from the share into the staging bucket and
/// registers them in the ledger.
pub struct TransferStage {
    staging: StorageProviderRef,
    ledger: LedgerClient,
}

impl TransferStage {
    pub fn new(staging: StorageProviderRef, ledger: LedgerClient) -> Self {
        Self { staging, ledger }
    }

    /// Process one day's partition directory on the share.
    ///
    /// A file that fails validation is logged and skipped so a corrupt
    /// file never blocks its siblings. A file already present in the
    /// ledger is not uploaded again, which makes reruns produce exactly
    /// one staging object and one ledger row per file.
    pub async fn run(
        &self,
        incoming_root: &Path,
        partition: &DayPartition,
    ) -> Result<TransferSummary, IngestError> {
        let dir = incoming_root.join(partition.prefix());
        let files = list_report_files(&dir).await?;
        let mut summary = TransferSummary::default();

        for path in files {
            let metadata = match validate_file(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "Integrity check failed, skipping file"
                    );
                    summary.invalid += 1;
                    continue;
                }
            };

            let status = self
                .ledger
                .lookup_status(&metadata.file_name, &metadata.business_date)
                .await?;

            if status == LoadStatus::Absent {
                let dest =
                    object_store::path::Path::from(partition.object_path(&metadata.file_name));
                self.staging.upload(&path, &dest).await?;
                self.ledger
                    .insert(&LedgerEntry::registered(metadata.clone()))
                    .await?;
                info!(
                    file = %metadata.file_name,
                    destination = %dest,
                    "Uploaded file to staging"
                );
                summary.uploaded += 1;
            } else {
                info!(
                    file = %metadata.file_name,
                    "File already registered, skipping upload"
                );
                summary.already_registered += 1;
            }
        }

        Ok(summary)
    }
}

/// List report files in a partition directory, sorted by name.
///
/// An absent directory is an empty day, not an error.
async fn list_report_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Partition directory not found, nothing to transfer");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(IngestError::ShareIo {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.context(ShareIoSnafu { path: dir })? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(REPORT_EXTENSION) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
