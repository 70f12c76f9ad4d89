//! Load stage: staged files bulk-load into the warehouse and move to the
//! archive bucket.

use std::sync::Arc;

use tracing::{info, warn};

use crate::classify::TargetTable;
use crate::error::IngestError;
use crate::ledger::{LedgerClient, LedgerEntry, LoadStatus};
use crate::metadata::FileMetadata;
use crate::partition::DayPartition;
use crate::storage::{self, StorageProviderRef};
use crate::warehouse::{LoadOutcome, REPORT_FORMAT, Warehouse};

/// Per-day counters reported by the load stage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub already_loaded: usize,
    pub failed: usize,
    pub invalid: usize,
}

impl LoadSummary {
    pub fn merge(&mut self, other: Self) {
        self.loaded += other.loaded;
        self.already_loaded += other.already_loaded;
        self.failed += other.failed;
        self.invalid += other.invalid;
    }
}

/// Loads staged objects into their warehouse tables and relocates loaded
/// files to the archive bucket.
pub struct LoadStage {
    staging: StorageProviderRef,
    archive: StorageProviderRef,
    warehouse: Arc<dyn Warehouse>,
    ledger: LedgerClient,
}

impl LoadStage {
    pub fn new(
        staging: StorageProviderRef,
        archive: StorageProviderRef,
        warehouse: Arc<dyn Warehouse>,
        ledger: LedgerClient,
    ) -> Self {
        Self {
            staging,
            archive,
            warehouse,
            ledger,
        }
    }

    /// Process every staged object under one day's partition prefix.
    ///
    /// Classification failures propagate and abort the run: file names
    /// must always match a known report type. A bulk-load rejection is
    /// recorded in the ledger and the object stays in staging for the
    /// next run.
    pub async fn run(&self, partition: &DayPartition) -> Result<LoadSummary, IngestError> {
        let objects = self.staging.list_prefix(&partition.prefix()).await?;
        let mut summary = LoadSummary::default();

        for object in objects {
            let table = TargetTable::classify(object.as_ref())?;
            let file_name = object.filename().unwrap_or_default();

            let contents = self.staging.read_text(&object).await?;
            let header = contents.lines().next().unwrap_or_default();
            let footer = contents.lines().last().unwrap_or_default();

            let metadata = match FileMetadata::parse(file_name, header, footer) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(
                        object = %object,
                        error = %e,
                        "Malformed header/footer, leaving object in staging"
                    );
                    summary.invalid += 1;
                    continue;
                }
            };

            let status = self
                .ledger
                .lookup_status(&metadata.file_name, &metadata.business_date)
                .await?;

            match status {
                LoadStatus::Loaded => {
                    // Idempotent cleanup of files a prior partial run left
                    // behind: the warehouse already has the data.
                    info!(
                        object = %object,
                        business_date = %metadata.business_date,
                        "File already loaded, relocating to archive"
                    );
                    storage::relocate(&self.staging, &self.archive, &object).await?;
                    summary.already_loaded += 1;
                }
                LoadStatus::Pending => {
                    let outcome = self
                        .warehouse
                        .bulk_load(table, &contents, REPORT_FORMAT)
                        .await?;
                    match outcome {
                        LoadOutcome::Completed { output_rows } => {
                            self.ledger
                                .record_outcome(
                                    &metadata.file_name,
                                    &metadata.business_date,
                                    true,
                                    &format!("loaded {output_rows} rows"),
                                )
                                .await?;
                            storage::relocate(&self.staging, &self.archive, &object).await?;
                            info!(
                                object = %object,
                                table = table.table_name(),
                                rows = output_rows,
                                "Loaded file into warehouse"
                            );
                            summary.loaded += 1;
                        }
                        LoadOutcome::Failed { message } => {
                            self.ledger
                                .record_outcome(
                                    &metadata.file_name,
                                    &metadata.business_date,
                                    false,
                                    &message,
                                )
                                .await?;
                            warn!(
                                object = %object,
                                error = %message,
                                "Bulk load failed, leaving object in staging for retry"
                            );
                            summary.failed += 1;
                        }
                    }
                }
                LoadStatus::Absent => {
                    // No row exists yet: register with the load outcome in
                    // one insert instead of an update.
                    let outcome = self
                        .warehouse
                        .bulk_load(table, &contents, REPORT_FORMAT)
                        .await?;
                    let (is_loaded, log_detail) = match &outcome {
                        LoadOutcome::Completed { output_rows } => {
                            (true, format!("loaded {output_rows} rows"))
                        }
                        LoadOutcome::Failed { message } => (false, format!("Error: {message}")),
                    };
                    self.ledger
                        .insert(&LedgerEntry::with_outcome(
                            metadata.clone(),
                            is_loaded,
                            log_detail,
                        ))
                        .await?;
                    if is_loaded {
                        storage::relocate(&self.staging, &self.archive, &object).await?;
                        info!(
                            object = %object,
                            table = table.table_name(),
                            "Loaded unregistered file into warehouse"
                        );
                        summary.loaded += 1;
                    } else {
                        warn!(
                            object = %object,
                            "Bulk load of unregistered file failed, leaving object in staging"
                        );
                        summary.failed += 1;
                    }
                }
            }
        }

        Ok(summary)
    }
}
