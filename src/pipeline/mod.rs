//! Day-by-day ingestion driver.
//!
//! Enumerates the requested date range oldest-first and runs the transfer
//! stage then the load stage for each day. Each day finishes before the
//! next begins. Ledger and classification failures abort the run; any
//! other day-level failure is logged and processing continues with the
//! next day.

mod load;
mod transfer;

pub use load::{LoadStage, LoadSummary};
pub use transfer::{TransferStage, TransferSummary};

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{error, info};

use crate::error::IngestError;
use crate::partition::{DayPartition, enumerate_days};

/// Counters merged across all processed days.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub days: usize,
    pub transfer: TransferSummary,
    pub load: LoadSummary,
}

/// Drives one ingestion run over a date window.
pub struct Ingestor {
    transfer: TransferStage,
    load: LoadStage,
    incoming_root: PathBuf,
}

impl Ingestor {
    pub fn new(transfer: TransferStage, load: LoadStage, incoming_root: PathBuf) -> Self {
        Self {
            transfer,
            load,
            incoming_root,
        }
    }

    /// Process each day in `[end - days_ago, end]`, oldest first.
    pub async fn run(&self, end: NaiveDate, days_ago: u32) -> Result<RunSummary, IngestError> {
        let mut summary = RunSummary::default();

        for partition in enumerate_days(end, days_ago) {
            info!(date = %partition.date(), "Processing partition");
            match self.process_day(&partition).await {
                Ok((transfer, load)) => {
                    summary.transfer.merge(transfer);
                    summary.load.merge(load);
                    summary.days += 1;
                }
                Err(e) if e.is_process_fatal() => return Err(e),
                Err(e) => {
                    error!(
                        date = %partition.date(),
                        error = %e,
                        "Day failed, continuing with next day"
                    );
                }
            }
        }

        Ok(summary)
    }

    async fn process_day(
        &self,
        partition: &DayPartition,
    ) -> Result<(TransferSummary, LoadSummary), IngestError> {
        let transfer = self.transfer.run(&self.incoming_root, partition).await?;
        let load = self.load.run(partition).await?;
        Ok((transfer, load))
    }
}
