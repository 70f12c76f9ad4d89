//! Warehouse access: ledger queries and bulk loads.
//!
//! The `Warehouse` trait is the seam between the pipeline and the actual
//! warehouse. Stages receive it as an injected handle scoped to the run;
//! tests substitute an in-memory implementation.

mod copy;
mod postgres;

pub use copy::{BadRecords, CopyPayload, prepare_copy_payload};
pub use postgres::PostgresWarehouse;

use async_trait::async_trait;

use crate::classify::TargetTable;
use crate::error::WarehouseError;
use crate::ledger::LedgerEntry;

/// Fixed column order of the load-status ledger table.
pub const LEDGER_COLUMNS: [&str; 10] = [
    "file_report_item_name",
    "file_report_item_id",
    "file_run_date",
    "file_fund_id",
    "file_advisor",
    "file_business_date",
    "file_record_count",
    "file_name",
    "is_loaded",
    "log_detail",
];

/// Bulk-load format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadFormat {
    /// Field delimiter of the report rows.
    pub delimiter: char,
    /// Leading non-data lines skipped before the records.
    pub skip_leading_rows: usize,
    /// Rows with the wrong field count tolerated before the job fails.
    pub max_bad_records: usize,
}

/// Format shared by every report in this source family: pipe-delimited,
/// two leading non-data lines, trailer tolerated as the one bad record.
pub const REPORT_FORMAT: LoadFormat = LoadFormat {
    delimiter: '|',
    skip_leading_rows: 2,
    max_bad_records: 1,
};

/// Outcome of a bulk-load job.
///
/// A failed job is an expected, recordable result that leaves the file in
/// staging for a later retry; transport failures surface as
/// `WarehouseError` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The job completed and reported its output row count.
    Completed { output_rows: u64 },
    /// The warehouse rejected the job.
    Failed { message: String },
}

/// Operations the pipeline needs from the warehouse.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Exact-match lookup of a ledger row's `is_loaded` flag for the given
    /// key. `None` means no row exists; a NULL flag reads as `false`.
    async fn query_ledger(
        &self,
        table: &str,
        file_name: &str,
        business_date: &str,
    ) -> Result<Option<bool>, WarehouseError>;

    /// Append a new ledger row.
    async fn insert_ledger_row(
        &self,
        table: &str,
        entry: &LedgerEntry,
    ) -> Result<(), WarehouseError>;

    /// Update status and detail of an existing ledger row.
    async fn update_ledger_row(
        &self,
        table: &str,
        file_name: &str,
        business_date: &str,
        is_loaded: bool,
        log_detail: &str,
    ) -> Result<(), WarehouseError>;

    /// Run a bulk-load job for the given report contents into the target
    /// table.
    async fn bulk_load(
        &self,
        table: TargetTable,
        contents: &str,
        format: LoadFormat,
    ) -> Result<LoadOutcome, WarehouseError>;
}
