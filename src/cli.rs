//! Command-line interface.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;

use crate::ledger::DEFAULT_LEDGER_TABLE;

/// Moves report files from the incoming share into staging storage, loads
/// them into the warehouse, and archives them.
#[derive(Parser, Debug)]
#[command(version)]
pub struct CliArgs {
    /// End of the date window, YYYY-MM-DD (defaults to yesterday)
    #[arg(short = 'r', long)]
    pub run_date: Option<NaiveDate>,

    /// How many days back from the run date to process (inclusive)
    #[arg(short = 'd', long, default_value_t = 5)]
    pub days_ago: u32,

    /// Staging bucket URL holding uploaded files
    #[arg(long, default_value = "gs://gs-incoming-files")]
    pub source: String,

    /// Archive bucket URL for successfully processed files
    #[arg(long, default_value = "gs://gs-loaded-files")]
    pub destination: String,

    /// Root directory of the incoming file share
    #[arg(long, default_value = "/opt/BI/Incoming/GS")]
    pub incoming_root: PathBuf,

    /// Name of the ledger table recording per-file load status
    #[arg(long, default_value = DEFAULT_LEDGER_TABLE)]
    pub ledger_table: String,
}

impl CliArgs {
    /// Resolved end date: the explicit run date, or yesterday.
    pub fn end_date(&self) -> NaiveDate {
        self.run_date
            .unwrap_or_else(|| (Utc::now() - Duration::days(1)).date_naive())
    }
}
