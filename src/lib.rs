//! Spindrift: report file loader for a fund-report data source.
//!
//! This crate handles:
//! - Structural validation of incoming pipe-delimited report files
//! - Uploading validated files from the share into a staging bucket
//! - Bulk-loading staged files into the matching warehouse table
//! - Recording per-file load status in an idempotency ledger
//! - Relocating loaded files to an archive bucket
//!
//! The ledger guarantees each file is loaded at most once: reruns over the
//! same date range converge without duplicate loads or lost files.

pub mod classify;
pub mod cli;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod metadata;
pub mod partition;
pub mod pipeline;
pub mod storage;
pub mod validate;
pub mod warehouse;

// Re-export commonly used items
pub use cli::CliArgs;
pub use error::IngestError;
pub use ledger::{LedgerClient, LedgerEntry, LoadStatus};
pub use logging::init_tracing;
pub use metadata::FileMetadata;
pub use pipeline::{Ingestor, LoadStage, RunSummary, TransferStage};
pub use storage::{StorageProvider, StorageProviderRef};
pub use warehouse::{LoadOutcome, PostgresWarehouse, Warehouse};
