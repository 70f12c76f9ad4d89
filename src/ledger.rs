//! Load-status ledger: the durable record of which files have been
//! registered and loaded.
//!
//! The ledger is the single source of truth consulted and updated by both
//! pipeline stages, keyed by `(file_name, business_date)`. Rows are never
//! deleted; registration appends and load outcomes update in place, so the
//! table doubles as the audit trail.

use std::sync::Arc;

use snafu::prelude::*;

use crate::error::{InsertSnafu, LedgerError, LookupSnafu, UpdateSnafu};
use crate::metadata::FileMetadata;
use crate::warehouse::Warehouse;

/// Default name of the ledger table.
pub const DEFAULT_LEDGER_TABLE: &str = "file_load_log";

/// Tri-state load status for a `(file_name, business_date)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No ledger row exists: the file was never registered.
    Absent,
    /// A row exists but the file has not been successfully loaded
    /// (registered, or a prior load attempt failed).
    Pending,
    /// The file was loaded. Terminal: never transitions back.
    Loaded,
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub metadata: FileMetadata,
    pub is_loaded: bool,
    pub log_detail: String,
}

impl LedgerEntry {
    /// Row for a file registered by the transfer stage, not yet loaded.
    pub fn registered(metadata: FileMetadata) -> Self {
        Self {
            metadata,
            is_loaded: false,
            log_detail: "registered, awaiting load".to_string(),
        }
    }

    /// Row carrying a load outcome, for files first seen by the load stage.
    pub fn with_outcome(metadata: FileMetadata, is_loaded: bool, log_detail: String) -> Self {
        Self {
            metadata,
            is_loaded,
            log_detail,
        }
    }
}

/// Client for the ledger table.
///
/// Every failure is surfaced to the caller: the ledger anchors the
/// at-most-once guarantee, so processing must not continue past an error.
#[derive(Clone)]
pub struct LedgerClient {
    warehouse: Arc<dyn Warehouse>,
    table: String,
}

impl LedgerClient {
    pub fn new(warehouse: Arc<dyn Warehouse>, table: impl Into<String>) -> Self {
        Self {
            warehouse,
            table: table.into(),
        }
    }

    /// Look up the load status for a key with a single exact-match query.
    pub async fn lookup_status(
        &self,
        file_name: &str,
        business_date: &str,
    ) -> Result<LoadStatus, LedgerError> {
        let flag = self
            .warehouse
            .query_ledger(&self.table, file_name, business_date)
            .await
            .context(LookupSnafu)?;

        Ok(match flag {
            None => LoadStatus::Absent,
            Some(false) => LoadStatus::Pending,
            Some(true) => LoadStatus::Loaded,
        })
    }

    /// Register a file seen for the first time.
    pub async fn insert(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.warehouse
            .insert_ledger_row(&self.table, entry)
            .await
            .context(InsertSnafu)
    }

    /// Record a load outcome on an existing row.
    pub async fn record_outcome(
        &self,
        file_name: &str,
        business_date: &str,
        is_loaded: bool,
        log_detail: &str,
    ) -> Result<(), LedgerError> {
        self.warehouse
            .update_ledger_row(&self.table, file_name, business_date, is_loaded, log_detail)
            .await
            .context(UpdateSnafu)
    }
}
