//! Error types for the spindrift report loader.

use std::path::PathBuf;

use snafu::prelude::*;

// ============ Storage Errors ============

/// Errors that can occur during storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// Invalid storage URL format.
    #[snafu(display("Invalid storage URL: {url}"))]
    InvalidUrl { url: String },

    /// Object store operation failed.
    #[snafu(display("Storage operation failed: {source}"))]
    ObjectStore { source: object_store::Error },

    /// IO error during storage operations.
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// GCS configuration error.
    #[snafu(display("GCS configuration error: {source}"))]
    GcsConfig { source: object_store::Error },

    /// S3 configuration error.
    #[snafu(display("S3 configuration error: {source}"))]
    S3Config { source: object_store::Error },

    /// Object contents were not valid UTF-8.
    #[snafu(display("Object {path} is not valid UTF-8"))]
    Utf8 {
        path: String,
        source: std::string::FromUtf8Error,
    },
}

// ============ Metadata Errors ============

/// Errors raised while parsing header/footer metadata.
///
/// All variants are refinements of a single condition: the header/footer
/// text does not follow the `key: value` segment format.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MetadataError {
    /// A `|`-separated segment had no `": "` separator.
    #[snafu(display("Malformed header/footer segment (expected `key: value`): {segment}"))]
    MalformedSegment { segment: String },

    /// Header and footer together did not yield the expected field count.
    #[snafu(display("Expected 7 metadata fields in header/footer, found {count}"))]
    FieldCount { count: usize },

    /// The record count field was not an integer.
    #[snafu(display("Record count field is not an integer: {value}"))]
    RecordCountField {
        value: String,
        source: std::num::ParseIntError,
    },
}

// ============ Validation Errors ============

/// Errors raised by the integrity validator. All are per-file and
/// recoverable: the caller skips the file and continues.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ValidationError {
    /// The file does not exist on the share.
    #[snafu(display("Missing file: {}", path.display()))]
    MissingFile { path: PathBuf },

    /// Failed to read the file.
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The last line does not carry the trailer token.
    #[snafu(display(
        "Missing footer: {file}. File is probably incomplete, verify upstream file handling"
    ))]
    MissingFooter { file: String },

    /// The footer has no parsable record count field.
    #[snafu(display("Missing record count in footer: {file}"))]
    MissingRecordCount { file: String },

    /// The declared record count does not match the counted data rows.
    #[snafu(display(
        "File length check failed: {file}. Counted {counted} records but expected \
         {expected} records as specified in file footer"
    ))]
    RecordCountMismatch {
        file: String,
        expected: u64,
        counted: u64,
    },

    /// Header/footer metadata could not be parsed.
    #[snafu(display("Metadata error: {source}"))]
    Metadata { source: MetadataError },
}

// ============ Classification Errors ============

/// Errors raised by report type classification. Treated as fatal for the
/// run: an unrecognized file name signals an upstream contract breach.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClassifyError {
    /// The object name matches no known report type.
    #[snafu(display("Unknown file type: {object}"))]
    UnknownFileType { object: String },
}

// ============ Warehouse Errors ============

/// Errors raised by the warehouse client.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WarehouseError {
    /// SQL query or connection failure.
    #[snafu(display("Warehouse query failed: {source}"))]
    Sql { source: sqlx::Error },
}

// ============ Ledger Errors ============

/// Errors raised by the ledger client. The ledger is the correctness
/// anchor, so these are never swallowed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LedgerError {
    /// Status lookup failed.
    #[snafu(display("Ledger lookup failed: {source}"))]
    Lookup { source: WarehouseError },

    /// Row insert failed.
    #[snafu(display("Ledger insert failed: {source}"))]
    Insert { source: WarehouseError },

    /// Row update failed.
    #[snafu(display("Ledger update failed: {source}"))]
    Update { source: WarehouseError },
}

// ============ Ingest Errors ============

/// Top-level ingestion errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum IngestError {
    /// Storage error.
    #[snafu(display("Storage error: {source}"))]
    Storage { source: StorageError },

    /// Ledger error.
    #[snafu(display("Ledger error: {source}"))]
    Ledger { source: LedgerError },

    /// Warehouse error.
    #[snafu(display("Warehouse error: {source}"))]
    Warehouse { source: WarehouseError },

    /// Classification error.
    #[snafu(display("Classification error: {source}"))]
    Classify { source: ClassifyError },

    /// IO error on the incoming share.
    #[snafu(display("IO error on {}: {source}", path.display()))]
    ShareIo {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IngestError {
    /// Errors that must abort the whole run rather than just the current
    /// day: the ledger cannot guarantee correctness, or classification
    /// found an upstream contract breach.
    pub fn is_process_fatal(&self) -> bool {
        matches!(
            self,
            IngestError::Ledger { .. } | IngestError::Classify { .. }
        )
    }
}

impl From<StorageError> for IngestError {
    fn from(source: StorageError) -> Self {
        IngestError::Storage { source }
    }
}

impl From<LedgerError> for IngestError {
    fn from(source: LedgerError) -> Self {
        IngestError::Ledger { source }
    }
}

impl From<WarehouseError> for IngestError {
    fn from(source: WarehouseError) -> Self {
        IngestError::Warehouse { source }
    }
}

impl From<ClassifyError> for IngestError {
    fn from(source: ClassifyError) -> Self {
        IngestError::Classify { source }
    }
}
