//! Structural integrity checks for incoming report files.
//!
//! A report file is structurally sound when its last line carries the
//! trailer token and the number of data rows matches the record count the
//! trailer declares. Validation has no side effects beyond reading the
//! file and returns an explicit result so callers can skip a corrupt file
//! without unwinding.

use std::path::Path;

use snafu::prelude::*;

use crate::error::{
    MetadataSnafu, MissingFileSnafu, MissingFooterSnafu, MissingRecordCountSnafu,
    RecordCountMismatchSnafu, ValidationError,
};
use crate::metadata::{FileMetadata, TRAILER_PREFIX};

/// Lines that are not data records: header, trailer, and the fixed
/// structural line between header and data.
pub const NON_RECORD_LINES: u64 = 3;

/// Validate a report file on the share and extract its metadata.
///
/// Fails with `MissingFile` when the path does not exist, `MissingFooter`
/// when the trailer token is absent, and `RecordCountMismatch` when
/// `total lines - 3` differs from the trailer's declared record count.
pub async fn validate_file(path: &Path) -> Result<FileMetadata, ValidationError> {
    let file = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return MissingFileSnafu { path }.fail();
        }
        Err(source) => {
            return Err(ValidationError::ReadFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let lines: Vec<&str> = contents.lines().collect();
    let header = lines.first().copied().unwrap_or_default();
    let footer = lines.last().copied().unwrap_or_default();

    let mut footer_fields = footer.split('|');
    ensure!(
        footer_fields.next() == Some(TRAILER_PREFIX),
        MissingFooterSnafu { file }
    );

    let declared = footer_fields
        .filter_map(|field| field.split_once(": "))
        .find(|(key, _)| *key == "Record Count")
        .and_then(|(_, value)| value.parse::<u64>().ok())
        .context(MissingRecordCountSnafu { file: file.as_str() })?;

    let counted = (lines.len() as u64).saturating_sub(NON_RECORD_LINES);
    ensure!(
        lines.len() as u64 >= NON_RECORD_LINES && counted == declared,
        RecordCountMismatchSnafu {
            file: file.as_str(),
            expected: declared,
            counted,
        }
    );

    FileMetadata::parse(&file, header, footer).context(MetadataSnafu)
}
