//! Typed metadata extracted from report file header and footer lines.

use snafu::prelude::*;

use crate::error::{MalformedSegmentSnafu, MetadataError, RecordCountFieldSnafu};

/// Leading token of the first line of every report file.
pub const HEADER_PREFIX: &str = "HEADER|";
/// Literal prefix embedded in the header's first field.
pub const HEADER_DATA_PREFIX: &str = "DATA:";
/// Leading token of the last line of every report file.
pub const TRAILER_PREFIX: &str = "TRAILER";

/// Number of metadata fields carried by header and footer combined.
const FIELD_COUNT: usize = 7;

/// Metadata for a single report file, parsed from its header and footer.
///
/// Field order matches the ledger table's declared column order, so the
/// positional contract between extractor and schema is enforced by this
/// type rather than by convention. `(file_name, business_date)` is the
/// natural key used everywhere downstream. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub report_item_name: String,
    pub report_item_id: String,
    pub run_date: String,
    pub fund_id: String,
    pub advisor: String,
    /// Date extracted from file content, not upload date. Part of the
    /// idempotency key.
    pub business_date: String,
    pub record_count: u64,
    pub file_name: String,
}

impl FileMetadata {
    /// Parse metadata from a file's raw header and footer lines.
    ///
    /// Strips the `HEADER|`, `DATA:`, and `TRAILER|` literals, joins
    /// header and footer with `|`, and splits the result into `key: value`
    /// segments. The seven values map positionally onto the named fields.
    pub fn parse(file_name: &str, header: &str, footer: &str) -> Result<Self, MetadataError> {
        let header = header
            .replace(HEADER_PREFIX, "")
            .replace(HEADER_DATA_PREFIX, "");
        let footer = footer.replace("TRAILER|", "");
        let combined = format!("{header}|{footer}");

        let mut values = Vec::with_capacity(FIELD_COUNT);
        for segment in combined.split('|') {
            let (_, value) = segment
                .split_once(": ")
                .context(MalformedSegmentSnafu { segment })?;
            values.push(value.to_string());
        }

        let [report_item_name, report_item_id, run_date, fund_id, advisor, business_date, raw_count]: [String; FIELD_COUNT] =
            values
                .try_into()
                .map_err(|v: Vec<String>| MetadataError::FieldCount { count: v.len() })?;

        let record_count = raw_count
            .parse()
            .context(RecordCountFieldSnafu {
                value: raw_count.as_str(),
            })?;

        Ok(Self {
            report_item_name,
            report_item_id,
            run_date,
            fund_id,
            advisor,
            business_date,
            record_count,
            file_name: file_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "HEADER|DATA:Report Item Name: Trade Date Activity\
        |Report Item Id: 1200357639|Run Date: 2022/08/25|Fund Id: 111|Advisor: GOG";
    const FOOTER: &str = "TRAILER|Business Date: 2022/08/24|Record Count: 10";

    #[test]
    fn test_parse_maps_fields_in_order() {
        let metadata = FileMetadata::parse("X_tdact_1.dat", HEADER, FOOTER).unwrap();

        assert_eq!(metadata.report_item_name, "Trade Date Activity");
        assert_eq!(metadata.report_item_id, "1200357639");
        assert_eq!(metadata.run_date, "2022/08/25");
        assert_eq!(metadata.fund_id, "111");
        assert_eq!(metadata.advisor, "GOG");
        assert_eq!(metadata.business_date, "2022/08/24");
        assert_eq!(metadata.record_count, 10);
        assert_eq!(metadata.file_name, "X_tdact_1.dat");
    }

    #[test]
    fn test_parse_rejects_segment_without_separator() {
        let footer = "TRAILER|Business Date: 2022/08/24|RecordCount10";
        let err = FileMetadata::parse("f.dat", HEADER, footer).unwrap_err();
        assert!(matches!(err, MetadataError::MalformedSegment { .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let footer = "TRAILER|Record Count: 10";
        let err = FileMetadata::parse("f.dat", HEADER, footer).unwrap_err();
        assert!(matches!(err, MetadataError::FieldCount { count: 6 }));
    }

    #[test]
    fn test_parse_rejects_non_numeric_record_count() {
        let footer = "TRAILER|Business Date: 2022/08/24|Record Count: ten";
        let err = FileMetadata::parse("f.dat", HEADER, footer).unwrap_err();
        assert!(matches!(err, MetadataError::RecordCountField { .. }));
    }
}
