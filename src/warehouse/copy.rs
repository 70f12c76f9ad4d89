//! Preparation of bulk-load payloads from raw report text.
//!
//! Implements the load format generically: leading non-data lines are
//! skipped and rows whose field count does not match the table layout are
//! screened out, up to the format's tolerance. For well-formed reports the
//! single screened row is the trailer line.

use super::LoadFormat;

/// Prepared payload ready for the warehouse, with its data row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPayload {
    pub data: String,
    pub row_count: u64,
}

/// Job-level rejection: more malformed rows than the format tolerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadRecords {
    pub found: usize,
    pub allowed: usize,
}

impl BadRecords {
    pub fn message(&self) -> String {
        format!(
            "bulk load rejected: {} malformed records exceed the allowed {}",
            self.found, self.allowed
        )
    }
}

/// Apply the load format to raw report text.
pub fn prepare_copy_payload(
    contents: &str,
    format: &LoadFormat,
    column_count: usize,
) -> Result<CopyPayload, BadRecords> {
    let mut data = String::new();
    let mut row_count = 0u64;
    let mut bad = 0usize;

    for line in contents.lines().skip(format.skip_leading_rows) {
        if line.is_empty() {
            continue;
        }
        if line.split(format.delimiter).count() != column_count {
            bad += 1;
            if bad > format.max_bad_records {
                return Err(BadRecords {
                    found: bad,
                    allowed: format.max_bad_records,
                });
            }
            continue;
        }
        data.push_str(line);
        data.push('\n');
        row_count += 1;
    }

    Ok(CopyPayload { data, row_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::REPORT_FORMAT;

    fn report(rows: &[&str]) -> String {
        let mut text = String::from("HEADER|DATA:Report Item Name: T|Report Item Id: 1\n");
        text.push_str("ColA|ColB|ColC\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.push_str("TRAILER|Business Date: 2022/08/24|Record Count: 2\n");
        text
    }

    #[test]
    fn test_payload_skips_leading_rows_and_trailer() {
        let text = report(&["a|b|c", "d|e|f"]);
        let payload = prepare_copy_payload(&text, &REPORT_FORMAT, 3).unwrap();

        assert_eq!(payload.row_count, 2);
        assert_eq!(payload.data, "a|b|c\nd|e|f\n");
    }

    #[test]
    fn test_payload_rejects_excess_bad_rows() {
        // One malformed data row plus the trailer exceeds the tolerance of 1.
        let text = report(&["a|b|c", "malformed"]);
        let err = prepare_copy_payload(&text, &REPORT_FORMAT, 3).unwrap_err();

        assert_eq!(
            err,
            BadRecords {
                found: 2,
                allowed: 1
            }
        );
    }

    #[test]
    fn test_payload_empty_report() {
        let text = report(&[]);
        let payload = prepare_copy_payload(&text, &REPORT_FORMAT, 3).unwrap();

        assert_eq!(payload.row_count, 0);
        assert!(payload.data.is_empty());
    }
}
