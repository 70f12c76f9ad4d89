//! Date-partition paths for incoming and staged report files.
//!
//! Report files live under `YYYY/MM/DD/` partitions, both on the incoming
//! share and in the staging bucket. The same prefix keys the upload
//! destination, the staging listing, and the archive location.

use chrono::{Duration, NaiveDate};

/// strftime-style template for partition prefixes.
const PARTITION_TEMPLATE: &str = "%Y/%m/%d";

/// A single day's partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPartition {
    date: NaiveDate,
}

impl DayPartition {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Partition prefix, e.g. `2022/08/25`.
    pub fn prefix(&self) -> String {
        self.date.format(PARTITION_TEMPLATE).to_string()
    }

    /// Object path for a file within this partition.
    pub fn object_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.prefix())
    }
}

/// Enumerate each day in `[end - days_ago, end]`, oldest first.
pub fn enumerate_days(end: NaiveDate, days_ago: u32) -> Vec<DayPartition> {
    (0..=days_ago)
        .rev()
        .map(|back| DayPartition::new(end - Duration::days(i64::from(back))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_partition_prefix_format() {
        let partition = DayPartition::new(day(2022, 8, 25));
        assert_eq!(partition.prefix(), "2022/08/25");
        assert_eq!(
            partition.object_path("X_tdact_1.dat"),
            "2022/08/25/X_tdact_1.dat"
        );
    }

    #[test]
    fn test_enumerate_days_inclusive_ascending() {
        let days = enumerate_days(day(2022, 8, 25), 2);
        let dates: Vec<_> = days.iter().map(|p| p.prefix()).collect();
        assert_eq!(dates, vec!["2022/08/23", "2022/08/24", "2022/08/25"]);
    }

    #[test]
    fn test_enumerate_days_zero_offset() {
        let days = enumerate_days(day(2022, 8, 25), 0);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].prefix(), "2022/08/25");
    }

    #[test]
    fn test_enumerate_days_crosses_month_boundary() {
        let days = enumerate_days(day(2022, 9, 1), 2);
        let dates: Vec<_> = days.iter().map(|p| p.prefix()).collect();
        assert_eq!(dates, vec!["2022/08/30", "2022/08/31", "2022/09/01"]);
    }
}
