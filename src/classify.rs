//! Report type classification by file naming convention.

use crate::error::{ClassifyError, UnknownFileTypeSnafu};

/// Warehouse tables that staged report files load into.
///
/// Every file in this source family belongs to exactly one table, routed
/// by a substring of its name. Anything else is an upstream contract
/// breach and fails classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTable {
    /// Portfolio account positions.
    Poapacc,
    /// Trade date activity.
    Tdact,
}

impl TargetTable {
    /// Classify an object name into its target table.
    pub fn classify(object_name: &str) -> Result<Self, ClassifyError> {
        if object_name.contains("poapacc") {
            Ok(TargetTable::Poapacc)
        } else if object_name.contains("tdact") {
            Ok(TargetTable::Tdact)
        } else {
            UnknownFileTypeSnafu {
                object: object_name,
            }
            .fail()
        }
    }

    /// Name of the warehouse table.
    pub fn table_name(self) -> &'static str {
        match self {
            TargetTable::Poapacc => "poapacc",
            TargetTable::Tdact => "tdact",
        }
    }

    /// Fixed column count of the table's report layout, used to screen
    /// malformed rows before a bulk load.
    pub fn column_count(self) -> usize {
        match self {
            TargetTable::Poapacc => 12,
            TargetTable::Tdact => 9,
        }
    }
}
