//! Error types for table ingestion.

use thiserror::Error;

/// Errors that fail a whole table load.
///
/// Only a structural problem (unreadable input, broken CSV framing, missing
/// required column) is fatal, and then only for the one table being loaded;
/// bad values in individual rows are collected on the load's side channel
/// instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required column is missing from the header row.
    #[error("table {table}: required column \"{column}\" is missing")]
    MissingColumn {
        /// Which table was being loaded.
        table: &'static str,
        /// The column the header row lacks.
        column: &'static str,
    },

    /// The input could not be read at all.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV structure itself is broken (not a bad value in one field).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The rationale file is not valid JSON.
    #[error("rationale file is not valid JSON: {0}")]
    RationaleFormat(#[from] serde_json::Error),
}

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// A single row that failed to parse and was excluded from the load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowError {
    /// 1-based data row number (excluding the header).
    pub row: usize,
    /// Column whose value was rejected.
    pub column: String,
    /// What was wrong with it.
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: column \"{}\": {}", self.row, self.column, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_display() {
        let err = IngestError::MissingColumn {
            table: "expectations",
            column: "Baseline",
        };
        assert_eq!(
            err.to_string(),
            "table expectations: required column \"Baseline\" is missing"
        );
    }

    #[test]
    fn row_error_display() {
        let err = RowError {
            row: 3,
            column: "Actual Value".into(),
            message: "invalid float literal".into(),
        };
        assert_eq!(
            err.to_string(),
            "row 3: column \"Actual Value\": invalid float literal"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IngestError>();
        assert_send_sync::<RowError>();
    }
}
