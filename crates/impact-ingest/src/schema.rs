//! Column schemas for the three input tables.
//!
//! Column names are exact, including spacing; the header row is required.
//! A missing required column fails that table's load and nothing else.

use csv::StringRecord;

use crate::error::{IngestError, IngestResult};

/// Expectations table columns.
pub mod expectations {
    pub const TABLE: &str = "expectations";
    pub const INITIATIVE_ID: &str = "Initiative ID";
    pub const METRIC: &str = "Metric";
    pub const BASELINE: &str = "Baseline";
    pub const TARGET_2030: &str = "Target 2030";
    pub const TARGET_2045: &str = "Target 2045";
    pub const EXPECTATION_TYPE: &str = "Expectation Type";

    pub const REQUIRED: &[&str] = &[
        INITIATIVE_ID,
        METRIC,
        BASELINE,
        TARGET_2030,
        TARGET_2045,
        EXPECTATION_TYPE,
    ];
}

/// Performance table columns.
pub mod performance {
    pub const TABLE: &str = "performance";
    pub const INITIATIVE_ID: &str = "Initiative ID";
    pub const METRIC: &str = "Metric";
    pub const YEAR: &str = "Year";
    pub const ACTUAL_VALUE: &str = "Actual Value";
    pub const DATA_SOURCE: &str = "Data Source";
    pub const QUALITY: &str = "Quality";

    pub const REQUIRED: &[&str] = &[
        INITIATIVE_ID,
        METRIC,
        YEAR,
        ACTUAL_VALUE,
        DATA_SOURCE,
        QUALITY,
    ];
}

/// Evidence table columns.
pub mod evidence {
    pub const TABLE: &str = "evidence";
    pub const INITIATIVE_ID: &str = "Initiative ID";
    pub const EVIDENCE_TYPE: &str = "Evidence Type";
    pub const CONFIDENCE_SCORE: &str = "Confidence Score";
    pub const LINK_SUMMARY: &str = "Link / Summary";

    pub const REQUIRED: &[&str] = &[
        INITIATIVE_ID,
        EVIDENCE_TYPE,
        CONFIDENCE_SCORE,
        LINK_SUMMARY,
    ];
}

/// Column-name → index lookup for one table's header row.
#[derive(Clone, Debug)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Validate that `headers` carries every required column of `table`.
    pub fn validate(
        table: &'static str,
        required: &'static [&'static str],
        headers: &StringRecord,
    ) -> IngestResult<Self> {
        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        for &column in required {
            if !columns.iter().any(|c| c == column) {
                return Err(IngestError::MissingColumn { table, column });
            }
        }
        Ok(Self { columns })
    }

    /// Index of a column, if present.
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Field value of `record` under `column`, trimmed.
    pub fn field<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.index_of(column)
            .and_then(|idx| record.get(idx))
            .map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn complete_header_validates() {
        let headers = record(expectations::REQUIRED);
        let header =
            Header::validate(expectations::TABLE, expectations::REQUIRED, &headers).unwrap();
        assert_eq!(header.index_of(expectations::BASELINE), Some(2));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let headers = record(&["Initiative ID", "Metric", "Baseline"]);
        let err =
            Header::validate(expectations::TABLE, expectations::REQUIRED, &headers).unwrap_err();
        match err {
            IngestError::MissingColumn { table, column } => {
                assert_eq!(table, "expectations");
                assert_eq!(column, "Target 2030");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let mut fields: Vec<&str> = performance::REQUIRED.to_vec();
        fields.push("Notes");
        let header =
            Header::validate(performance::TABLE, performance::REQUIRED, &record(&fields)).unwrap();
        assert_eq!(header.index_of("Notes"), Some(6));
    }

    #[test]
    fn header_whitespace_is_trimmed() {
        let headers = record(&[
            " Initiative ID ",
            "Evidence Type",
            "Confidence Score",
            "Link / Summary",
        ]);
        let header = Header::validate(evidence::TABLE, evidence::REQUIRED, &headers).unwrap();
        assert_eq!(header.index_of(evidence::INITIATIVE_ID), Some(0));
    }

    #[test]
    fn field_lookup_trims_values() {
        let headers = record(&["Initiative ID", "Metric"]);
        let header = Header::validate("test", &[], &headers).unwrap();
        let row = record(&[" INIT-01 ", "Active Users"]);
        assert_eq!(header.field(&row, "Initiative ID"), Some("INIT-01"));
        assert_eq!(header.field(&row, "Missing"), None);
    }
}
