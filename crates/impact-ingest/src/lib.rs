//! # impact-ingest
//!
//! CSV ingestion for the impact derivation layer. Loads the three input
//! tables (expectations, performance, evidence) into the row types consumed
//! by [`impact_core`], with header validation, per-row error reporting, and
//! per-table failure isolation, plus the optional metric-rationale JSON
//! passthrough.
//!
//! ## Error model
//!
//! - A missing required column fails that one table's load; the snapshot
//!   keeps the other tables and derivation degrades instead of dying.
//! - A row with a bad numeric field is excluded and reported on the load's
//!   side channel with its row number; the rest of the table loads.
//! - A malformed rationale file is an error to the caller, never a panic.

#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod rationale;
pub mod schema;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use error::{IngestError, IngestResult, RowError};
pub use loader::{
    load_evidence, load_expectations, load_performance, DataSnapshot, TableLoad,
};
pub use rationale::{MetricRationale, RationaleMap};
pub use schema::Header;

#[cfg(test)]
mod tests {
    use super::*;
    use impact_core::{Status, SummaryConfig};

    #[test]
    fn integration_csv_to_summaries() {
        let expectations = "\
Initiative ID,Metric,Baseline,Target 2030,Target 2045,Expectation Type
LEARNVIA,Course Success Rate,60,75,85,topline
LEARNVIA,Equity Gap,12,6,3,topline
GHOST,Unseen Metric,0,10,20,intermediate
";
        let performance = "\
Initiative ID,Metric,Year,Actual Value,Data Source,Quality
LEARNVIA,Course Success Rate,2022,62,Institution records,High
LEARNVIA,Course Success Rate,2024,72,Institution records,High
LEARNVIA,Equity Gap,2022,11,Institution records,Medium
LEARNVIA,Equity Gap,2024,9,Institution records,Medium
";
        let evidence = "\
Initiative ID,Evidence Type,Confidence Score,Link / Summary
LEARNVIA,RCT,3,Randomized pilot
LEARNVIA,QED,2,Matched-cohort study
LEARNVIA,Descriptive,2,Term-over-term trends
";

        let snapshot = DataSnapshot::load(
            expectations.as_bytes(),
            performance.as_bytes(),
            evidence.as_bytes(),
        );
        assert!(snapshot.load_failures.is_empty());

        let out = snapshot.summaries(&SummaryConfig::default());
        assert_eq!(out.summaries.len(), 3);

        // Success rate: (72 - 60) / (75 - 60) = 80% ⇒ On Track.
        let success = &out.summaries[0];
        assert_eq!(success.status(), Some(Status::OnTrack));
        // Slope (72 - 62) / 2 = 5 per year, projected to 2030.
        let projection = success.projection.as_ref().unwrap();
        assert_eq!(projection.slope, 5.0);
        assert_eq!(projection.projected_value, 72.0 + 5.0 * 6.0);

        // Equity gap is lower-is-better: (12 - 9) / (12 - 6) = 50% ⇒ At Risk.
        let gap = &out.summaries[1];
        assert!(gap.lower_is_better);
        assert_eq!(gap.status(), Some(Status::AtRisk));

        // Mean confidence (3 + 2 + 2) / 3 = 2.33 ⇒ grade B.
        let grade = success.evidence_grade.as_ref().unwrap();
        assert_eq!(grade.grade, impact_core::Grade::B);

        // The GHOST initiative has no performance or evidence rows: its
        // summary exists with absent derived fields.
        let ghost = &out.summaries[2];
        assert_eq!(ghost.latest_actual, None);
        assert_eq!(ghost.status(), None);
        assert_eq!(out.rollup.not_computable, 1);
    }
}
