//! CSV table loaders.
//!
//! Each loader validates the header, then parses rows one at a time into the
//! core row types. A row with a bad numeric field, a ragged shape, or broken
//! encoding is excluded and recorded on the load's error side channel; the
//! load itself only fails on structural problems (unreadable input, missing
//! required column).

use std::io::Read;

use chrono::{DateTime, Utc};
use csv::StringRecord;
use tracing::{debug, warn};

use impact_core::{
    compute_summaries, EvidenceRecord, EvidenceType, Expectation, ExpectationType, Observation,
    Summaries, SummaryConfig,
};

use crate::error::{IngestError, IngestResult, RowError};
use crate::schema::{evidence, expectations, performance, Header};

// ── Batch Result ────────────────────────────────────────────────────────

/// Result of loading one table: the rows that parsed, plus a side channel of
/// per-row findings.
///
/// `errors` holds both rows that were excluded and rows that loaded with a
/// fallback value; `skipped` counts only the exclusions.
#[derive(Clone, Debug)]
pub struct TableLoad<T> {
    /// Successfully parsed rows, in input order.
    pub rows: Vec<T>,
    /// Per-row findings (excluded rows and fallback substitutions).
    pub errors: Vec<RowError>,
    /// Number of rows excluded from `rows`.
    pub skipped: usize,
}

// Manual impl: an empty load needs no `T: Default`, and the row types
// deliberately have no meaningful default value.
impl<T> Default for TableLoad<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            errors: Vec::new(),
            skipped: 0,
        }
    }
}

impl<T> TableLoad<T> {
    fn exclude(&mut self, error: RowError) {
        warn!(%error, "row excluded");
        self.errors.push(error);
        self.skipped += 1;
    }
}

/// Reader used by every loader. Flexible: a ragged row (too few or too many
/// fields) is not a structural failure, it is a row whose missing fields get
/// caught by per-field validation.
fn table_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(reader)
}

/// A record the CSV layer itself rejected (for example invalid UTF-8).
fn record_error(row: usize, err: &csv::Error) -> RowError {
    RowError {
        row,
        column: "(record)".to_string(),
        message: err.to_string(),
    }
}

// ── Field Parsing ───────────────────────────────────────────────────────

fn required_field(
    header: &Header,
    record: &StringRecord,
    row: usize,
    column: &str,
) -> Result<String, RowError> {
    match header.field(record, column) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(RowError {
            row,
            column: column.to_string(),
            message: "value is empty".into(),
        }),
    }
}

fn numeric_field(
    header: &Header,
    record: &StringRecord,
    row: usize,
    column: &str,
) -> Result<f64, RowError> {
    let raw = required_field(header, record, row, column)?;
    raw.parse::<f64>().map_err(|_| RowError {
        row,
        column: column.to_string(),
        message: format!("\"{raw}\" is not a number"),
    })
}

fn year_field(
    header: &Header,
    record: &StringRecord,
    row: usize,
    column: &str,
) -> Result<i32, RowError> {
    let raw = required_field(header, record, row, column)?;
    match raw.parse::<i32>() {
        Ok(year) if year > 0 => Ok(year),
        _ => Err(RowError {
            row,
            column: column.to_string(),
            message: format!("\"{raw}\" is not a positive year"),
        }),
    }
}

fn confidence_field(
    header: &Header,
    record: &StringRecord,
    row: usize,
    column: &str,
) -> Result<u8, RowError> {
    let raw = required_field(header, record, row, column)?;
    let value: f64 = raw.parse().map_err(|_| RowError {
        row,
        column: column.to_string(),
        message: format!("\"{raw}\" is not a number"),
    })?;
    if value.fract() == 0.0 && (1.0..=3.0).contains(&value) {
        Ok(value as u8)
    } else {
        Err(RowError {
            row,
            column: column.to_string(),
            message: format!("\"{raw}\" is not a 1-3 integer score"),
        })
    }
}

// ── Table Loaders ───────────────────────────────────────────────────────

/// Load the expectations table.
pub fn load_expectations<R: Read>(reader: R) -> IngestResult<TableLoad<Expectation>> {
    let mut rdr = table_reader(reader);
    let header = Header::validate(
        expectations::TABLE,
        expectations::REQUIRED,
        rdr.headers()?,
    )?;

    let mut load = TableLoad::default();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                load.exclude(record_error(row, &err));
                continue;
            }
        };

        let parsed = (|| -> Result<Expectation, RowError> {
            let raw_type =
                required_field(&header, &record, row, expectations::EXPECTATION_TYPE)?;
            let expectation_type = match ExpectationType::parse(&raw_type) {
                Some(t) => t,
                None => {
                    // Presentational field: substitute rather than drop the row.
                    load.errors.push(RowError {
                        row,
                        column: expectations::EXPECTATION_TYPE.to_string(),
                        message: format!(
                            "unrecognized type \"{raw_type}\", treated as intermediate"
                        ),
                    });
                    ExpectationType::Intermediate
                }
            };
            Ok(Expectation {
                initiative_id: required_field(&header, &record, row, expectations::INITIATIVE_ID)?,
                metric: required_field(&header, &record, row, expectations::METRIC)?,
                baseline: numeric_field(&header, &record, row, expectations::BASELINE)?,
                target_2030: numeric_field(&header, &record, row, expectations::TARGET_2030)?,
                target_2045: numeric_field(&header, &record, row, expectations::TARGET_2045)?,
                expectation_type,
            })
        })();

        match parsed {
            Ok(expectation) => load.rows.push(expectation),
            Err(error) => load.exclude(error),
        }
    }

    debug!(rows = load.rows.len(), skipped = load.skipped, "loaded expectations");
    Ok(load)
}

/// Load the performance table.
pub fn load_performance<R: Read>(reader: R) -> IngestResult<TableLoad<Observation>> {
    let mut rdr = table_reader(reader);
    let header = Header::validate(performance::TABLE, performance::REQUIRED, rdr.headers()?)?;

    let mut load = TableLoad::default();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                load.exclude(record_error(row, &err));
                continue;
            }
        };

        let parsed = (|| -> Result<Observation, RowError> {
            Ok(Observation {
                initiative_id: required_field(&header, &record, row, performance::INITIATIVE_ID)?,
                metric: required_field(&header, &record, row, performance::METRIC)?,
                year: year_field(&header, &record, row, performance::YEAR)?,
                actual_value: numeric_field(&header, &record, row, performance::ACTUAL_VALUE)?,
                data_source: header
                    .field(&record, performance::DATA_SOURCE)
                    .unwrap_or_default()
                    .to_string(),
                quality: header
                    .field(&record, performance::QUALITY)
                    .unwrap_or_default()
                    .to_string(),
            })
        })();

        match parsed {
            Ok(observation) => load.rows.push(observation),
            Err(error) => load.exclude(error),
        }
    }

    debug!(rows = load.rows.len(), skipped = load.skipped, "loaded performance");
    Ok(load)
}

/// Load the evidence table.
pub fn load_evidence<R: Read>(reader: R) -> IngestResult<TableLoad<EvidenceRecord>> {
    let mut rdr = table_reader(reader);
    let header = Header::validate(evidence::TABLE, evidence::REQUIRED, rdr.headers()?)?;

    let mut load = TableLoad::default();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                load.exclude(record_error(row, &err));
                continue;
            }
        };

        let parsed = (|| -> Result<EvidenceRecord, RowError> {
            Ok(EvidenceRecord {
                initiative_id: required_field(&header, &record, row, evidence::INITIATIVE_ID)?,
                evidence_type: EvidenceType::parse(
                    &required_field(&header, &record, row, evidence::EVIDENCE_TYPE)?,
                ),
                confidence: confidence_field(&header, &record, row, evidence::CONFIDENCE_SCORE)?,
                link_summary: header
                    .field(&record, evidence::LINK_SUMMARY)
                    .unwrap_or_default()
                    .to_string(),
            })
        })();

        match parsed {
            Ok(record) => load.rows.push(record),
            Err(error) => load.exclude(error),
        }
    }

    debug!(rows = load.rows.len(), skipped = load.skipped, "loaded evidence");
    Ok(load)
}

// ── Snapshot ────────────────────────────────────────────────────────────

/// The current state of all three tables, loaded together.
///
/// A table whose load failed structurally is `None` and its error is kept in
/// `load_failures`; the rest of the snapshot still works. Derivation over a
/// missing table sees an empty one.
#[derive(Debug)]
pub struct DataSnapshot {
    /// Expectations table, when its load succeeded.
    pub expectations: Option<TableLoad<Expectation>>,
    /// Performance table, when its load succeeded.
    pub performance: Option<TableLoad<Observation>>,
    /// Evidence table, when its load succeeded.
    pub evidence: Option<TableLoad<EvidenceRecord>>,
    /// Structural failures from the tables that did not load.
    pub load_failures: Vec<IngestError>,
    /// When this snapshot was taken.
    pub loaded_at: DateTime<Utc>,
}

impl DataSnapshot {
    /// Load all three tables. Never fails as a whole: each table failure is
    /// isolated into `load_failures`.
    pub fn load<R1: Read, R2: Read, R3: Read>(
        expectations: R1,
        performance: R2,
        evidence: R3,
    ) -> Self {
        let mut load_failures = Vec::new();

        let expectations = match load_expectations(expectations) {
            Ok(load) => Some(load),
            Err(err) => {
                warn!(%err, "expectations table failed to load");
                load_failures.push(err);
                None
            }
        };
        let performance = match load_performance(performance) {
            Ok(load) => Some(load),
            Err(err) => {
                warn!(%err, "performance table failed to load");
                load_failures.push(err);
                None
            }
        };
        let evidence = match load_evidence(evidence) {
            Ok(load) => Some(load),
            Err(err) => {
                warn!(%err, "evidence table failed to load");
                load_failures.push(err);
                None
            }
        };

        Self {
            expectations,
            performance,
            evidence,
            load_failures,
            loaded_at: Utc::now(),
        }
    }

    /// Run a summary pass over whatever loaded. Missing tables derive as
    /// empty, so a schema failure in one file degrades rather than blanks
    /// the whole view.
    pub fn summaries(&self, config: &SummaryConfig) -> Summaries {
        let expectations = self
            .expectations
            .as_ref()
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[]);
        let performance = self
            .performance
            .as_ref()
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[]);
        let evidence = self
            .evidence
            .as_ref()
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[]);
        compute_summaries(expectations, performance, evidence, config)
    }

    /// Total rows excluded across the tables that loaded.
    pub fn skipped_rows(&self) -> usize {
        self.expectations.as_ref().map_or(0, |t| t.skipped)
            + self.performance.as_ref().map_or(0, |t| t.skipped)
            + self.evidence.as_ref().map_or(0, |t| t.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impact_core::Status;

    const EXPECTATIONS_CSV: &str = "\
Initiative ID,Metric,Baseline,Target 2030,Target 2045,Expectation Type
LEARNVIA,Active Users,1000,5000,20000,topline
LEARNVIA,Cost per Completion,400,200,100,intermediate
";

    const PERFORMANCE_CSV: &str = "\
Initiative ID,Metric,Year,Actual Value,Data Source,Quality
LEARNVIA,Active Users,2023,2500,Platform export,High
LEARNVIA,Active Users,2024,4200,Platform export,High
LEARNVIA,Cost per Completion,2024,300,Finance records,Medium
";

    const EVIDENCE_CSV: &str = "\
Initiative ID,Evidence Type,Confidence Score,Link / Summary
LEARNVIA,RCT,3,Efficacy RCT across 12 institutions
LEARNVIA,Descriptive,1,Adoption case study
";

    #[test]
    fn expectations_load_end_to_end() {
        let load = load_expectations(EXPECTATIONS_CSV.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 2);
        assert_eq!(load.skipped, 0);
        assert_eq!(load.rows[0].metric, "Active Users");
        assert_eq!(load.rows[0].baseline, 1000.0);
        assert_eq!(load.rows[0].expectation_type, ExpectationType::Topline);
        assert_eq!(load.rows[1].expectation_type, ExpectationType::Intermediate);
    }

    #[test]
    fn non_numeric_row_is_excluded_and_counted() {
        let csv = "\
Initiative ID,Metric,Baseline,Target 2030,Target 2045,Expectation Type
LEARNVIA,Active Users,1000,5000,20000,topline
LEARNVIA,Broken Metric,n/a,5000,20000,topline
";
        let load = load_expectations(csv.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.skipped, 1);
        assert_eq!(load.errors.len(), 1);
        assert_eq!(load.errors[0].row, 2);
        assert_eq!(load.errors[0].column, "Baseline");
    }

    #[test]
    fn unknown_expectation_type_falls_back_without_dropping_the_row() {
        let csv = "\
Initiative ID,Metric,Baseline,Target 2030,Target 2045,Expectation Type
LEARNVIA,Active Users,1000,5000,20000,stretch
";
        let load = load_expectations(csv.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.skipped, 0);
        assert_eq!(load.rows[0].expectation_type, ExpectationType::Intermediate);
        assert_eq!(load.errors.len(), 1);
        assert!(load.errors[0].message.contains("stretch"));
    }

    #[test]
    fn empty_loads_need_no_default_row_type() {
        // The row types have no Default impl; an empty load must not ask
        // for one.
        let load = TableLoad::<Expectation>::default();
        assert!(load.rows.is_empty());
        assert!(load.errors.is_empty());
        assert_eq!(load.skipped, 0);
    }

    #[test]
    fn extra_fields_do_not_abort_the_table() {
        let csv = "\
Initiative ID,Metric,Baseline,Target 2030,Target 2045,Expectation Type
LEARNVIA,Active Users,1000,5000,20000,topline,stray extra field
LEARNVIA,Course Success Rate,60,75,85,topline
";
        let load = load_expectations(csv.as_bytes()).unwrap();
        // All required columns are present, so the wide row still loads.
        assert_eq!(load.rows.len(), 2);
        assert_eq!(load.skipped, 0);
        assert_eq!(load.rows[0].metric, "Active Users");
    }

    #[test]
    fn short_row_is_excluded_not_fatal() {
        let csv = "\
Initiative ID,Metric,Year,Actual Value,Data Source,Quality
LEARNVIA,Active Users
LEARNVIA,Active Users,2024,4200,Export,High
";
        let load = load_performance(csv.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.skipped, 1);
        assert_eq!(load.errors[0].row, 1);
        assert_eq!(load.errors[0].column, "Year");
        assert_eq!(load.rows[0].year, 2024);
    }

    #[test]
    fn invalid_utf8_row_is_excluded_not_fatal() {
        let mut csv = Vec::new();
        csv.extend_from_slice(
            b"Initiative ID,Evidence Type,Confidence Score,Link / Summary\n",
        );
        csv.extend_from_slice(b"LEARNVIA,RCT,3,Good study\n");
        csv.extend_from_slice(b"LEARNVIA,QED,2,bad bytes \xff\xfe\n");

        let load = load_evidence(csv.as_slice()).unwrap();
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.skipped, 1);
        assert_eq!(load.errors[0].column, "(record)");
    }

    #[test]
    fn missing_column_fails_the_table() {
        let csv = "\
Initiative ID,Metric,Baseline,Target 2045,Expectation Type
LEARNVIA,Active Users,1000,20000,topline
";
        let err = load_expectations(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn {
                table: "expectations",
                column: "Target 2030",
            }
        ));
    }

    #[test]
    fn performance_load_parses_years_and_values() {
        let load = load_performance(PERFORMANCE_CSV.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 3);
        assert_eq!(load.rows[1].year, 2024);
        assert_eq!(load.rows[1].actual_value, 4200.0);
        assert_eq!(load.rows[2].data_source, "Finance records");
    }

    #[test]
    fn non_positive_year_is_excluded() {
        let csv = "\
Initiative ID,Metric,Year,Actual Value,Data Source,Quality
LEARNVIA,Active Users,-5,2500,Export,High
LEARNVIA,Active Users,2024,4200,Export,High
";
        let load = load_performance(csv.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.skipped, 1);
        assert_eq!(load.errors[0].column, "Year");
    }

    #[test]
    fn evidence_load_validates_confidence_scores() {
        let csv = "\
Initiative ID,Evidence Type,Confidence Score,Link / Summary
LEARNVIA,RCT,3,Good study
LEARNVIA,QED,5,Score out of range
LEARNVIA,Descriptive,strong,Not a number
";
        let load = load_evidence(csv.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.skipped, 2);
        assert_eq!(load.rows[0].confidence, 3);
    }

    #[test]
    fn snapshot_isolates_a_schema_failure() {
        let broken_evidence = "Initiative ID,Evidence Type\nLEARNVIA,RCT\n";
        let snapshot = DataSnapshot::load(
            EXPECTATIONS_CSV.as_bytes(),
            PERFORMANCE_CSV.as_bytes(),
            broken_evidence.as_bytes(),
        );

        assert!(snapshot.expectations.is_some());
        assert!(snapshot.performance.is_some());
        assert!(snapshot.evidence.is_none());
        assert_eq!(snapshot.load_failures.len(), 1);

        // Derivation still runs over the tables that loaded.
        let out = snapshot.summaries(&SummaryConfig::default());
        assert_eq!(out.summaries.len(), 2);
        assert!(out.summaries[0].progress.is_some());
        assert!(out.summaries[0].evidence_grade.is_none());
    }

    #[test]
    fn snapshot_full_pipeline() {
        let snapshot = DataSnapshot::load(
            EXPECTATIONS_CSV.as_bytes(),
            PERFORMANCE_CSV.as_bytes(),
            EVIDENCE_CSV.as_bytes(),
        );
        assert!(snapshot.load_failures.is_empty());
        assert_eq!(snapshot.skipped_rows(), 0);

        let out = snapshot.summaries(&SummaryConfig::default());
        assert_eq!(out.summaries.len(), 2);

        // (4200 - 1000) / (5000 - 1000) = 80% ⇒ On Track.
        let users = &out.summaries[0];
        assert_eq!(users.status(), Some(Status::OnTrack));

        // Cost metric is lower-is-better: (400 - 300) / (400 - 200) = 50%.
        let cost = &out.summaries[1];
        assert!(cost.lower_is_better);
        assert_eq!(cost.status(), Some(Status::AtRisk));

        // Single observation for the cost metric: projection absent.
        assert!(cost.projection.is_none());
        assert!(users.projection.is_some());

        // Pooled evidence: mean of {3, 1} = 2.0 ⇒ grade B.
        let grade = users.evidence_grade.as_ref().unwrap();
        assert_eq!(grade.average_confidence, 2.0);
    }
}
