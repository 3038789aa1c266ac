//! Aggregation view: joins the three input tables into per-metric summaries
//! and a portfolio rollup.
//!
//! `compute_summaries` is the single entry point the presentation layer calls
//! on every refresh. It is a pure function of the three tables: no cache, no
//! shared state, fresh derived results every invocation. Errors local to one
//! row or metric become data-quality warnings on a side channel; they never
//! abort the pass.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::direction::DirectionConfig;
use crate::error::CoreError;
use crate::evidence::grade_initiative;
use crate::progress::progress_percent;
use crate::status::classify;
use crate::trend;
use crate::types::{
    EvidenceGrade, EvidenceRecord, Expectation, ExpectationType, MetricKey, Observation,
    ProgressResult, ProjectionResult, Status,
};

// ── Configuration ───────────────────────────────────────────────────────

/// Knobs for a summary pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Directionality classifier configuration.
    pub direction: DirectionConfig,
    /// Year projections extrapolate to.
    pub projection_year: i32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            direction: DirectionConfig::default(),
            projection_year: 2030,
        }
    }
}

// ── Data-Quality Warnings ───────────────────────────────────────────────

/// Which derived field a warning is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivedField {
    /// Progress percentage and status band.
    Progress,
    /// Trend projection.
    Projection,
    /// Evidence grade.
    EvidenceGrade,
}

impl std::fmt::Display for DerivedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Progress => write!(f, "progress"),
            Self::Projection => write!(f, "projection"),
            Self::EvidenceGrade => write!(f, "evidence grade"),
        }
    }
}

/// One data-quality finding from a summary pass.
///
/// Warnings are the side channel that keeps row-local trouble out of the
/// derived values themselves: a field that could not be computed is `None` in
/// the summary and explained here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataQualityWarning {
    /// An expectations row had no matching performance rows.
    NoPerformanceData {
        /// The unmatched metric.
        key: MetricKey,
    },
    /// An initiative had no evidence records.
    NoEvidence {
        /// The initiative without evidence.
        initiative_id: String,
    },
    /// A derived field could not be computed for a metric.
    NotComputable {
        /// The affected metric.
        key: MetricKey,
        /// Which derived field is absent.
        field: DerivedField,
        /// The underlying derivation error.
        reason: CoreError,
    },
    /// Performance or evidence rows referenced an initiative absent from the
    /// expectations table; they contribute to nothing.
    OrphanRows {
        /// Table the rows came from.
        table: String,
        /// The unmatched initiative ID.
        initiative_id: String,
        /// How many rows were orphaned.
        rows: usize,
    },
    /// Performance rows whose initiative is known but whose metric name
    /// matches no expectation row; they contribute to nothing.
    UnmatchedMetric {
        /// The key no expectation row carries.
        key: MetricKey,
        /// How many performance rows sit under it.
        rows: usize,
    },
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPerformanceData { key } => {
                write!(f, "no performance data for {key}")
            }
            Self::NoEvidence { initiative_id } => {
                write!(f, "no evidence records for initiative {initiative_id}")
            }
            Self::NotComputable { key, field, reason } => {
                write!(f, "{field} not computable for {key}: {reason}")
            }
            Self::OrphanRows {
                table,
                initiative_id,
                rows,
            } => {
                write!(
                    f,
                    "{rows} {table} row(s) reference unknown initiative {initiative_id}"
                )
            }
            Self::UnmatchedMetric { key, rows } => {
                write!(f, "{rows} performance row(s) for {key} match no expectation")
            }
        }
    }
}

// ── Summary Records ─────────────────────────────────────────────────────

/// Decision-ready view of one (initiative, metric) pair.
///
/// Every derived field is an `Option`: absence means "not computable from the
/// data we have", which is structurally distinct from a computed zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// The metric this summarizes.
    pub key: MetricKey,
    /// Topline or intermediate, passed through for presentation grouping.
    pub expectation_type: ExpectationType,
    /// Starting value before intervention.
    pub baseline: f64,
    /// 2030 target (the one progress is measured against).
    pub target_2030: f64,
    /// 2045 target, passed through for presentation.
    pub target_2045: f64,
    /// Whether decreasing values represent improvement.
    pub lower_is_better: bool,
    /// Most recent observed value, if any performance rows matched.
    pub latest_actual: Option<f64>,
    /// Year of the most recent observation.
    pub latest_year: Option<i32>,
    /// Progress toward the 2030 target, when computable.
    pub progress: Option<ProgressResult>,
    /// Business-as-usual projection, when computable.
    pub projection: Option<ProjectionResult>,
    /// The owning initiative's evidence grade, when it has evidence.
    pub evidence_grade: Option<EvidenceGrade>,
}

impl MetricSummary {
    /// Status band, when progress was computable.
    pub fn status(&self) -> Option<Status> {
        self.progress.as_ref().map(|p| p.status)
    }
}

/// Portfolio-level counts of metrics per status band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRollup {
    /// Metrics at or above 80% progress.
    pub on_track: usize,
    /// Metrics between 50% and 80%.
    pub at_risk: usize,
    /// Metrics below 50%.
    pub off_track: usize,
    /// Metrics whose progress could not be computed.
    pub not_computable: usize,
}

impl StatusRollup {
    fn record(&mut self, status: Option<Status>) {
        match status {
            Some(Status::OnTrack) => self.on_track += 1,
            Some(Status::AtRisk) => self.at_risk += 1,
            Some(Status::OffTrack) => self.off_track += 1,
            None => self.not_computable += 1,
        }
    }

    /// Total number of metrics counted.
    pub fn total(&self) -> usize {
        self.on_track + self.at_risk + self.off_track + self.not_computable
    }
}

/// Output of one summary pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summaries {
    /// One record per expectations row, in input order.
    pub summaries: Vec<MetricSummary>,
    /// Cross-initiative status counts.
    pub rollup: StatusRollup,
    /// Data-quality findings collected along the way.
    pub warnings: Vec<DataQualityWarning>,
}

impl Summaries {
    /// View of one initiative's summaries. Filtering is presentational:
    /// the records are the same ones the full view holds.
    pub fn for_initiative(&self, initiative_id: &str) -> Vec<&MetricSummary> {
        self.summaries
            .iter()
            .filter(|s| s.key.initiative_id == initiative_id)
            .collect()
    }

    /// Distinct initiative IDs present, in input order.
    pub fn initiative_ids(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.summaries
            .iter()
            .map(|s| s.key.initiative_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

// ── Summary Pass ────────────────────────────────────────────────────────

/// Join the three tables and derive every indicator.
///
/// Produces one [`MetricSummary`] per expectations row, even when no
/// performance or evidence rows match (the derived fields are `None` and a
/// warning is recorded). Joins are exact and case-sensitive.
pub fn compute_summaries(
    expectations: &[Expectation],
    performance: &[Observation],
    evidence: &[EvidenceRecord],
    config: &SummaryConfig,
) -> Summaries {
    debug!(
        expectations = expectations.len(),
        performance = performance.len(),
        evidence = evidence.len(),
        "starting summary pass"
    );

    // Group performance series by join key, evidence by initiative.
    let mut series_by_key: HashMap<MetricKey, Vec<(i32, f64)>> = HashMap::new();
    for obs in performance {
        series_by_key
            .entry(obs.key())
            .or_default()
            .push((obs.year, obs.actual_value));
    }
    let mut evidence_by_initiative: HashMap<&str, Vec<EvidenceRecord>> = HashMap::new();
    for record in evidence {
        evidence_by_initiative
            .entry(record.initiative_id.as_str())
            .or_default()
            .push(record.clone());
    }

    let mut out = Summaries::default();

    // Grade each initiative once; reuse the grade across its metrics.
    let mut grades: HashMap<&str, Option<EvidenceGrade>> = HashMap::new();
    let known_initiatives: BTreeSet<&str> = expectations
        .iter()
        .map(|e| e.initiative_id.as_str())
        .collect();
    for &initiative_id in &known_initiatives {
        let records = evidence_by_initiative
            .get(initiative_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        match grade_initiative(initiative_id, records) {
            Ok(grade) => {
                grades.insert(initiative_id, Some(grade));
            }
            Err(CoreError::InsufficientData(_)) => {
                grades.insert(initiative_id, None);
                out.warnings.push(DataQualityWarning::NoEvidence {
                    initiative_id: initiative_id.to_string(),
                });
            }
            Err(err) => {
                // Grading only fails on empty input today; anything else
                // still degrades to an absent grade.
                grades.insert(initiative_id, None);
                out.warnings.push(DataQualityWarning::NotComputable {
                    key: MetricKey::new(initiative_id.to_string(), String::new()),
                    field: DerivedField::EvidenceGrade,
                    reason: err,
                });
            }
        }
    }

    for exp in expectations {
        let key = exp.key();
        let lower_is_better = config.direction.is_lower_better(&exp.metric);
        let series = series_by_key.get(&key);

        let mut summary = MetricSummary {
            key: key.clone(),
            expectation_type: exp.expectation_type,
            baseline: exp.baseline,
            target_2030: exp.target_2030,
            target_2045: exp.target_2045,
            lower_is_better,
            latest_actual: None,
            latest_year: None,
            progress: None,
            projection: None,
            evidence_grade: grades.get(exp.initiative_id.as_str()).cloned().flatten(),
        };

        match series {
            // Grouped series are never empty; entries only exist for pushed rows.
            Some(points) if !points.is_empty() => {
                let (latest_year, latest_actual) = points
                    .iter()
                    .copied()
                    .fold(points[0], |best, p| if p.0 > best.0 { p } else { best });
                summary.latest_actual = Some(latest_actual);
                summary.latest_year = Some(latest_year);

                match progress_percent(exp.baseline, latest_actual, exp.target_2030, lower_is_better)
                {
                    Ok(percent) => {
                        summary.progress = Some(ProgressResult {
                            key: key.clone(),
                            latest_actual,
                            latest_year,
                            percent,
                            status: classify(percent),
                        });
                    }
                    Err(reason) => {
                        out.warnings.push(DataQualityWarning::NotComputable {
                            key: key.clone(),
                            field: DerivedField::Progress,
                            reason,
                        });
                    }
                }

                match trend::fit(points) {
                    Ok(t) => {
                        summary.projection = Some(ProjectionResult {
                            key: key.clone(),
                            target_year: config.projection_year,
                            projected_value: t.project_to(config.projection_year),
                            slope: t.slope,
                        });
                    }
                    Err(reason) => {
                        out.warnings.push(DataQualityWarning::NotComputable {
                            key: key.clone(),
                            field: DerivedField::Projection,
                            reason,
                        });
                    }
                }
            }
            _ => {
                out.warnings
                    .push(DataQualityWarning::NoPerformanceData { key: key.clone() });
            }
        }

        out.rollup.record(summary.status());
        out.summaries.push(summary);
    }

    // Orphans at the key level: series under a known initiative that no
    // expectation row ever consumed (metric name mismatch).
    let expected_keys: HashSet<MetricKey> =
        expectations.iter().map(Expectation::key).collect();
    let mut unmatched: Vec<(&MetricKey, usize)> = series_by_key
        .iter()
        .filter(|&(key, _)| {
            !expected_keys.contains(key) && known_initiatives.contains(key.initiative_id.as_str())
        })
        .map(|(key, points)| (key, points.len()))
        .collect();
    unmatched.sort_by_key(|(key, _)| (key.initiative_id.clone(), key.metric.clone()));
    for (key, rows) in unmatched {
        out.warnings.push(DataQualityWarning::UnmatchedMetric {
            key: key.clone(),
            rows,
        });
    }

    // Orphans: rows whose initiative the expectations table has never heard of.
    let mut orphan_performance: HashMap<&str, usize> = HashMap::new();
    for obs in performance {
        if !known_initiatives.contains(obs.initiative_id.as_str()) {
            *orphan_performance.entry(obs.initiative_id.as_str()).or_default() += 1;
        }
    }
    let mut orphan_evidence: HashMap<&str, usize> = HashMap::new();
    for record in evidence {
        if !known_initiatives.contains(record.initiative_id.as_str()) {
            *orphan_evidence.entry(record.initiative_id.as_str()).or_default() += 1;
        }
    }
    for (table, orphans) in [
        ("performance", orphan_performance),
        ("evidence", orphan_evidence),
    ] {
        let mut ids: Vec<_> = orphans.into_iter().collect();
        ids.sort_unstable();
        for (initiative_id, rows) in ids {
            out.warnings.push(DataQualityWarning::OrphanRows {
                table: table.to_string(),
                initiative_id: initiative_id.to_string(),
                rows,
            });
        }
    }

    debug!(
        summaries = out.summaries.len(),
        warnings = out.warnings.len(),
        "summary pass complete"
    );
    out
}
