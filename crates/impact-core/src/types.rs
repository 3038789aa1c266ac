//! Core type definitions for the impact derivation layer.
//!
//! These types describe the three input tables (expectations, performance
//! observations, evidence records) and the derived indicators computed from
//! them. All of them are plain data: the derivation layer never mutates its
//! inputs and derived values are recomputed from scratch on every pass.

use serde::{Deserialize, Serialize};

// ── Join Key ────────────────────────────────────────────────────────────

/// Identifies one metric of one initiative.
///
/// Joins between the expectations and performance tables are exact and
/// case-sensitive on both components.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricKey {
    /// Initiative identifier as it appears in the input tables.
    pub initiative_id: String,
    /// Metric name as it appears in the input tables.
    pub metric: String,
}

impl MetricKey {
    pub fn new(initiative_id: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            initiative_id: initiative_id.into(),
            metric: metric.into(),
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.initiative_id, self.metric)
    }
}

// ── Input Rows ──────────────────────────────────────────────────────────

/// Classification of an expectation row.
///
/// Carried through to presentation grouping only; progress and status
/// computations never consume it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpectationType {
    /// A headline target the initiative is accountable for.
    Topline,
    /// A supporting target expected to move before the topline does.
    Intermediate,
}

impl ExpectationType {
    /// Parse the table's free-text value. Matching is case-insensitive;
    /// anything unrecognized is `None` so the caller can decide a fallback.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "topline" => Some(Self::Topline),
            "intermediate" => Some(Self::Intermediate),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExpectationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topline => write!(f, "topline"),
            Self::Intermediate => write!(f, "intermediate"),
        }
    }
}

/// One row of the expectations table: where a metric starts and where it
/// should land by the two horizon years.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Initiative this expectation belongs to.
    pub initiative_id: String,
    /// Metric name (join key component, case-sensitive).
    pub metric: String,
    /// Starting value before intervention.
    pub baseline: f64,
    /// Target value for 2030.
    pub target_2030: f64,
    /// Target value for 2045.
    pub target_2045: f64,
    /// Topline or intermediate classification (presentational).
    pub expectation_type: ExpectationType,
}

impl Expectation {
    /// Join key for this row.
    pub fn key(&self) -> MetricKey {
        MetricKey::new(self.initiative_id.clone(), self.metric.clone())
    }
}

/// One row of the performance table: a single observed value of a metric
/// in a given year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Initiative this observation belongs to.
    pub initiative_id: String,
    /// Metric name (join key component, case-sensitive).
    pub metric: String,
    /// Calendar year of the observation.
    pub year: i32,
    /// Observed value.
    pub actual_value: f64,
    /// Where the number came from (platform export, institution records, ...).
    pub data_source: String,
    /// Free-text quality label attached by the data owner.
    pub quality: String,
}

impl Observation {
    /// Join key for this row.
    pub fn key(&self) -> MetricKey {
        MetricKey::new(self.initiative_id.clone(), self.metric.clone())
    }
}

/// Study design behind one evidence record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceType {
    /// Randomized controlled trial.
    Rct,
    /// Quasi-experimental design.
    Qed,
    /// Descriptive study, no comparison group.
    Descriptive,
    /// Anything else the data owner typed in.
    Other(String),
}

impl EvidenceType {
    /// Parse the table's free-text value; never fails, unknown designs are
    /// preserved verbatim in `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "RCT" => Self::Rct,
            "QED" => Self::Qed,
            "DESCRIPTIVE" => Self::Descriptive,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rct => write!(f, "RCT"),
            Self::Qed => write!(f, "QED"),
            Self::Descriptive => write!(f, "Descriptive"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// One row of the evidence table: a study supporting an initiative, with a
/// 1-3 confidence rating of its strength.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Initiative this evidence supports.
    pub initiative_id: String,
    /// Study design classification.
    pub evidence_type: EvidenceType,
    /// Strength rating: 1 (weak) to 3 (strong).
    pub confidence: u8,
    /// Citation link or one-line summary.
    pub link_summary: String,
}

// ── Derived Indicators ──────────────────────────────────────────────────

/// Tri-state classification of progress toward a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// At least 80% of the way to the target.
    OnTrack,
    /// Between 50% and 80%.
    AtRisk,
    /// Below 50%.
    OffTrack,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnTrack => write!(f, "On Track"),
            Self::AtRisk => write!(f, "At Risk"),
            Self::OffTrack => write!(f, "Off Track"),
        }
    }
}

/// Letter grade summarizing the strength of an initiative's evidence base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    /// Strong evidence (mean confidence ≥ 2.5).
    A,
    /// Moderate evidence (mean confidence in [2.0, 2.5)).
    B,
    /// Weak evidence (mean confidence in [1.5, 2.0)).
    C,
    /// Limited evidence (mean confidence < 1.5).
    D,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::D => write!(f, "D"),
        }
    }
}

/// Progress of one metric toward its 2030 target.
///
/// The percentage is deliberately unclamped: values above 100 mean the
/// target was exceeded, negative values mean movement away from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressResult {
    /// Metric this result describes.
    pub key: MetricKey,
    /// Most recent observed value.
    pub latest_actual: f64,
    /// Year of the most recent observation.
    pub latest_year: i32,
    /// Progress percentage, directionality-aware, unclamped.
    pub percent: f64,
    /// Status band derived from the percentage.
    pub status: Status,
}

/// Business-as-usual extrapolation of a metric to a target year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Metric this projection describes.
    pub key: MetricKey,
    /// Year the value is projected for.
    pub target_year: i32,
    /// Extrapolated value at the target year.
    pub projected_value: f64,
    /// Per-year slope between the two most recent observations.
    pub slope: f64,
}

/// Evidence grade for one initiative, pooled across all its metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceGrade {
    /// Initiative this grade describes.
    pub initiative_id: String,
    /// Mean of the 1-3 confidence scores.
    pub average_confidence: f64,
    /// Letter grade derived from the mean.
    pub grade: Grade,
    /// Number of evidence records behind the grade.
    pub record_count: usize,
}
