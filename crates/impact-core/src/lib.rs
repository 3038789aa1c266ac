//! # impact-core
//!
//! Derivation layer for initiative impact tracking: turns three tabular
//! datasets (expectations, performance actuals, evidence) into decision-ready
//! indicators per (initiative, metric).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │ Expectations │   │ Performance  │   │  Evidence    │
//!   └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!          │                  │                  │
//!          ▼                  ▼                  ▼
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │ Direction    │   │ Trend        │   │ Evidence     │
//!   │ + Progress   │   │ Projector    │   │ Grader       │
//!   │ + Status     │   └──────┬───────┘   └──────┬───────┘
//!   └──────┬───────┘          │                  │
//!          └─────────┬────────┴──────────────────┘
//!                    ▼
//!          ┌───────────────────┐
//!          │ compute_summaries │  → per-metric summaries + rollup
//!          └───────────────────┘     + data-quality warnings
//! ```
//!
//! ## Key Principles
//!
//! - **Pure derivation**: every output is a function of the three input
//!   tables; nothing is cached or persisted between passes.
//! - **Explicit absence**: a value that could not be computed is `None` with
//!   a warning on the side channel, never a zero or a NaN standing in.
//! - **Row-local failure**: one bad metric degrades one summary record; it
//!   never aborts the pass.

#![deny(unsafe_code)]

pub mod direction;
pub mod error;
pub mod evidence;
pub mod format;
pub mod progress;
pub mod status;
pub mod summary;
pub mod trend;
pub mod types;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use direction::DirectionConfig;
pub use error::{CoreError, CoreResult};
pub use evidence::{grade_for, grade_initiative};
pub use format::format_value;
pub use progress::progress_percent;
pub use status::{classify, AT_RISK_THRESHOLD, ON_TRACK_THRESHOLD};
pub use summary::{
    compute_summaries, DataQualityWarning, DerivedField, MetricSummary, StatusRollup, Summaries,
    SummaryConfig,
};
pub use trend::{fit, Trend};
pub use types::{
    EvidenceGrade, EvidenceRecord, EvidenceType, Expectation, ExpectationType, Grade, MetricKey,
    Observation, ProgressResult, ProjectionResult, Status,
};
