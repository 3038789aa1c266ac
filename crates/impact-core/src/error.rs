//! Error types for the derivation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a single derivation can fail with.
///
/// Both variants are metric-local: the summary pass records them as
/// data-quality warnings and keeps going, it never aborts the whole
/// computation over one bad metric.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreError {
    /// A denominator collapsed to zero: target equals baseline, or the two
    /// most recent observations share a year.
    #[error("division undefined: {0}")]
    DivisionUndefined(String),

    /// Not enough input rows to derive anything: fewer than two
    /// observations for a projection, or zero evidence records for a grade.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

/// Result type for derivation operations.
pub type CoreResult<T> = Result<T, CoreError>;
