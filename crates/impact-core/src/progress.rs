//! Progress calculator.
//!
//! Normalizes how far a metric has moved from its baseline toward its target,
//! as a percentage. The result is deliberately unclamped: exceeding the target
//! reads as > 100, regressing past the baseline reads as negative. Clamping is
//! a presentation decision, not a derivation one.

use crate::error::{CoreError, CoreResult};

/// Progress percentage of `actual` from `baseline` toward `target`.
///
/// For higher-is-better metrics: `(A - B) / (T - B) * 100`.
/// For lower-is-better metrics: `(B - A) / (B - T) * 100`.
///
/// Fails with [`CoreError::DivisionUndefined`] when target equals baseline;
/// the caller surfaces that as a data-quality warning rather than substituting
/// a sentinel.
pub fn progress_percent(
    baseline: f64,
    actual: f64,
    target: f64,
    lower_is_better: bool,
) -> CoreResult<f64> {
    if target == baseline {
        return Err(CoreError::DivisionUndefined(format!(
            "target equals baseline ({baseline})"
        )));
    }
    let percent = if lower_is_better {
        (baseline - actual) / (baseline - target) * 100.0
    } else {
        (actual - baseline) / (target - baseline) * 100.0
    };
    Ok(percent)
}
