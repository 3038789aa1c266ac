//! Trend projector.
//!
//! Business-as-usual extrapolation: fit a straight line through the two most
//! recent observations and extend it to a target year. Deliberately not a
//! regression over the whole series; the point is "what happens if the latest
//! trend continues", which older data would only dilute.

use crate::error::{CoreError, CoreResult};

/// A fitted two-point trend, anchored at the latest observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trend {
    /// Change in value per year between the two most recent observations.
    pub slope: f64,
    /// Year of the most recent observation.
    pub latest_year: i32,
    /// Value of the most recent observation.
    pub latest_value: f64,
}

impl Trend {
    /// Extrapolated value at `year`.
    pub fn project_to(&self, year: i32) -> f64 {
        self.latest_value + self.slope * f64::from(year - self.latest_year)
    }

    /// Per-year `(year, value)` points from the latest observation out to
    /// `target_year`, inclusive on both ends. Empty when the target year is
    /// not in the future of the latest observation. Feeds chart rendering.
    pub fn series_to(&self, target_year: i32) -> Vec<(i32, f64)> {
        if target_year <= self.latest_year {
            return Vec::new();
        }
        (self.latest_year..=target_year)
            .map(|year| (year, self.project_to(year)))
            .collect()
    }
}

/// Fit a trend through the two most recent points of a `(year, value)` series.
///
/// The series does not need to arrive sorted. Fails with
/// [`CoreError::InsufficientData`] on fewer than two points, and with
/// [`CoreError::DivisionUndefined`] when the two most recent points share a
/// year (a duplicate-year entry; substituting a zero slope would misreport a
/// flat trend).
pub fn fit(points: &[(i32, f64)]) -> CoreResult<Trend> {
    if points.len() < 2 {
        return Err(CoreError::InsufficientData(format!(
            "{} observation(s), need at least 2",
            points.len()
        )));
    }
    let mut sorted: Vec<(i32, f64)> = points.to_vec();
    sorted.sort_by_key(|&(year, _)| year);

    let (prev_year, prev_value) = sorted[sorted.len() - 2];
    let (latest_year, latest_value) = sorted[sorted.len() - 1];

    if latest_year == prev_year {
        return Err(CoreError::DivisionUndefined(format!(
            "duplicate year {latest_year} in series"
        )));
    }

    Ok(Trend {
        slope: (latest_value - prev_value) / f64::from(latest_year - prev_year),
        latest_year,
        latest_value,
    })
}
