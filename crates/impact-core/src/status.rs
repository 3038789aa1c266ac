//! Status classifier.
//!
//! Maps a progress percentage onto the three-band status scale. Thresholds
//! are inclusive on the lower bound of each band; the function is total over
//! all reals, including negative and > 100 percentages.

use crate::types::Status;

/// Progress at or above this is On Track.
pub const ON_TRACK_THRESHOLD: f64 = 80.0;
/// Progress at or above this (but below [`ON_TRACK_THRESHOLD`]) is At Risk.
pub const AT_RISK_THRESHOLD: f64 = 50.0;

/// Classify a progress percentage into a status band.
pub fn classify(percent: f64) -> Status {
    if percent >= ON_TRACK_THRESHOLD {
        Status::OnTrack
    } else if percent >= AT_RISK_THRESHOLD {
        Status::AtRisk
    } else {
        Status::OffTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_resolve_upward() {
        assert_eq!(classify(80.0), Status::OnTrack);
        assert_eq!(classify(79.999), Status::AtRisk);
        assert_eq!(classify(50.0), Status::AtRisk);
        assert_eq!(classify(49.999), Status::OffTrack);
    }

    #[test]
    fn no_clamping_at_the_extremes() {
        assert_eq!(classify(150.0), Status::OnTrack);
        assert_eq!(classify(-40.0), Status::OffTrack);
        assert_eq!(classify(f64::MAX), Status::OnTrack);
        assert_eq!(classify(f64::MIN), Status::OffTrack);
    }

    #[test]
    fn interior_values_classify_as_expected() {
        assert_eq!(classify(100.0), Status::OnTrack);
        assert_eq!(classify(65.0), Status::AtRisk);
        assert_eq!(classify(0.0), Status::OffTrack);
    }
}
