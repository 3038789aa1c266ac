//! Evidence grader.
//!
//! Pools every evidence record of an initiative (across all its metrics, a
//! deliberate simplification) and grades the mean 1-3 confidence score on an
//! A-D scale. An initiative with no evidence gets no grade at all; "no
//! evidence" and "weak evidence" must never look the same.

use crate::error::{CoreError, CoreResult};
use crate::types::{EvidenceGrade, EvidenceRecord, Grade};

/// Mean confidence at or above this grades A.
const GRADE_A_THRESHOLD: f64 = 2.5;
/// Mean confidence at or above this (below A) grades B.
const GRADE_B_THRESHOLD: f64 = 2.0;
/// Mean confidence at or above this (below B) grades C; below it, D.
const GRADE_C_THRESHOLD: f64 = 1.5;

/// Letter grade for a mean confidence score.
pub fn grade_for(average_confidence: f64) -> Grade {
    if average_confidence >= GRADE_A_THRESHOLD {
        Grade::A
    } else if average_confidence >= GRADE_B_THRESHOLD {
        Grade::B
    } else if average_confidence >= GRADE_C_THRESHOLD {
        Grade::C
    } else {
        Grade::D
    }
}

/// Grade one initiative's pooled evidence records.
///
/// `records` must already be filtered to a single initiative; the function
/// takes the initiative ID separately rather than trusting row contents.
/// Fails with [`CoreError::InsufficientData`] on an empty set.
pub fn grade_initiative(
    initiative_id: &str,
    records: &[EvidenceRecord],
) -> CoreResult<EvidenceGrade> {
    if records.is_empty() {
        return Err(CoreError::InsufficientData(format!(
            "no evidence records for initiative {initiative_id}"
        )));
    }
    let total: f64 = records.iter().map(|r| f64::from(r.confidence)).sum();
    let average_confidence = total / records.len() as f64;

    Ok(EvidenceGrade {
        initiative_id: initiative_id.to_string(),
        average_confidence,
        grade: grade_for(average_confidence),
        record_count: records.len(),
    })
}
