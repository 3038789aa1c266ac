//! Metric directionality classifier.
//!
//! Most metrics improve as they grow (users, success rates). Some improve as
//! they shrink (equity gaps, costs). The classifier decides which way a metric
//! points from its name alone, by substring match against a configurable
//! keyword set, so the progress calculator can pick the right formula.

use serde::{Deserialize, Serialize};

/// Keywords that mark a metric as lower-is-better in the default setup.
const DEFAULT_KEYWORDS: &[&str] = &["gap", "cost", "ratio", "debt", "time to", "wait"];

/// Configuration for the directionality classifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectionConfig {
    /// Substrings whose presence marks a metric as lower-is-better.
    pub keywords: Vec<String>,
    /// Whether keyword matching respects case. Off by default.
    pub case_sensitive: bool,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            case_sensitive: false,
        }
    }
}

impl DirectionConfig {
    /// Whether decreasing values of the named metric represent improvement.
    ///
    /// Total over all inputs: an empty name, or a name matching no keyword,
    /// classifies as higher-is-better.
    pub fn is_lower_better(&self, metric_name: &str) -> bool {
        if metric_name.is_empty() {
            return false;
        }
        if self.case_sensitive {
            self.keywords.iter().any(|k| metric_name.contains(k.as_str()))
        } else {
            let name = metric_name.to_lowercase();
            self.keywords
                .iter()
                .any(|k| name.contains(&k.to_lowercase()))
        }
    }
}
