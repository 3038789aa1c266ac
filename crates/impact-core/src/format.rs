//! Display formatting for metric values.
//!
//! Presentation keys off the metric name: cost-like metrics render as
//! currency, rate-like metrics as percentages, scores with one decimal,
//! everything else as a whole number with thousands separators. Purely a
//! rendering concern; derivation never consumes formatted strings.

const CURRENCY_KEYWORDS: &[&str] = &["cost", "salary", "price", "revenue", "budget"];
const PERCENT_KEYWORDS: &[&str] = &["rate", "percent", "%"];

/// Format a metric value for display, dispatching on the metric name.
pub fn format_value(value: f64, metric_name: &str) -> String {
    let name = metric_name.to_lowercase();
    if CURRENCY_KEYWORDS.iter().any(|k| name.contains(k)) {
        format!("${}", with_thousands(value.round()))
    } else if PERCENT_KEYWORDS.iter().any(|k| name.contains(k)) {
        format!("{value:.1}%")
    } else if name.contains("score") {
        format!("{value:.1}")
    } else {
        with_thousands(value.round())
    }
}

/// Render a whole number with `,` thousands separators.
fn with_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
