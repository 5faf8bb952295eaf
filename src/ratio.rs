/// Per-circuit ratios derived from extracted log metrics.
///
/// Both ratios fall back to exactly 0 when their inputs are missing or the
/// denominator is zero, so every circuit contributes a defined value to the
/// category average.
use crate::metrics::{RawLogMetrics, TimeLabel};
use serde::Serialize;

/// Ratios computed for one log file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitRatio {
    pub case_name: String,
    pub df_ratio: f64,
    pub time_ratio: f64,
}

impl CircuitRatio {
    pub fn from_metrics(case_name: impl Into<String>, metrics: &RawLogMetrics) -> Self {
        Self {
            case_name: case_name.into(),
            df_ratio: df_ratio(metrics),
            time_ratio: time_ratio(metrics),
        }
    }
}

/// `(D + F) / (P + D + F)` over the first P/D/F triple only.
///
/// Later triples are collected by the extractor but ignored here.
pub fn df_ratio(metrics: &RawLogMetrics) -> f64 {
    let Some(first) = metrics.pdf_stats.first() else {
        return 0.0;
    };
    let total = first.total();
    if total == 0 {
        return 0.0;
    }
    (first.d as f64 + first.f as f64) / total as f64
}

/// `Sim / (Sat + Sim)`; 0 unless both timings are present with a non-zero sum.
pub fn time_ratio(metrics: &RawLogMetrics) -> f64 {
    let (Some(sim), Some(sat)) = (metrics.time(TimeLabel::Sim), metrics.time(TimeLabel::Sat))
    else {
        return 0.0;
    };
    let total = sat + sim;
    if total == 0.0 {
        return 0.0;
    }
    sim / total
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Two-decimal rendering used for every ratio written out.
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}
