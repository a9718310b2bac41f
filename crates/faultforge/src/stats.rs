//! Descriptive statistics over sequence segments.
//!
//! Default fault parameters scale to the statistics of the data inside
//! the injection window, never to the whole sequence. This module holds
//! the small summary type those defaults are resolved against.

use serde::Serialize;

/// Descriptive statistics of one segment of a sequence.
///
/// `stddev` is the population standard deviation (divide by `n`), which
/// is what the default noise magnitudes are calibrated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl SegmentSummary {
    /// Summarize a non-empty slice.
    ///
    /// Callers guarantee non-emptiness via the interval invariant
    /// `start < stop`; an empty slice yields NaN statistics rather
    /// than panicking.
    pub fn from_slice(xs: &[f64]) -> Self {
        let count = xs.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                stddev: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = xs.iter().sum::<f64>() / count as f64;
        let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / count as f64;
        let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count,
            mean,
            stddev: var.sqrt(),
            min,
            max,
        }
    }
}
