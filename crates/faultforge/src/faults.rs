//! Fault catalog: parametrized transformations over a sequence segment.
//!
//! Each variant represents a specific sensor anomaly that can be
//! injected into a window of a time series. Variants are stateless:
//! applying one is a pure function of the current segment values, the
//! statistics of the original segment, the injector's direction flag,
//! and the injector's RNG. Unspecified parameters (`None`) are derived
//! from those inputs at application time, so default magnitudes always
//! scale to the local signal, not the whole sequence.

use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{FaultError, Result};
use crate::stats::SegmentSummary;

/// Offset rate used when `Offset { rate: None }`. The injected shift is
/// `rate * mean(original segment)`.
pub const DEFAULT_OFFSET_RATE: f64 = 0.1;

/// Ceiling factor for the derived drift rate: the rate is drawn
/// uniformly from `(0, DRIFT_RATE_CEIL * mean(original segment))`.
pub const DRIFT_RATE_CEIL: f64 = 1e-4;

/// Range of the relative perturbation used to derive a stuck value from
/// the segment mean.
const STUCK_PERTURBATION: (f64, f64) = (0.01, 0.1);

/// A fault that can be injected into a sequence window.
///
/// `None` parameters are resolved at application time; see the variant
/// docs for each derivation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    /// Linear drift: the k-th faulted sample moves by `(k + 1) * rate`.
    ///
    /// Default rate: uniform draw from `(0, 1e-4 * mean)`, signed by the
    /// injector's direction. A zero rate is the identity.
    Drift { rate: Option<f64> },

    /// Constant shift by `rate * mean(original segment)`.
    ///
    /// Default rate: [`DEFAULT_OFFSET_RATE`].
    Offset { rate: Option<f64> },

    /// Additive i.i.d. Gaussian noise.
    ///
    /// Defaults: `mu = 0`, `sigma = stddev(original segment)`. A
    /// constant segment therefore degenerates to no noise unless the
    /// caller supplies a nonzero sigma.
    GaussianNoise { mu: Option<f64>, sigma: Option<f64> },

    /// Additive i.i.d. uniform noise on `[low, high]`.
    ///
    /// Defaults: `low = -stddev`, `high = +stddev` of the original
    /// segment.
    UniformNoise { low: Option<f64>, high: Option<f64> },

    /// Every sample in the window becomes NaN. The originals stay
    /// retrievable through the injector.
    MissingData,

    /// Every sample in the window becomes one constant.
    ///
    /// Default: `mean * (1 + direction * u)` with `u ~ U(0.01, 0.1)`,
    /// emulating a sensor freezing slightly off its recent average.
    StuckValue { value: Option<f64> },
}

impl Fault {
    /// Short identifier for logging and display.
    pub fn name(&self) -> &'static str {
        match self {
            Fault::Drift { .. } => "drift",
            Fault::Offset { .. } => "offset",
            Fault::GaussianNoise { .. } => "gaussian-noise",
            Fault::UniformNoise { .. } => "uniform-noise",
            Fault::MissingData => "missing-data",
            Fault::StuckValue { .. } => "stuck-value",
        }
    }

    /// Compute the faulted segment.
    ///
    /// `segment` holds the current (possibly already faulted) values
    /// inside the window; `basis` holds the statistics of the original
    /// values inside the same window, which is what parameter defaults
    /// and the offset basis resolve against. Returns a new vector of
    /// the same length; the caller splices it back into the sequence.
    pub(crate) fn apply<R: Rng>(
        &self,
        segment: &[f64],
        basis: &SegmentSummary,
        direction: i8,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        match *self {
            Fault::Drift { rate } => {
                let rate = match rate {
                    Some(r) => r,
                    None => derive_drift_rate(basis.mean, direction, rng),
                };
                Ok(segment
                    .iter()
                    .enumerate()
                    .map(|(k, x)| x + (k as f64 + 1.0) * rate)
                    .collect())
            }

            Fault::Offset { rate } => {
                let shift = rate.unwrap_or(DEFAULT_OFFSET_RATE) * basis.mean;
                Ok(segment.iter().map(|x| x + shift).collect())
            }

            Fault::GaussianNoise { mu, sigma } => {
                let mu = mu.unwrap_or(0.0);
                let sigma = sigma.unwrap_or(basis.stddev);
                if sigma == 0.0 {
                    // Degenerate distribution: the noise is just mu.
                    return Ok(segment.iter().map(|x| x + mu).collect());
                }
                let normal = Normal::new(mu, sigma).map_err(|e| {
                    FaultError::InvalidParameter {
                        name: "sigma",
                        reason: e.to_string(),
                    }
                })?;
                Ok(segment.iter().map(|x| x + normal.sample(rng)).collect())
            }

            Fault::UniformNoise { low, high } => {
                let low = low.unwrap_or(-basis.stddev);
                let high = high.unwrap_or(basis.stddev);
                if low > high {
                    return Err(FaultError::InvalidParameter {
                        name: "low",
                        reason: format!("low ({low}) exceeds high ({high})"),
                    });
                }
                if low == high {
                    return Ok(segment.iter().map(|x| x + low).collect());
                }
                Ok(segment
                    .iter()
                    .map(|x| x + rng.gen_range(low..=high))
                    .collect())
            }

            Fault::MissingData => Ok(vec![f64::NAN; segment.len()]),

            Fault::StuckValue { value } => {
                let stuck = match value {
                    Some(v) => v,
                    None => {
                        let u = rng.gen_range(STUCK_PERTURBATION.0..=STUCK_PERTURBATION.1);
                        basis.mean * (1.0 + f64::from(direction) * u)
                    }
                };
                Ok(vec![stuck; segment.len()])
            }
        }
    }
}

fn derive_drift_rate<R: Rng>(mean: f64, direction: i8, rng: &mut R) -> f64 {
    let ceil = (DRIFT_RATE_CEIL * mean).abs();
    if ceil == 0.0 {
        // A zero-mean segment gives no scale to derive a rate from.
        return 0.0;
    }
    f64::from(direction) * rng.gen_range(0.0..ceil)
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(v: &Option<f64>) -> String {
            v.map_or_else(|| "auto".to_string(), |v| v.to_string())
        }
        match self {
            Fault::Drift { rate } => write!(f, "drift(rate={})", opt(rate)),
            Fault::Offset { rate } => write!(f, "offset(rate={})", opt(rate)),
            Fault::GaussianNoise { mu, sigma } => {
                write!(f, "gaussian-noise(mu={}, sigma={})", opt(mu), opt(sigma))
            }
            Fault::UniformNoise { low, high } => {
                write!(f, "uniform-noise(low={}, high={})", opt(low), opt(high))
            }
            Fault::MissingData => write!(f, "missing-data"),
            Fault::StuckValue { value } => write!(f, "stuck-value(value={})", opt(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn basis(xs: &[f64]) -> SegmentSummary {
        SegmentSummary::from_slice(xs)
    }

    #[test]
    fn drift_fixed_rate_is_linear() {
        let seg = [10.0, 10.0, 10.0];
        let fault = Fault::Drift { rate: Some(1.0) };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert_eq!(out, vec![11.0, 12.0, 13.0]);
    }

    #[test]
    fn drift_zero_rate_is_identity() {
        let seg = [1.0, 2.0, 3.0];
        let fault = Fault::Drift { rate: Some(0.0) };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert_eq!(out, seg.to_vec());
    }

    #[test]
    fn drift_derived_rate_scales_to_mean_and_direction() {
        let seg = [100.0; 50];
        let fault = Fault::Drift { rate: None };
        let out = fault.apply(&seg, &basis(&seg), -1, &mut rng(3)).unwrap();

        // Rate magnitude is below 1e-4 * 100, signed negative.
        let step = out[0] - seg[0];
        assert!(step < 0.0);
        assert!(step.abs() < 1e-4 * 100.0);
        // Linear: constant per-sample increment.
        let step2 = out[1] - seg[1] - step;
        assert!((step2 - step).abs() < 1e-12);
    }

    #[test]
    fn drift_derived_rate_zero_mean_is_identity() {
        let seg = [1.0, -1.0, 1.0, -1.0];
        let fault = Fault::Drift { rate: None };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert_eq!(out, seg.to_vec());
    }

    #[test]
    fn offset_shifts_by_rate_times_mean() {
        // mean 25, rate 0.1 -> shift 2.5
        let seg = [20.0, 30.0];
        let fault = Fault::Offset { rate: Some(0.1) };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert_eq!(out, vec![22.5, 32.5]);
    }

    #[test]
    fn offset_default_rate() {
        let seg = [10.0, 10.0];
        let fault = Fault::Offset { rate: None };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        let expect = 10.0 + DEFAULT_OFFSET_RATE * 10.0;
        assert!((out[0] - expect).abs() < 1e-12);
    }

    #[test]
    fn gaussian_noise_perturbs_values() {
        let seg = [1.0; 32];
        let fault = Fault::GaussianNoise {
            mu: Some(0.0),
            sigma: Some(1.0),
        };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert!(out.iter().any(|&y| (y - 1.0).abs() > 1e-6));
    }

    #[test]
    fn gaussian_noise_default_sigma_on_constant_segment_is_identity() {
        let seg = [5.0; 8];
        let fault = Fault::GaussianNoise { mu: None, sigma: None };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert_eq!(out, seg.to_vec());
    }

    #[test]
    fn gaussian_noise_negative_sigma_rejected() {
        let seg = [1.0, 2.0];
        let fault = Fault::GaussianNoise {
            mu: Some(0.0),
            sigma: Some(-1.0),
        };
        let err = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap_err();
        assert!(matches!(err, FaultError::InvalidParameter { name: "sigma", .. }));
    }

    #[test]
    fn uniform_noise_stays_in_bounds() {
        let seg = [0.0; 64];
        let fault = Fault::UniformNoise {
            low: Some(-2.0),
            high: Some(3.0),
        };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(1)).unwrap();
        assert!(out.iter().all(|&y| (-2.0..=3.0).contains(&y)));
        assert!(out.iter().any(|&y| y != 0.0));
    }

    #[test]
    fn uniform_noise_inverted_bounds_rejected() {
        let seg = [1.0, 2.0];
        let fault = Fault::UniformNoise {
            low: Some(1.0),
            high: Some(-1.0),
        };
        let err = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap_err();
        assert!(matches!(err, FaultError::InvalidParameter { name: "low", .. }));
    }

    #[test]
    fn uniform_noise_equal_bounds_adds_constant() {
        let seg = [1.0, 2.0];
        let fault = Fault::UniformNoise {
            low: Some(0.5),
            high: Some(0.5),
        };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert_eq!(out, vec![1.5, 2.5]);
    }

    #[test]
    fn missing_data_is_all_nan() {
        let seg = [1.0, 2.0, 3.0];
        let out = Fault::MissingData
            .apply(&seg, &basis(&seg), 1, &mut rng(0))
            .unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|y| y.is_nan()));
    }

    #[test]
    fn stuck_value_fixed_is_constant() {
        let seg = [5.0, 6.0, 7.0];
        let fault = Fault::StuckValue { value: Some(99.0) };
        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        assert_eq!(out, vec![99.0, 99.0, 99.0]);
    }

    #[test]
    fn stuck_value_derived_is_near_mean() {
        let seg = [10.0; 16];
        let fault = Fault::StuckValue { value: None };

        let out = fault.apply(&seg, &basis(&seg), 1, &mut rng(0)).unwrap();
        let c = out[0];
        assert!(out.iter().all(|&y| y == c));
        // direction +1: 1% to 10% above the mean
        assert!(c > 10.0 * 1.01 - 1e-9 && c < 10.0 * 1.10 + 1e-9);

        let out = fault.apply(&seg, &basis(&seg), -1, &mut rng(0)).unwrap();
        let c = out[0];
        assert!(c < 10.0 * 0.99 + 1e-9 && c > 10.0 * 0.90 - 1e-9);
    }

    #[test]
    fn same_seed_same_draws() {
        let seg = [1.0; 16];
        let fault = Fault::GaussianNoise { mu: None, sigma: Some(2.0) };
        let a = fault.apply(&seg, &basis(&seg), 1, &mut rng(9)).unwrap();
        let b = fault.apply(&seg, &basis(&seg), 1, &mut rng(9)).unwrap();
        assert_eq!(a, b);

        let c = fault.apply(&seg, &basis(&seg), 1, &mut rng(10)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn fault_display() {
        let f = Fault::Drift { rate: Some(0.5) };
        assert_eq!(f.to_string(), "drift(rate=0.5)");

        let f = Fault::GaussianNoise { mu: None, sigma: Some(2.0) };
        assert_eq!(f.to_string(), "gaussian-noise(mu=auto, sigma=2)");

        assert_eq!(Fault::MissingData.to_string(), "missing-data");
    }

    #[test]
    fn fault_serde_round_trip() {
        let f = Fault::UniformNoise {
            low: Some(-1.0),
            high: None,
        };
        let json = serde_json::to_string(&f).unwrap();
        let back: Fault = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);

        let f: Fault = serde_json::from_str(r#"{"kind":"missing_data"}"#).unwrap();
        assert_eq!(f, Fault::MissingData);
    }
}
