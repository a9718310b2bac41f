//! Sequence injector: applies faults over a window while keeping the
//! pristine original for comparison and restoration.
//!
//! An [`Injector`] owns two copies of the sequence. `original` is
//! captured once at construction and never mutated; `current` starts
//! equal to it and is replaced on every [`Injector::inject`] call. The
//! faulted segment is always computed from `current`, so injecting a
//! second fault compounds on top of the first. Parameter defaults and
//! the offset basis resolve against the `original` segment statistics,
//! so stacked faults keep a stable basis.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FaultError, Result};
use crate::faults::Fault;
use crate::interval::{self, Bound};
use crate::stats::SegmentSummary;

/// Configuration for an [`Injector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Start of the injection window.
    pub start: Bound,
    /// End of the injection window (exclusive).
    pub stop: Bound,
    /// Sign applied to derived drift rates and stuck values. Must be
    /// -1 (faults pull the signal down) or 1 (faults push it up).
    pub direction: i8,
    /// Seed for the injector's private RNG.
    pub seed: u64,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            start: Bound::Unset,
            stop: Bound::Unset,
            direction: -1,
            seed: 42,
        }
    }
}

/// How [`Injector::inject_custom`] combines caller values with the
/// current segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpliceMode {
    /// Treat the values as per-sample deltas added to the segment.
    Add,
    /// Replace the segment outright.
    Replace,
}

/// Stateful fault injector over one sequence.
///
/// # Example
///
/// ```
/// use faultforge::faults::Fault;
/// use faultforge::injector::{Injector, InjectorConfig};
/// use faultforge::interval::Bound;
///
/// let config = InjectorConfig {
///     start: Bound::At(2),
///     stop: Bound::At(5),
///     direction: 1,
///     ..Default::default()
/// };
/// let mut injector = Injector::new(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0], config).unwrap();
///
/// injector.inject(&Fault::Drift { rate: Some(0.5) }).unwrap();
/// assert_eq!(injector.current(), &[1.0, 1.0, 1.5, 2.0, 2.5, 1.0]);
///
/// injector.restore();
/// assert_eq!(injector.current(), injector.original());
/// ```
#[derive(Debug)]
pub struct Injector {
    original: Vec<f64>,
    current: Vec<f64>,
    start: usize,
    stop: usize,
    direction: i8,
    rng: ChaCha8Rng,
}

impl Injector {
    /// Create an injector bound to a copy of `values`.
    ///
    /// The window is resolved once, here; random bounds draw from the
    /// RNG seeded by `config.seed`.
    pub fn new(values: &[f64], config: InjectorConfig) -> Result<Self> {
        if config.direction != -1 && config.direction != 1 {
            return Err(FaultError::InvalidParameter {
                name: "direction",
                reason: format!("must be -1 or 1, got {}", config.direction),
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let (start, stop) = interval::resolve(config.start, config.stop, values.len(), &mut rng)?;

        Ok(Self {
            original: values.to_vec(),
            current: values.to_vec(),
            start,
            stop,
            direction: config.direction,
            rng,
        })
    }

    /// Apply a fault to the current sequence.
    ///
    /// The faulted segment is computed from `current[start..stop]` and
    /// spliced back; indices outside the window are untouched. On error
    /// `current` is left unchanged.
    pub fn inject(&mut self, fault: &Fault) -> Result<&[f64]> {
        let basis = SegmentSummary::from_slice(&self.original[self.start..self.stop]);
        let segment = &self.current[self.start..self.stop];
        let faulted = fault.apply(segment, &basis, self.direction, &mut self.rng)?;

        debug!("injecting {fault} over [{}, {})", self.start, self.stop);
        self.current[self.start..self.stop].copy_from_slice(&faulted);
        Ok(&self.current)
    }

    /// Splice caller-provided values into the window, either as deltas
    /// or as outright replacements.
    ///
    /// Fails with [`FaultError::InvalidParameter`] when `values` does
    /// not match the window length.
    pub fn inject_custom(&mut self, values: &[f64], mode: SpliceMode) -> Result<&[f64]> {
        let span = self.stop - self.start;
        if values.len() != span {
            return Err(FaultError::InvalidParameter {
                name: "values",
                reason: format!("expected {span} samples, got {}", values.len()),
            });
        }

        let segment = &mut self.current[self.start..self.stop];
        match mode {
            SpliceMode::Add => {
                for (y, delta) in segment.iter_mut().zip(values) {
                    *y += delta;
                }
            }
            SpliceMode::Replace => segment.copy_from_slice(values),
        }
        Ok(&self.current)
    }

    /// Reset `current` back to the pristine original.
    pub fn restore(&mut self) -> &[f64] {
        self.current.copy_from_slice(&self.original);
        &self.current
    }

    /// Read-only `(original, current)` pair for comparison, reporting,
    /// or plotting by external collaborators.
    pub fn compare(&self) -> (&[f64], &[f64]) {
        (&self.original, &self.current)
    }

    /// Re-resolve the injection window against the same sequence.
    ///
    /// Random bounds draw from the injector's RNG. On error the
    /// previous window is kept.
    pub fn set_interval(&mut self, start: Bound, stop: Bound) -> Result<()> {
        let (start, stop) = interval::resolve(start, stop, self.original.len(), &mut self.rng)?;
        self.start = start;
        self.stop = stop;
        Ok(())
    }

    /// Descriptive statistics of the current in-window segment.
    pub fn segment_summary(&self) -> SegmentSummary {
        SegmentSummary::from_slice(&self.current[self.start..self.stop])
    }

    /// The pristine sequence captured at construction.
    pub fn original(&self) -> &[f64] {
        &self.original
    }

    /// The sequence after all injections so far.
    pub fn current(&self) -> &[f64] {
        &self.current
    }

    /// The resolved injection window `[start, stop)`.
    pub fn interval(&self) -> (usize, usize) {
        (self.start, self.stop)
    }

    /// The direction flag used by derived drift and stuck values.
    pub fn direction(&self) -> i8 {
        self.direction
    }
}
