//! Injection window resolution.
//!
//! A fault is active over a half-open index range `[start, stop)`.
//! Callers describe each endpoint with a [`Bound`]; [`resolve`] turns
//! the pair into concrete, clamped, ordered indices over a sequence of
//! known length. Random endpoints are drawn from the caller's RNG so
//! the same seed always produces the same window.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FaultError, Result};

/// One endpoint of an injection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Use the sequence edge: 0 for start, `length` for stop.
    #[default]
    Unset,
    /// Draw the endpoint from the injector's RNG.
    Random,
    /// An explicit index, clamped to the valid range.
    At(usize),
}

/// Resolve a `(start, stop)` specification into concrete bounds.
///
/// Rules:
/// - `Unset` start is 0; `Unset` stop is `length`.
/// - `Random` start draws uniformly from `[0, length / 2)`.
/// - `Random` stop draws uniformly from `(start, length]`, so the window
///   always has at least one sample.
/// - Explicit start clamps to `[0, length - 1]`; explicit stop clamps
///   to `length`.
///
/// On success the output satisfies `0 <= start < stop <= length`.
/// Sequences shorter than two samples cannot host a window, and an
/// explicit stop at or below the (clamped) start has no randomness to
/// fall back on; both fail with [`FaultError::InvalidInterval`].
pub fn resolve<R: Rng>(
    start: Bound,
    stop: Bound,
    length: usize,
    rng: &mut R,
) -> Result<(usize, usize)> {
    if length < 2 {
        return Err(FaultError::InvalidInterval {
            start: 0,
            stop: length,
            length,
        });
    }

    let start_ix = match start {
        Bound::Unset => 0,
        Bound::Random => rng.gen_range(0..length / 2),
        Bound::At(s) => s.min(length - 1),
    };

    let stop_ix = match stop {
        Bound::Unset => length,
        Bound::Random => rng.gen_range(start_ix + 1..=length),
        Bound::At(s) => s.min(length),
    };

    if stop_ix <= start_ix {
        return Err(FaultError::InvalidInterval {
            start: start_ix,
            stop: stop_ix,
            length,
        });
    }

    Ok((start_ix, stop_ix))
}
