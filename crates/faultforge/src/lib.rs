//! Synthetic fault injection for numeric time-series data.
//!
//! This crate provides four main components:
//!
//! 1. **[`faults`]** — The fault catalog (drift, offset, Gaussian noise,
//!    uniform noise, missing data, stuck value) with per-variant default
//!    parameter resolution
//! 2. **[`interval`]** — Resolution of start/stop specifications into
//!    concrete, clamped injection windows
//! 3. **[`injector`]** — Stateful injector that applies faults over a
//!    window of a sequence while retaining the pristine original
//! 4. **[`table`]** — Per-column fault assignment over tabular data
//!
//! # Architecture
//!
//! ```text
//! Caller                 Injector                 Fault catalog
//! ──────                 ────────                 ─────────────
//! Fault::Drift {..} ──→ inject(&fault)      ──→ apply(segment, basis, rng)
//! restore()         ──→ current := original
//! compare()         ──→ (&original, &current)
//!
//! TableInjector maps column names to (possibly shared) injector
//! handles and folds their faulted sequences back into a table copy.
//! ```
//!
//! All randomness (random windows, derived drift rates, derived stuck
//! values, noise draws) comes from a per-injector seeded RNG, so runs
//! are reproducible: the same seed always yields the same faults.

pub mod error;
pub mod faults;
pub mod injector;
pub mod interval;
pub mod stats;
pub mod table;
