//! Fixed-point DSP primitives for the synthesis hot path.
//!
//! Everything here is allocation-free and integer-only so it can run inside
//! the audio callback. Q1.31 is the single runtime numeric format; floating
//! point appears only in setup-time conversions used by the compiler.

/// Q1.31 envelope generators (ADSR and exponential pluck).
pub mod envelope;
/// Setup-time and hot-path Q1.31 arithmetic.
pub mod fixed;
/// DDS phase-accumulator oscillator partials.
pub mod oscillator;
/// The shared 1024-entry sine lookup table.
pub mod sine;

pub use envelope::{AdsrPhase, AdsrState, EnvelopeState, PluckState};
pub use oscillator::{phase_increment, Partial};
pub use sine::SineTable;
