//! The seam between the engine and playback backends.
//!
//! The engine is pull-model: a backend asks for mono S16 samples whenever
//! its hardware needs them, by invoking a render callback of the shape
//! `FnMut(&mut [i16]) -> Playback`. The callback contract:
//!
//! - every call fills the whole buffer (silence counts as filled);
//! - the sample stream is contiguous across calls, no gaps or reordering;
//! - once the callback returns [`Playback::Complete`] the backend stops
//!   asking for audio (a backend whose hardware keeps ticking substitutes
//!   silence).

pub mod cpal_driver;

pub use cpal_driver::{CpalDriver, DriverError};

use crate::engine::Playback;

/// A playback backend that pulls samples from a render callback.
pub trait AudioDriver {
    type Error;

    /// Start pulling audio from `render` on the backend's own thread.
    fn play<F>(&mut self, render: F) -> Result<(), Self::Error>
    where
        F: FnMut(&mut [i16]) -> Playback + Send + 'static;

    /// Suspend the stream without discarding position.
    fn pause(&mut self) -> Result<(), Self::Error>;

    /// Resume a paused stream.
    fn resume(&mut self) -> Result<(), Self::Error>;
}
