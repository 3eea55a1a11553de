//! The pull-model sequencer: an external audio driver asks for S16 frames
//! and the sequencer activates, mixes, and retires events sample by sample.
//!
//! The render path is hard-realtime: no allocation, no locks, no floating
//! point, no error channel. Anything that could fail was resolved at
//! compile time; the only runtime "failure" is bounded starvation when more
//! than 32 events want to sound at once, and those are skipped silently.

use crate::dsp::sine::SineTable;
use crate::engine::event::Event;
use crate::MAX_SIMULTANEOUS_EVENTS;

/// What the driver should do after a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// More audio follows; call again.
    Continue,
    /// The song is finished. The driver must not call render again.
    Complete,
}

/// Owns a compiled song and produces its samples on demand.
///
/// Active voices are indices into the owned event vector, which is never
/// resized during playback, so the indices stay valid for the sequencer's
/// lifetime. The instrument/key/temperament tables are global constants;
/// each sequencer carries its own sine table and event storage, so separate
/// sequencers never share mutable state.
pub struct Sequencer {
    events: Vec<Event>,
    sine: SineTable,
    sample_rate: u32,
    current_sample_index: u64,
    next_event_index: usize,
    active: [usize; MAX_SIMULTANEOUS_EVENTS],
    num_active: usize,
    completed: bool,
}

impl Sequencer {
    /// Take ownership of a compiled, start-sorted event vector.
    pub fn new(events: Vec<Event>, sample_rate: u32, sine: SineTable) -> Self {
        Self {
            events,
            sine,
            sample_rate,
            current_sample_index: 0,
            next_event_index: 0,
            active: [0; MAX_SIMULTANEOUS_EVENTS],
            num_active: 0,
            completed: false,
        }
    }

    /// Fill `buffer` with the next `buffer.len()` mono S16 samples.
    ///
    /// Returns [`Playback::Complete`] exactly once, on the call where the
    /// last active voice dies with no events left to start.
    pub fn render(&mut self, buffer: &mut [i16]) -> Playback {
        for slot in buffer.iter_mut() {
            // 1. Activate everything due at this sample. Starts are sorted,
            // so this stops at the first future event.
            while self.next_event_index < self.events.len()
                && self.events[self.next_event_index].start_sample as u64
                    <= self.current_sample_index
            {
                if self.num_active < MAX_SIMULTANEOUS_EVENTS {
                    self.active[self.num_active] = self.next_event_index;
                    self.num_active += 1;
                }
                self.next_event_index += 1;
            }

            // 2. Mix. Compile-time volume headroom keeps the i32 sum inside
            // S16 range for the supported voice counts; the cast truncates.
            let mut mixed: i32 = 0;
            for j in 0..self.num_active {
                let index = self.active[j];
                mixed = mixed.wrapping_add(
                    self.events[index]
                        .generate_sample(&self.sine, self.current_sample_index)
                        as i32,
                );
            }
            *slot = mixed as i16;

            // 3. Retire finished envelopes, back to front so swap-remove
            // never skips an entry.
            let mut j = self.num_active;
            while j > 0 {
                j -= 1;
                if self.events[self.active[j]].envelope.is_finished() {
                    self.active[j] = self.active[self.num_active - 1];
                    self.num_active -= 1;
                }
            }

            self.current_sample_index += 1;
        }

        if self.num_active == 0 && self.next_event_index >= self.events.len() {
            self.completed = true;
            Playback::Complete
        } else {
            Playback::Continue
        }
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn current_sample(&self) -> u64 {
        self.current_sample_index
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of currently sounding voices (diagnostic).
    pub fn active_voices(&self) -> usize {
        self.num_active
    }
}
