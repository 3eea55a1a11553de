use crate::dsp::envelope::EnvelopeState;
use crate::dsp::fixed::q31_mul;
use crate::dsp::oscillator::Partial;
use crate::dsp::sine::SineTable;
use crate::instruments::Instrument;
use crate::MAX_PARTIALS;

/// One scheduled voice: immutable timing and volume decided by the
/// compiler, plus the envelope and oscillator state the sequencer mutates
/// in place.
///
/// Invariants: `release_sample >= start_sample`, `1 <= num_partials <= 8`,
/// and every live partial carries a phase increment for an absolute pitch
/// fixed at compile time.
#[derive(Debug, Clone)]
pub struct Event {
    /// Absolute timeline position of the first sample.
    pub start_sample: u32,
    /// Sounding length after articulation shortening.
    pub duration_samples: u32,
    /// Timeline position where the envelope release begins.
    pub release_sample: u32,
    pub instrument: &'static Instrument,
    /// Q1.31 gain applied after the envelope.
    pub volume_scale: i32,
    pub envelope: EnvelopeState,
    pub num_partials: u8,
    pub partials: [Partial; MAX_PARTIALS],
}

impl Event {
    /// Produce this event's next output sample.
    ///
    /// The caller guarantees the event has been activated, i.e.
    /// `current_sample_index >= start_sample`.
    #[inline]
    pub fn generate_sample(&mut self, sine: &SineTable, current_sample_index: u64) -> i16 {
        let samples_since_start = (current_sample_index - self.start_sample as u64) as u32;
        let samples_until_release = self.release_sample as i64 - current_sample_index as i64;

        let envelope_level = self
            .envelope
            .advance(samples_since_start, samples_until_release);

        let mut event_sample: i32 = 0;
        for partial in &mut self.partials[..self.num_partials as usize] {
            event_sample = event_sample.wrapping_add(partial.next_sample(sine));
        }

        let enveloped = q31_mul(event_sample, envelope_level);
        let scaled = q31_mul(enveloped, self.volume_scale);
        (scaled >> 16) as i16
    }
}
