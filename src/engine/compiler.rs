//! Notes → events: the setup-time stage that does every piece of floating
//! point and music-theory work, leaving the sequencer a pure integer job.

use log::debug;

use crate::dsp::envelope::{AdsrPhase, AdsrState, EnvelopeState, PluckState};
use crate::dsp::fixed::{q31_from_f32, Q31_ONE};
use crate::dsp::oscillator::Partial;
use crate::engine::event::Event;
use crate::instruments::EnvelopeSpec;
use crate::notation::Note;
use crate::theory::key::KeySignature;
use crate::theory::{note_to_frequency, Temperament, C_MAJOR};
use crate::{AUDIBLE_THRESHOLD, BASE_VOLUME_SCALE, MAX_PARTIALS};

/// Fraction of the written duration a note actually sounds (tenuto-like).
const ARTICULATION: f64 = 0.9;

/// Release decay targets -100 dB of the start level.
const RELEASE_TARGET_RATIO: f64 = 1e-5;

/// Everything the compiler needs besides the notes themselves.
#[derive(Debug, Clone, Copy)]
pub struct CompileSettings {
    pub sample_rate: u32,
    pub tempo_bpm: u32,
    pub key: &'static KeySignature,
    pub temperament: Temperament,
    /// Chromatic transposition in semitones, applied to every note.
    pub transposition: i32,
    /// Base volume in [0, 1].
    pub volume: f32,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            tempo_bpm: 120,
            key: &C_MAJOR,
            temperament: Temperament::Equal,
            transposition: 0,
            volume: 1.0,
        }
    }
}

/// Compile a parsed note sequence into a chronologically ordered event
/// vector.
///
/// Chord members land on the same start sample with 1/sqrt(N) attenuation;
/// rests advance time without producing events; notes whose pitch falls
/// below the representable range are skipped. The result is stably sorted
/// by start sample, so members of one chord stay in emission order.
pub fn compile(notes: &[Note], settings: &CompileSettings) -> Vec<Event> {
    let mut events = Vec::new();
    if notes.is_empty() {
        return events;
    }

    let samples_per_beat = 60 * settings.sample_rate / settings.tempo_bpm;
    let mut current_sample: u64 = 0;

    for (i, note) in notes.iter().enumerate() {
        let raw_duration = raw_duration_samples(note, samples_per_beat);

        if !note.is_rest() {
            let freq = note_to_frequency(note, settings.temperament, settings.key, settings.transposition);
            if freq > 0.0 {
                events.push(build_event(
                    note,
                    notes,
                    freq,
                    current_sample as u32,
                    raw_duration,
                    settings,
                ));
            }
        }

        // Chord members share a start sample: hold the clock until the
        // last member. Rests always advance.
        let next_is_chord_mate = notes
            .get(i + 1)
            .is_some_and(|next| note.chord_id > 0 && next.chord_id == note.chord_id);
        if note.is_rest() || !next_is_chord_mate {
            current_sample += raw_duration as u64;
        }
    }

    events.sort_by_key(|event| event.start_sample);
    debug!("compiled {} notes into {} events", notes.len(), events.len());
    events
}

/// Merge independently compiled voices into one timeline. The sort is
/// stable, so simultaneous events keep voice order.
pub fn merge_voices(voices: Vec<Vec<Event>>) -> Vec<Event> {
    let mut merged: Vec<Event> = voices.into_iter().flatten().collect();
    merged.sort_by_key(|event| event.start_sample);
    merged
}

/// Timeline span through the last release point, in samples. The envelope
/// tail rings somewhat past this.
pub fn song_length_samples(events: &[Event]) -> u64 {
    events
        .iter()
        .map(|event| event.release_sample as u64)
        .max()
        .unwrap_or(0)
}

fn raw_duration_samples(note: &Note, samples_per_beat: u32) -> u32 {
    let mut duration = samples_per_beat * 4 / note.value;
    if note.dotted {
        duration = duration * 3 / 2;
    }
    let ratio = note.tuplet.ratio();
    if ratio != 1.0 {
        duration = (duration as f32 * ratio) as u32;
    }
    duration
}

fn build_event(
    note: &Note,
    all_notes: &[Note],
    freq: f64,
    start_sample: u32,
    raw_duration: u32,
    settings: &CompileSettings,
) -> Event {
    let duration_samples = (raw_duration as f64 * ARTICULATION) as u32;

    let mut event_volume = settings.volume;
    if note.chord_id > 0 {
        let chord_size = all_notes
            .iter()
            .filter(|member| member.chord_id == note.chord_id)
            .count();
        event_volume /= (chord_size as f32).sqrt();
    }
    let volume_scale = (event_volume as f64 * BASE_VOLUME_SCALE as f64).round() as i32;

    let mut partials = [Partial::default(); MAX_PARTIALS];
    let num_partials = note.instrument.partials.len().min(MAX_PARTIALS);
    for (slot, spec) in partials.iter_mut().zip(&note.instrument.partials[..num_partials]) {
        *slot = Partial::new(
            freq * spec.ratio as f64,
            settings.sample_rate,
            q31_from_f32(spec.amplitude),
        );
    }

    Event {
        start_sample,
        duration_samples,
        release_sample: start_sample + duration_samples,
        instrument: note.instrument,
        volume_scale,
        envelope: build_envelope(&note.instrument.envelope, settings.sample_rate),
        num_partials: num_partials as u8,
        partials,
    }
}

fn build_envelope(spec: &EnvelopeSpec, sample_rate: u32) -> EnvelopeState {
    match *spec {
        EnvelopeSpec::Adsr {
            attack_ms,
            decay_ms,
            sustain,
            release_ms,
            min_release_ms,
        } => {
            let release_samples = ms_to_samples(release_ms, sample_rate);
            let min_release_samples = ms_to_samples(min_release_ms, sample_rate);
            EnvelopeState::Adsr(AdsrState {
                attack_samples: ms_to_samples(attack_ms, sample_rate),
                decay_samples: ms_to_samples(decay_ms, sample_rate),
                sustain_level: q31_from_f32(sustain),
                release_samples,
                min_release_samples,
                release_coeff: release_coefficient(release_samples.max(min_release_samples)),
                current_level: AUDIBLE_THRESHOLD,
                release_start_level: 0,
                phase: AdsrPhase::Attack,
            })
        }
        EnvelopeSpec::Pluck { decay_tau_s } => {
            let multiplier = (-1.0 / (decay_tau_s as f64 * sample_rate as f64)).exp();
            EnvelopeState::Pluck(PluckState {
                initial_amplitude: Q31_ONE,
                decay_multiplier: (multiplier * Q31_ONE as f64) as i32,
                current_level: Q31_ONE,
            })
        }
    }
}

fn ms_to_samples(ms: f32, sample_rate: u32) -> u32 {
    (sample_rate as f32 * ms / 1000.0) as u32
}

/// RC-style exponential coefficient: after `release_samples` iterations of
/// `level *= coeff`, the level has fallen to RELEASE_TARGET_RATIO.
fn release_coefficient(release_samples: u32) -> i32 {
    let rate = (-((1.0 + RELEASE_TARGET_RATIO) / RELEASE_TARGET_RATIO).ln()
        / release_samples.max(1) as f64)
        .exp();
    (rate * Q31_ONE as f64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_music;

    fn settings() -> CompileSettings {
        CompileSettings {
            volume: 0.5,
            ..CompileSettings::default()
        }
    }

    #[test]
    fn quarter_notes_land_on_beats() {
        let notes = parse_music("c4 d e f");
        let events = compile(&notes, &settings());
        assert_eq!(events.len(), 4);
        let starts: Vec<u32> = events.iter().map(|e| e.start_sample).collect();
        assert_eq!(starts, vec![0, 22_050, 44_100, 66_150]);
        // Articulation shortens the sounding duration to 90%.
        assert_eq!(events[0].duration_samples, 19_845);
        assert_eq!(events[0].release_sample, 19_845);
    }

    #[test]
    fn dotted_and_tuplet_timing() {
        let notes = parse_music("c4. c4t c4");
        let events = compile(&notes, &settings());
        // Dotted quarter: 22050 * 3/2 = 33075. Triplet quarter: 22050 * 2/3.
        assert_eq!(events[1].start_sample, 33_075);
        assert_eq!(events[2].start_sample, 33_075 + 14_700);
    }

    #[test]
    fn rests_advance_without_events() {
        let notes = parse_music("r2 c4");
        let events = compile(&notes, &settings());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_sample, 44_100);
    }

    #[test]
    fn chord_members_share_start_and_attenuate() {
        let notes = parse_music("<c e g>2");
        let events = compile(&notes, &settings());
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.start_sample == 0));
        let expected =
            ((0.5f32 / 3f32.sqrt()) as f64 * BASE_VOLUME_SCALE as f64).round() as i32;
        assert!(events.iter().all(|e| e.volume_scale == expected));
    }

    #[test]
    fn chord_advances_once() {
        let notes = parse_music("<c e>4 d4");
        let events = compile(&notes, &settings());
        assert_eq!(events[0].start_sample, 0);
        assert_eq!(events[1].start_sample, 0);
        assert_eq!(events[2].start_sample, 22_050);
    }

    #[test]
    fn middle_c_phase_increment() {
        let notes = parse_music("c4");
        let events = compile(&notes, &settings());
        // 261.6255653 Hz at 44100: floor((f / sr) * 2^32)
        assert_eq!(events[0].partials[0].phase_increment, 25_480_118);
    }

    #[test]
    fn instrument_partials_are_expanded() {
        let notes = parse_music("[pluck square] c4");
        let events = compile(&notes, &settings());
        assert_eq!(events[0].num_partials, 3);
        // floor((261.6255653 * n / 44100) * 2^32) for n = 1, 3, 5
        assert_eq!(events[0].partials[0].phase_increment, 25_480_118);
        assert_eq!(events[0].partials[1].phase_increment, 76_440_356);
        assert_eq!(events[0].partials[2].phase_increment, 127_400_594);
        assert!(matches!(events[0].envelope, EnvelopeState::Pluck(_)));
    }

    #[test]
    fn adsr_parameters_match_instrument() {
        let notes = parse_music("c4");
        let events = compile(&notes, &settings());
        let EnvelopeState::Adsr(adsr) = events[0].envelope else {
            panic!("default instrument uses ADSR");
        };
        assert_eq!(adsr.attack_samples, 2_205); // 50 ms
        assert_eq!(adsr.decay_samples, 8_820); // 200 ms
        assert_eq!(adsr.release_samples, 22_050); // 500 ms
        assert_eq!(adsr.min_release_samples, 882); // 20 ms
        assert_eq!(adsr.current_level, AUDIBLE_THRESHOLD);
        assert_eq!(adsr.phase, AdsrPhase::Attack);
        assert!(adsr.release_coeff > 0);
    }

    #[test]
    fn subterranean_pitches_are_skipped() {
        // Five octaves down pushes the absolute semitone negative.
        let notes = parse_music("c,,,,,4 d4");
        let events = compile(&notes, &settings());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn events_sorted_by_start() {
        let notes = parse_music("c4 d8 e2 <f a>4 g16");
        let events = compile(&notes, &settings());
        let starts: Vec<u32> = events.iter().map(|e| e.start_sample).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn merge_preserves_voice_order_on_ties() {
        let melody = compile(&parse_music("c4 d4"), &settings());
        let bass = compile(&parse_music("c,4 d,4"), &settings());
        let melody_inc = melody[0].partials[0].phase_increment;
        let bass_inc = bass[0].partials[0].phase_increment;
        let merged = merge_voices(vec![melody, bass]);
        assert_eq!(merged.len(), 4);
        // At each tied start sample, the melody (first voice) comes first.
        assert_eq!(merged[0].partials[0].phase_increment, melody_inc);
        assert_eq!(merged[1].partials[0].phase_increment, bass_inc);
    }

    #[test]
    fn song_length_is_last_release() {
        let events = compile(&parse_music("c4 d4"), &settings());
        assert_eq!(song_length_samples(&events), 22_050 + 19_845);
        assert_eq!(song_length_samples(&[]), 0);
    }
}
