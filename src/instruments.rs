//! The instrument registry: process-lifetime constants describing how a
//! note's partials and envelope are built at compile time.
//!
//! An instrument stores an envelope *spec* (tag plus timing parameters),
//! not a function pointer; the event compiler turns the spec into concrete
//! per-event `EnvelopeState` sized for the target sample rate, and the
//! sequencer dispatches on the state's tag.

/// Envelope shape and parameters, independent of sample rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeSpec {
    /// Linear attack/decay to a sustain plateau, exponential release.
    Adsr {
        attack_ms: f32,
        decay_ms: f32,
        /// Sustain plateau as a fraction of full scale.
        sustain: f32,
        release_ms: f32,
        /// Floor on the release time so note ends never click.
        min_release_ms: f32,
    },
    /// Pure exponential decay from full scale.
    Pluck {
        /// Time constant of the decay, in seconds.
        decay_tau_s: f32,
    },
}

/// One additive-synthesis partial: a frequency multiple of the fundamental
/// and its relative amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialSpec {
    pub ratio: f32,
    pub amplitude: f32,
}

/// A playable timbre. All instruments are `'static` constants; notes and
/// events hold non-owning references into this registry.
#[derive(Debug, PartialEq)]
pub struct Instrument {
    pub name: &'static str,
    pub envelope: EnvelopeSpec,
    pub partials: &'static [PartialSpec],
}

/// Keyboard-style default voice: a single sine partial under ADSR.
pub static PLUCK_SINE: Instrument = Instrument {
    name: "pluck sine",
    envelope: EnvelopeSpec::Adsr {
        attack_ms: 50.0,
        decay_ms: 200.0,
        sustain: 0.6,
        release_ms: 500.0,
        min_release_ms: 20.0,
    },
    partials: &[PartialSpec {
        ratio: 1.0,
        amplitude: 1.0,
    }],
};

/// Square-ish pluck: odd harmonics 1/3/5 with 1/n amplitude rolloff under
/// an exponential decay.
pub static PLUCK_SQUARE: Instrument = Instrument {
    name: "pluck square",
    envelope: EnvelopeSpec::Pluck { decay_tau_s: 0.2 },
    partials: &[
        PartialSpec {
            ratio: 1.0,
            amplitude: 1.0,
        },
        PartialSpec {
            ratio: 3.0,
            amplitude: 0.333,
        },
        PartialSpec {
            ratio: 5.0,
            amplitude: 0.2,
        },
    ],
};

static REGISTRY: [&Instrument; 2] = [&PLUCK_SINE, &PLUCK_SQUARE];

/// The instrument used before any `[name]` directive and for unknown names.
pub fn default_instrument() -> &'static Instrument {
    &PLUCK_SINE
}

/// Case-insensitive lookup; whitespace inside the name is significant.
/// Unknown names fall back to the default instrument.
pub fn lookup_instrument(name: &str) -> &'static Instrument {
    REGISTRY
        .iter()
        .copied()
        .find(|instrument| instrument.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(default_instrument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_PARTIALS;

    #[test]
    fn lookup_matches_case_insensitively() {
        assert_eq!(lookup_instrument("pluck sine").name, "pluck sine");
        assert_eq!(lookup_instrument("Pluck Square").name, "pluck square");
        assert_eq!(lookup_instrument("PLUCK SINE").name, "pluck sine");
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        assert_eq!(lookup_instrument("theremin"), default_instrument());
        assert_eq!(lookup_instrument(""), default_instrument());
        // Whitespace is significant within the token.
        assert_eq!(lookup_instrument("plucksine"), default_instrument());
    }

    #[test]
    fn partial_counts_stay_bounded() {
        for instrument in REGISTRY {
            assert!(!instrument.partials.is_empty());
            assert!(instrument.partials.len() <= MAX_PARTIALS);
        }
    }

    #[test]
    fn square_pluck_has_odd_harmonics() {
        let ratios: Vec<f32> = PLUCK_SQUARE.partials.iter().map(|p| p.ratio).collect();
        assert_eq!(ratios, vec![1.0, 3.0, 5.0]);
    }
}
