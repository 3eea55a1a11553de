/*
Level (ADSR)
  1.0 |     /\________
      |    /  \       \
  0.6 |   /    \_______\___
      |  /              \  \
  0.0 |_/________________\__\__ time
      Attack Decay Sustain Release

Attack and decay are linear ramps driven by the sample clock; release is an
RC-style exponential (level *= coeff each sample) so note ends never click.
The pluck envelope is the release curve alone: a geometric decay from an
initial amplitude.

All levels are Q1.31. The phase is decided from timing on every call, so an
event that is activated late (or whose release lands mid-attack) still does
the right thing: `samples_until_release <= 0` always wins.
*/

use crate::dsp::fixed::q31_mul;
use crate::AUDIBLE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrPhase {
    Attack,
    Decay,
    Sustain,
    Release,
}

/// ADSR state carried per event. All counts are in samples; all levels and
/// the release coefficient are Q1.31, precomputed by the compiler so this
/// advances with integer arithmetic only.
#[derive(Debug, Clone, Copy)]
pub struct AdsrState {
    pub attack_samples: u32,
    pub decay_samples: u32,
    pub sustain_level: i32,
    pub release_samples: u32,
    pub min_release_samples: u32,
    pub release_coeff: i32,
    pub current_level: i32,
    pub release_start_level: i32,
    pub phase: AdsrPhase,
}

/// Exponential-decay state for plucked voices.
#[derive(Debug, Clone, Copy)]
pub struct PluckState {
    pub initial_amplitude: i32,
    pub decay_multiplier: i32,
    pub current_level: i32,
}

/// Per-event envelope, dispatched by tag on the hot path.
#[derive(Debug, Clone, Copy)]
pub enum EnvelopeState {
    Adsr(AdsrState),
    Pluck(PluckState),
}

impl EnvelopeState {
    /// Advance one sample and return the new Q1.31 level.
    ///
    /// `samples_since_start` counts from event activation;
    /// `samples_until_release` goes non-positive once the written duration
    /// has elapsed.
    #[inline]
    pub fn advance(&mut self, samples_since_start: u32, samples_until_release: i64) -> i32 {
        match self {
            EnvelopeState::Adsr(adsr) => adsr.advance(samples_since_start, samples_until_release),
            EnvelopeState::Pluck(pluck) => pluck.advance(),
        }
    }

    /// Current Q1.31 level without advancing; used for eviction checks.
    #[inline]
    pub fn current_level(&self) -> i32 {
        match self {
            EnvelopeState::Adsr(adsr) => adsr.current_level,
            EnvelopeState::Pluck(pluck) => pluck.current_level,
        }
    }

    /// True once an ADSR envelope has fully released. Pluck envelopes are
    /// instead retired by the audibility threshold.
    #[inline]
    pub fn is_finished(&self) -> bool {
        match self {
            EnvelopeState::Adsr(adsr) => adsr.phase == AdsrPhase::Release && adsr.current_level == 0,
            EnvelopeState::Pluck(pluck) => pluck.current_level < AUDIBLE_THRESHOLD,
        }
    }
}

impl AdsrState {
    #[inline]
    fn advance(&mut self, samples_since_start: u32, samples_until_release: i64) -> i32 {
        if samples_until_release <= 0 {
            if self.phase != AdsrPhase::Release {
                self.release_start_level = self.current_level;
                self.phase = AdsrPhase::Release;
            }
            self.current_level = q31_mul(self.current_level, self.release_coeff);
            // Snap to zero well below audibility so the decay terminates.
            if self.current_level < AUDIBLE_THRESHOLD / 4 {
                self.current_level = 0;
            }
        } else if samples_since_start < self.attack_samples {
            self.phase = AdsrPhase::Attack;
            let range = 0x7FFF_FFFF - AUDIBLE_THRESHOLD;
            let progress =
                (samples_since_start as i64 * range as i64 / self.attack_samples as i64) as i32;
            self.current_level = AUDIBLE_THRESHOLD + progress;
        } else if samples_since_start < self.attack_samples + self.decay_samples {
            self.phase = AdsrPhase::Decay;
            let decay_progress = samples_since_start - self.attack_samples;
            let range = 0x7FFF_FFFF - self.sustain_level;
            let drop = (decay_progress as i64 * range as i64 / self.decay_samples as i64) as i32;
            self.current_level = 0x7FFF_FFFF - drop;
        } else {
            self.phase = AdsrPhase::Sustain;
            self.current_level = self.sustain_level;
        }

        self.current_level
    }
}

impl PluckState {
    #[inline]
    fn advance(&mut self) -> i32 {
        self.current_level = q31_mul(self.current_level, self.decay_multiplier);
        self.current_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::fixed::{q31_from_f64, Q31_ONE};

    fn test_adsr() -> AdsrState {
        AdsrState {
            attack_samples: 100,
            decay_samples: 100,
            sustain_level: q31_from_f64(0.6),
            release_samples: 1000,
            min_release_samples: 20,
            // exp(-ln((1+1e-5)/1e-5)/1000) in Q1.31
            release_coeff: ((-((1.0 + 1e-5f64) / 1e-5).ln() / 1000.0).exp() * Q31_ONE as f64)
                as i32,
            current_level: AUDIBLE_THRESHOLD,
            release_start_level: 0,
            phase: AdsrPhase::Attack,
        }
    }

    #[test]
    fn attack_ramps_to_full_scale() {
        let mut env = EnvelopeState::Adsr(test_adsr());
        let mut last = 0;
        for n in 0..100 {
            let level = env.advance(n, 10_000);
            assert!(level >= last, "attack must be non-decreasing");
            last = level;
        }
        // One sample past the attack window the decay starts from the top.
        let level = env.advance(100, 10_000);
        assert_eq!(level, Q31_ONE);
    }

    #[test]
    fn decay_settles_on_sustain() {
        let mut env = EnvelopeState::Adsr(test_adsr());
        for n in 0..250 {
            env.advance(n, 10_000);
        }
        assert_eq!(env.current_level(), q31_from_f64(0.6));
        if let EnvelopeState::Adsr(adsr) = env {
            assert_eq!(adsr.phase, AdsrPhase::Sustain);
        }
    }

    #[test]
    fn release_decays_to_exact_zero() {
        let mut env = EnvelopeState::Adsr(test_adsr());
        for n in 0..250 {
            env.advance(n, 10_000);
        }
        let sustain = env.current_level();
        // Drive release until the snap-to-zero fires.
        let mut level = sustain;
        for n in 0..20_000 {
            level = env.advance(250 + n, -(n as i64));
            if level == 0 {
                break;
            }
        }
        assert_eq!(level, 0);
        assert!(env.is_finished());
    }

    #[test]
    fn release_captures_start_level() {
        let mut env = test_adsr();
        for n in 0..250 {
            env.advance(n, 10_000);
        }
        let before = env.current_level;
        env.advance(250, 0);
        assert_eq!(env.release_start_level, before);
        assert_eq!(env.phase, AdsrPhase::Release);
    }

    #[test]
    fn early_release_preempts_attack() {
        let mut env = test_adsr();
        env.advance(5, 10_000);
        // Release lands while still attacking; release must win.
        env.advance(6, 0);
        assert_eq!(env.phase, AdsrPhase::Release);
    }

    #[test]
    fn pluck_is_monotone_decay() {
        let mut env = EnvelopeState::Pluck(PluckState {
            initial_amplitude: Q31_ONE,
            decay_multiplier: q31_from_f64(0.999),
            current_level: Q31_ONE,
        });
        let mut last = Q31_ONE;
        for _ in 0..20_000 {
            let level = env.advance(0, 0);
            assert!(level <= last);
            last = level;
        }
        assert!(last < AUDIBLE_THRESHOLD);
        assert!(env.is_finished());
    }
}
