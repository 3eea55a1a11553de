#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frequency of C0 under equal temperament (C4 = 261.6256 Hz).
const EQUAL_C0_HZ: f64 = 16.351597831287414;

/// Frequency of C4 in the Werckmeister III tuning reference.
const WERCKMEISTER_C4_HZ: f64 = 261.626;

/// Werckmeister III interval ratios from the octave's C, by chromatic
/// position.
const WERCKMEISTER_RATIOS: [f64; 12] = [
    1.000_000_0,
    1.053_568_6,
    1.117_401_1,
    1.185_245_9,
    1.253_333_1,
    1.333_333_3,
    1.406_250_0,
    1.495_348_8,
    1.580_246_9,
    1.673_553_7,
    1.777_777_8,
    1.887_755_1,
];

/// Tuning system: maps an absolute semitone (counting from C0) to Hz.
///
/// A closed enum rather than a function pointer so the compiler can inline
/// both branches and the hot path never makes an indirect call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temperament {
    /// 12-tone equal temperament, 2^(n/12) from C0.
    Equal,
    /// Werckmeister III well temperament, ratio table from C in each octave.
    Werckmeister3,
}

impl Temperament {
    pub fn name(self) -> &'static str {
        match self {
            Temperament::Equal => "Equal Temperament",
            Temperament::Werckmeister3 => "Werckmeister III",
        }
    }

    /// Frequency in Hz of the given absolute semitone.
    pub fn frequency(self, absolute_semitone: i32) -> f64 {
        match self {
            Temperament::Equal => EQUAL_C0_HZ * 2f64.powf(absolute_semitone as f64 / 12.0),
            Temperament::Werckmeister3 => {
                // Euclidean split keeps deep-bass (negative) semitones in
                // table range.
                let chromatic = absolute_semitone.rem_euclid(12) as usize;
                let octave = absolute_semitone.div_euclid(12);
                WERCKMEISTER_C4_HZ
                    * WERCKMEISTER_RATIOS[chromatic]
                    * 2f64.powi(octave - 4)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_temperament_c4() {
        // C4 = semitone 48 = C0 * 2^4
        let c4 = Temperament::Equal.frequency(48);
        assert!((c4 - 261.6255653).abs() < 1e-6, "got {c4}");
    }

    #[test]
    fn equal_temperament_a4() {
        // A4 = semitone 57 = 440 Hz by construction of the C0 reference
        let a4 = Temperament::Equal.frequency(57);
        assert!((a4 - 440.0).abs() < 1e-9, "got {a4}");
    }

    #[test]
    fn octaves_double() {
        for temperament in [Temperament::Equal, Temperament::Werckmeister3] {
            let low = temperament.frequency(48);
            let high = temperament.frequency(60);
            assert!((high / low - 2.0).abs() < 1e-12, "{temperament:?}");
        }
    }

    #[test]
    fn werckmeister_reference_octave() {
        let c4 = Temperament::Werckmeister3.frequency(48);
        assert!((c4 - 261.626).abs() < 1e-9);
        // The fifth C->G sits at 1.4953488, slightly flat of equal's
        // 2^(7/12) ~ 1.4983.
        let g4 = Temperament::Werckmeister3.frequency(55);
        assert!((g4 / c4 - 1.495_348_8).abs() < 1e-9);
        let fs4 = Temperament::Werckmeister3.frequency(54);
        assert!((fs4 / c4 - 1.406_25).abs() < 1e-9);
    }

    #[test]
    fn werckmeister_negative_semitones_stay_in_range() {
        // Semitone -1 is B of octave -1; must not panic and must sit below C0.
        let b_neg = Temperament::Werckmeister3.frequency(-1);
        assert!(b_neg > 0.0 && b_neg < Temperament::Werckmeister3.frequency(0));
    }
}
