//! Music theory: pitch naming, key signatures, temperaments, and the
//! mapping from written notes to absolute semitones and frequencies.
//!
//! Absolute semitones count up from C0; middle C (C4) is 48. A written
//! note with no octave marks lands in octave 4, each `'` raises an octave
//! and each `,` lowers one.

pub mod key;
pub mod temperament;

pub use key::{KeySignature, C_MAJOR};
pub use temperament::Temperament;

use crate::notation::Note;

/// Absolute semitone of middle C (octave 4, letter C).
pub const MIDDLE_C_SEMITONE: i32 = 48;

/// The seven pitch letters, in key-signature order (C first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Semitone offset within an octave: C=0, D=2, E=4, F=5, G=7, A=9, B=11.
    pub fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Index into a key signature's accidental table (C..B order).
    pub fn index(self) -> usize {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Letter::C),
            'd' => Some(Letter::D),
            'e' => Some(Letter::E),
            'f' => Some(Letter::F),
            'g' => Some(Letter::G),
            'a' => Some(Letter::A),
            'b' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'c',
            Letter::D => 'd',
            Letter::E => 'e',
            Letter::F => 'f',
            Letter::G => 'g',
            Letter::A => 'a',
            Letter::B => 'b',
        }
    }
}

/// Absolute semitone for a written note under a key signature and chromatic
/// transposition. Rests have no pitch and return -1.
pub fn note_to_absolute_semitone(note: &Note, key: &KeySignature, transposition: i32) -> i32 {
    let Some(letter) = note.letter else {
        return -1;
    };

    let key_accidental = key.accidental_for(letter);
    (note.octave_shift + 4) * 12 + letter.semitone() + key_accidental + note.accidental
        + transposition
}

/// Frequency in Hz for a written note, or 0.0 for rests and notes pushed
/// below the bottom of the pitch range.
pub fn note_to_frequency(
    note: &Note,
    temperament: Temperament,
    key: &KeySignature,
    transposition: i32,
) -> f64 {
    let semitone = note_to_absolute_semitone(note, key, transposition);
    if semitone < 0 {
        return 0.0;
    }
    temperament.frequency(semitone)
}
