use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::instruments::{self, Instrument};
use crate::theory::Letter;

/// Tuplet grouping applied to a note's written duration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tuplet {
    #[default]
    None,
    /// 3 in the time of 2 (`t`).
    Triplet,
    /// 5 in the time of 4 (`q`).
    Quintuplet,
    /// 6 in the time of 4 (`x`).
    Sextuplet,
    /// 7 in the time of 4 (`s`).
    Septuplet,
    /// 9 in the time of 8 (`n`). Timing currently unscaled.
    Nonuplet,
}

impl Tuplet {
    /// Numeric code: how many notes the group squeezes in.
    pub fn code(self) -> u8 {
        match self {
            Tuplet::None => 0,
            Tuplet::Triplet => 3,
            Tuplet::Quintuplet => 5,
            Tuplet::Sextuplet => 6,
            Tuplet::Septuplet => 7,
            Tuplet::Nonuplet => 9,
        }
    }

    /// Factor applied to the written duration.
    pub fn ratio(self) -> f32 {
        match self {
            Tuplet::None => 1.0,
            Tuplet::Triplet => 2.0 / 3.0,
            Tuplet::Quintuplet => 4.0 / 5.0,
            Tuplet::Sextuplet => 4.0 / 6.0,
            Tuplet::Septuplet => 4.0 / 7.0,
            // No reference timing exists for nonuplets; play them straight.
            Tuplet::Nonuplet => 1.0,
        }
    }

    pub fn marker(self) -> Option<char> {
        match self {
            Tuplet::None => None,
            Tuplet::Triplet => Some('t'),
            Tuplet::Quintuplet => Some('q'),
            Tuplet::Sextuplet => Some('x'),
            Tuplet::Septuplet => Some('s'),
            Tuplet::Nonuplet => Some('n'),
        }
    }

    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            't' => Some(Tuplet::Triplet),
            'q' => Some(Tuplet::Quintuplet),
            'x' => Some(Tuplet::Sextuplet),
            's' => Some(Tuplet::Septuplet),
            'n' => Some(Tuplet::Nonuplet),
            _ => None,
        }
    }
}

/// One parsed note (or rest): pitch spelling, written duration, and the
/// instrument in effect where it appeared.
///
/// `chord_id` is 0 for a standalone note; members of one chord share a
/// positive id assigned by the parser. The id is internal bookkeeping for
/// the compiler and is not part of the printed form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Pitch letter, or `None` for a rest.
    pub letter: Option<Letter>,
    /// Explicit sharps (+1 each) and flats (-1 each), accumulated.
    pub accidental: i32,
    /// Octave marks: each `'` +1, each `,` -1.
    pub octave_shift: i32,
    /// Duration denominator: 4 = quarter, 8 = eighth, ...
    pub value: u32,
    pub dotted: bool,
    pub tuplet: Tuplet,
    pub chord_id: u32,
    pub instrument: &'static Instrument,
}

impl Note {
    /// A pitched quarter note with no accidentals, default instrument.
    pub fn pitched(letter: Letter) -> Self {
        Self {
            letter: Some(letter),
            accidental: 0,
            octave_shift: 0,
            value: 4,
            dotted: false,
            tuplet: Tuplet::None,
            chord_id: 0,
            instrument: instruments::default_instrument(),
        }
    }

    /// A quarter rest.
    pub fn rest() -> Self {
        Self {
            letter: None,
            ..Self::pitched(Letter::C)
        }
    }

    pub fn is_rest(&self) -> bool {
        self.letter.is_none()
    }

    pub fn is_chord_member(&self) -> bool {
        self.chord_id > 0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.letter {
            None => write!(f, "r{}", self.value)?,
            Some(letter) => {
                write!(f, "{}", letter.as_char())?;
                for _ in 0..self.accidental {
                    write!(f, "s")?;
                }
                for _ in 0..-self.accidental {
                    write!(f, "f")?;
                }
                for _ in 0..self.octave_shift {
                    write!(f, "'")?;
                }
                for _ in 0..-self.octave_shift {
                    write!(f, ",")?;
                }
                write!(f, "{}", self.value)?;
            }
        }
        if self.dotted {
            write!(f, ".")?;
        }
        if let Some(marker) = self.tuplet.marker() {
            write!(f, "{marker}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_spells_out_modifiers() {
        let mut note = Note::pitched(Letter::C);
        note.accidental = 2;
        note.octave_shift = 1;
        note.value = 8;
        note.dotted = true;
        note.tuplet = Tuplet::Triplet;
        assert_eq!(note.to_string(), "css'8.t");

        let mut flat = Note::pitched(Letter::B);
        flat.accidental = -1;
        flat.octave_shift = -2;
        assert_eq!(flat.to_string(), "bf,,4");
    }

    #[test]
    fn display_rest() {
        let mut rest = Note::rest();
        rest.value = 2;
        assert_eq!(rest.to_string(), "r2");
        rest.dotted = true;
        assert_eq!(rest.to_string(), "r2.");
    }

    #[test]
    fn tuplet_codes_and_ratios() {
        assert_eq!(Tuplet::None.ratio(), 1.0);
        assert_eq!(Tuplet::Triplet.ratio(), 2.0 / 3.0);
        assert_eq!(Tuplet::Septuplet.code(), 7);
        assert_eq!(Tuplet::Nonuplet.ratio(), 1.0);
        for marker in ['t', 'q', 'x', 's', 'n'] {
            let tuplet = Tuplet::from_marker(marker).unwrap();
            assert_eq!(tuplet.marker(), Some(marker));
        }
    }
}
