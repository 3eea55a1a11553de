use crate::theory::Letter;

/// A key signature: per-letter accidentals (C..B order, each -1, 0, or +1)
/// plus a tonic chromatic position, which drives key-to-key transposition.
/// All 30 keys live in [`ALL_KEYS`] as process-lifetime constants; a minor
/// key shares both its accidentals and its tonic entry with its relative
/// major, so transposing between relative keys is a no-op.
#[derive(Debug, PartialEq, Eq)]
pub struct KeySignature {
    pub name: &'static str,
    pub accidentals: [i8; 7],
    pub tonic_semitone: i8,
}

impl KeySignature {
    /// Accidental the key applies to a bare letter.
    pub fn accidental_for(&self, letter: Letter) -> i32 {
        self.accidentals[letter.index()] as i32
    }
}

pub const C_MAJOR: KeySignature = KeySignature { name: "C major", accidentals: [0, 0, 0, 0, 0, 0, 0], tonic_semitone: 0 };
pub const G_MAJOR: KeySignature = KeySignature { name: "G major", accidentals: [0, 0, 0, 1, 0, 0, 0], tonic_semitone: 7 }; // F#
pub const D_MAJOR: KeySignature = KeySignature { name: "D major", accidentals: [1, 0, 0, 1, 0, 0, 0], tonic_semitone: 2 }; // F# C#
pub const A_MAJOR: KeySignature = KeySignature { name: "A major", accidentals: [1, 0, 0, 1, 1, 0, 0], tonic_semitone: 9 }; // F# C# G#
pub const E_MAJOR: KeySignature = KeySignature { name: "E major", accidentals: [1, 1, 0, 1, 1, 0, 0], tonic_semitone: 4 }; // F# C# G# D#
pub const B_MAJOR: KeySignature = KeySignature { name: "B major", accidentals: [1, 1, 0, 1, 1, 1, 0], tonic_semitone: 11 }; // F# C# G# D# A#
pub const FS_MAJOR: KeySignature = KeySignature { name: "F# major", accidentals: [1, 1, 1, 1, 1, 1, 0], tonic_semitone: 6 }; // all but B
pub const CS_MAJOR: KeySignature = KeySignature { name: "C# major", accidentals: [1, 1, 1, 1, 1, 1, 1], tonic_semitone: 1 }; // all sharp
pub const F_MAJOR: KeySignature = KeySignature { name: "F major", accidentals: [0, 0, 0, 0, 0, 0, -1], tonic_semitone: 5 }; // Bb
pub const BF_MAJOR: KeySignature = KeySignature { name: "Bb major", accidentals: [0, 0, -1, 0, 0, 0, -1], tonic_semitone: 10 }; // Bb Eb
pub const EF_MAJOR: KeySignature = KeySignature { name: "Eb major", accidentals: [0, 0, -1, 0, 0, -1, -1], tonic_semitone: 3 }; // Bb Eb Ab
pub const AF_MAJOR: KeySignature = KeySignature { name: "Ab major", accidentals: [0, -1, -1, 0, 0, -1, -1], tonic_semitone: 8 }; // Bb Eb Ab Db
pub const DF_MAJOR: KeySignature = KeySignature { name: "Db major", accidentals: [0, -1, -1, 0, -1, -1, -1], tonic_semitone: 1 }; // Bb Eb Ab Db Gb
pub const GF_MAJOR: KeySignature = KeySignature { name: "Gb major", accidentals: [-1, -1, -1, 0, -1, -1, -1], tonic_semitone: 6 }; // all but F
pub const CF_MAJOR: KeySignature = KeySignature { name: "Cb major", accidentals: [-1, -1, -1, -1, -1, -1, -1], tonic_semitone: 11 }; // all flat

pub const A_MINOR: KeySignature = KeySignature { name: "A minor", accidentals: [0, 0, 0, 0, 0, 0, 0], tonic_semitone: 0 };
pub const E_MINOR: KeySignature = KeySignature { name: "E minor", accidentals: [0, 0, 0, 1, 0, 0, 0], tonic_semitone: 7 };
pub const B_MINOR: KeySignature = KeySignature { name: "B minor", accidentals: [1, 0, 0, 1, 0, 0, 0], tonic_semitone: 2 };
pub const FS_MINOR: KeySignature = KeySignature { name: "F# minor", accidentals: [1, 0, 0, 1, 1, 0, 0], tonic_semitone: 9 };
pub const CS_MINOR: KeySignature = KeySignature { name: "C# minor", accidentals: [1, 1, 0, 1, 1, 0, 0], tonic_semitone: 4 };
pub const GS_MINOR: KeySignature = KeySignature { name: "G# minor", accidentals: [1, 1, 0, 1, 1, 1, 0], tonic_semitone: 11 };
pub const DS_MINOR: KeySignature = KeySignature { name: "D# minor", accidentals: [1, 1, 1, 1, 1, 1, 0], tonic_semitone: 6 };
pub const AS_MINOR: KeySignature = KeySignature { name: "A# minor", accidentals: [1, 1, 1, 1, 1, 1, 1], tonic_semitone: 1 };
pub const D_MINOR: KeySignature = KeySignature { name: "D minor", accidentals: [0, 0, 0, 0, 0, 0, -1], tonic_semitone: 5 };
pub const G_MINOR: KeySignature = KeySignature { name: "G minor", accidentals: [0, 0, -1, 0, 0, 0, -1], tonic_semitone: 10 };
pub const C_MINOR: KeySignature = KeySignature { name: "C minor", accidentals: [0, 0, -1, 0, 0, -1, -1], tonic_semitone: 3 };
pub const F_MINOR: KeySignature = KeySignature { name: "F minor", accidentals: [0, -1, -1, 0, 0, -1, -1], tonic_semitone: 8 };
pub const BF_MINOR: KeySignature = KeySignature { name: "Bb minor", accidentals: [0, -1, -1, 0, -1, -1, -1], tonic_semitone: 1 };
pub const EF_MINOR: KeySignature = KeySignature { name: "Eb minor", accidentals: [-1, -1, -1, 0, -1, -1, -1], tonic_semitone: 6 };
pub const AF_MINOR: KeySignature = KeySignature { name: "Ab minor", accidentals: [-1, -1, -1, -1, -1, -1, -1], tonic_semitone: 11 };

/// Every supported key, majors first then relative minors.
pub const ALL_KEYS: [&KeySignature; 30] = [
    &C_MAJOR, &G_MAJOR, &D_MAJOR, &A_MAJOR, &E_MAJOR, &B_MAJOR, &FS_MAJOR, &CS_MAJOR,
    &F_MAJOR, &BF_MAJOR, &EF_MAJOR, &AF_MAJOR, &DF_MAJOR, &GF_MAJOR, &CF_MAJOR,
    &A_MINOR, &E_MINOR, &B_MINOR, &FS_MINOR, &CS_MINOR, &GS_MINOR, &DS_MINOR, &AS_MINOR,
    &D_MINOR, &G_MINOR, &C_MINOR, &F_MINOR, &BF_MINOR, &EF_MINOR, &AF_MINOR,
];

/// Case-insensitive key lookup by display name ("Eb major", "f# minor").
pub fn find_key(name: &str) -> Option<&'static KeySignature> {
    ALL_KEYS
        .iter()
        .copied()
        .find(|key| key.name.eq_ignore_ascii_case(name.trim()))
}

/// Chromatic distance between two key tonics, for transposing a piece
/// written in one key so it sounds in another.
pub fn calculate_key_transposition(from: &KeySignature, to: &KeySignature) -> i32 {
    to.tonic_semitone as i32 - from.tonic_semitone as i32
}
