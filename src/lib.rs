pub mod dsp;
pub mod engine;
pub mod instruments;
pub mod io;
pub mod notation;
pub mod theory;

/// Upper bound on concurrently sounding events. Newly eligible events are
/// silently skipped while the active set is full.
pub const MAX_SIMULTANEOUS_EVENTS: usize = 32;

/// Upper bound on partials per event (additive synthesis width).
pub const MAX_PARTIALS: usize = 8;

/// Upper bound on chord membership; surplus notes are dropped by the parser.
pub const MAX_CHORD_SIZE: usize = 8;

/// Entries in the shared sine lookup table.
pub const SINE_TABLE_SIZE: usize = 1024;

/// Q1.31 level below which a voice counts as silent (~0.05% of full scale).
pub const AUDIBLE_THRESHOLD: i32 = 0x0000_1000;

/// Q1.31 scale corresponding to base volume 1.0. Sits at 1/8 of full scale
/// so up to 16 voices mix into S16 without saturating.
pub const BASE_VOLUME_SCALE: i32 = 0x1000_0000;
