/*
Q1.31 Fixed Point
=================

One sign bit, 31 fractional bits. 0x7FFFFFFF is just under +1.0,
0x80000000 is -1.0.

Multiplication widens to 64 bits and shifts back down:

    Q1.31 * Q1.31 = Q2.62  --(>> 31)-->  Q1.31

Conversion to signed 16-bit PCM is a further >> 16; the compiler's volume
scaling keeps mixed sums inside S16 range, so no saturation logic runs on
the hot path.
*/

/// Largest Q1.31 value (just under +1.0).
pub const Q31_ONE: i32 = 0x7FFF_FFFF;

/// Multiply two Q1.31 values through a 64-bit intermediate.
#[inline]
pub fn q31_mul(a: i32, b: i32) -> i32 {
    ((a as i64 * b as i64) >> 31) as i32
}

/// Convert a float in [-1.0, 1.0] to Q1.31, rounding. Values at or above
/// 1.0 clamp to `Q31_ONE`; -1.0 maps to 0x80000000. Setup-time only.
pub fn q31_from_f32(x: f32) -> i32 {
    q31_from_f64(x as f64)
}

/// Convert a double in [-1.0, 1.0] to Q1.31, rounding, clamping at the
/// rails. The scale factor is 2^31, so the -1.0 rail lands exactly on
/// 0x80000000 while +1.0 saturates one LSB below. Setup-time only.
pub fn q31_from_f64(x: f64) -> i32 {
    let scaled = (x * 2_147_483_648.0).round();
    scaled.clamp(i32::MIN as f64, Q31_ONE as f64) as i32
}
