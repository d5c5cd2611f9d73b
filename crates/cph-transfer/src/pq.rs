//! SMPTE ST 2084 Perceptual Quantizer.
//!
//! # Range
//!
//! - Code value: [0, 1]
//! - Absolute: [0, 10000] cd/m2
//! - Normalized linear: [0, 1], 1.0 = 10000 cd/m2
//!
//! Non-finite inputs decode and encode to 0.

use cph_math::Vec3;

/// Peak luminance in cd/m2.
pub const L_MAX: f32 = 10000.0;

const M1: f32 = 2610.0 / 16384.0;
const M2: f32 = 2523.0 / 4096.0 * 128.0;
const C1: f32 = 3424.0 / 4096.0;
const C2: f32 = 2413.0 / 4096.0 * 32.0;
const C3: f32 = 2392.0 / 4096.0 * 32.0;

/// Code value to normalized linear light (1.0 = [`L_MAX`]).
///
/// # Example
///
/// ```rust
/// use cph_transfer::pq::decode;
///
/// assert_eq!(decode(0.0), 0.0);
/// assert!((decode(1.0) - 1.0).abs() < 1e-5);
/// ```
#[inline]
pub fn decode(v: f32) -> f32 {
    if !v.is_finite() || v <= 0.0 {
        return 0.0;
    }
    let vp = v.min(1.0).powf(1.0 / M2);
    let num = (vp - C1).max(0.0);
    let den = C2 - C3 * vp;
    (num / den).powf(1.0 / M1)
}

/// Normalized linear light to code value. Input is clamped to [0, 1].
#[inline]
pub fn encode(l: f32) -> f32 {
    if !l.is_finite() || l <= 0.0 {
        return 0.0;
    }
    let yp = l.min(1.0).powf(M1);
    ((C1 + C2 * yp) / (1.0 + C3 * yp)).powf(M2)
}

/// Code value to absolute luminance in cd/m2.
#[inline]
pub fn eotf(v: f32) -> f32 {
    decode(v) * L_MAX
}

/// Absolute luminance in cd/m2 to code value.
#[inline]
pub fn oetf(nits: f32) -> f32 {
    encode(nits / L_MAX)
}

/// [`decode`] per channel.
#[inline]
pub fn decode_rgb(rgb: Vec3) -> Vec3 {
    rgb.map(decode)
}

/// [`encode`] per channel.
#[inline]
pub fn encode_rgb(rgb: Vec3) -> Vec3 {
    rgb.map(encode)
}
