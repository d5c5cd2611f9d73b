//! Numeric protection.
//!
//! Guards that replace a would-be NaN or infinity with a fallback value.

use crate::Vec3;

/// Denominators below this magnitude are treated as zero.
pub const DIVIDE_EPSILON: f32 = 1e-8;

/// `numerator / denominator`, or `fallback` when either side is non-finite,
/// the denominator is near zero, or the quotient overflows.
///
/// ```rust
/// use cph_math::safe_divide;
///
/// assert_eq!(safe_divide(1.0, 4.0, 0.0), 0.25);
/// assert_eq!(safe_divide(1.0, 0.0, -1.0), -1.0);
/// ```
#[inline]
pub fn safe_divide(numerator: f32, denominator: f32, fallback: f32) -> f32 {
    if !numerator.is_finite() || !denominator.is_finite() || denominator.abs() < DIVIDE_EPSILON {
        return fallback;
    }
    fix_invalid(numerator / denominator, fallback)
}

/// Natural log, `fallback` for non-positive or non-finite input.
#[inline]
pub fn safe_log(value: f32, fallback: f32) -> f32 {
    if !value.is_finite() || value <= 0.0 {
        return fallback;
    }
    fix_invalid(value.ln(), fallback)
}

/// `base^exponent`, `fallback` for `0^(<=0)`, negative base with a
/// fractional exponent, or any non-finite operand or result.
///
/// ```rust
/// use cph_math::safe_pow;
///
/// assert_eq!(safe_pow(4.0, 0.5, 0.0), 2.0);
/// assert_eq!(safe_pow(-8.0, 1.0 / 3.0, 0.0), 0.0);
/// assert_eq!(safe_pow(0.0, -1.0, 7.0), 7.0);
/// ```
#[inline]
pub fn safe_pow(base: f32, exponent: f32, fallback: f32) -> f32 {
    if !base.is_finite() || !exponent.is_finite() {
        return fallback;
    }
    if base == 0.0 && exponent <= 0.0 {
        return fallback;
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return fallback;
    }
    fix_invalid(base.powf(exponent), fallback)
}

/// `value` if finite, else `fallback`.
#[inline]
pub fn fix_invalid(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Per-component [`fix_invalid`].
#[inline]
pub fn fix_invalid_vec(v: Vec3, fallback: f32) -> Vec3 {
    v.map(|c| fix_invalid(c, fallback))
}
