//! Interpolation and blending.
//!
//! The curve engine blends its segment pairs with [`smoothstep`] weights and
//! [`mix`]; the saturation stage uses the same pair to fade in highlight gain.
//!
//! # Usage
//!
//! ```rust
//! use cph_math::{mix, smoothstep};
//!
//! let w = smoothstep(0.0, 1.0, 0.5);
//! assert_eq!(w, 0.5);
//! assert_eq!(mix(0.0, 10.0, w), 5.0);
//! ```

/// Linear interpolation, `a + (b - a) * t`.
///
/// `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Shader-style name for [`lerp`].
///
/// Returns `x` exactly when `x == y`, for any finite `t`.
///
/// ```rust
/// use cph_math::mix;
///
/// assert_eq!(mix(0.18, 0.18, 0.37), 0.18);
/// ```
#[inline]
pub fn mix(x: f32, y: f32, t: f32) -> f32 {
    lerp(x, y, t)
}

/// Position of `value` between `a` and `b`, 0 when the range is degenerate.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < 1e-10 {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Clamps to `[0, 1]`; non-finite input maps to 0.
///
/// ```rust
/// use cph_math::saturate;
///
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(saturate(f32::NAN), 0.0);
/// ```
#[inline]
pub fn saturate(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Hermite smoothstep.
///
/// 0 for `x <= edge0`, 1 for `x >= edge1`, cubic `t^2 (3 - 2t)` between.
/// The derivative vanishes at both edges, which is what keeps blended curve
/// segments free of slope kinks at the band limits.
///
/// # Example
///
/// ```rust
/// use cph_math::smoothstep;
///
/// assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
/// assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
/// assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
/// ```
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = saturate(inverse_lerp(edge0, edge1, x));
    t * t * (3.0 - 2.0 * t)
}
