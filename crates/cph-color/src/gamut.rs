//! Gamut membership and the two-stage gamut constraint.
//!
//! 1. [`compress_linear`]: if any channel exceeds the upper bound, scale all
//!    three so the maximum lands on it, then lift channels below the lower
//!    bound. Preserves channel ratios.
//! 2. [`perceptual_clamp`]: shrink OKLab chroma by 10% per step, at most
//!    [`PERCEPTUAL_MAX_ITERATIONS`] steps, re-testing membership in the target
//!    space after each; per-channel clamp if the budget runs out.
//!
//! [`apply_gamut_constraint`] chains them. The perceptual stage always runs
//! in strict mode and otherwise only when the linear stage left the sample
//! outside the gamut.

use crate::{Rgb, oklab_to_rgb, rgb_to_oklab};
use cph_core::ColorSpace;

/// Iteration cap of the perceptual clamp.
pub const PERCEPTUAL_MAX_ITERATIONS: usize = 10;

/// Chroma retained per perceptual iteration.
pub const CHROMA_STEP: f32 = 0.9;

/// True if every channel is finite and within the bounds of `cs`.
#[inline]
pub fn is_in_gamut(rgb: Rgb, cs: ColorSpace) -> bool {
    let b = cs.bounds();
    rgb.is_finite() && b.contains(rgb.x) && b.contains(rgb.y) && b.contains(rgb.z)
}

/// Euclidean length of the per-channel overshoot and undershoot.
///
/// Zero inside the gamut, infinite for non-finite input.
pub fn gamut_distance(rgb: Rgb, cs: ColorSpace) -> f32 {
    if !rgb.is_finite() {
        return f32::INFINITY;
    }
    let b = cs.bounds();
    rgb.map(|c| (c - b.upper).max(0.0) + (b.lower - c).max(0.0)).length()
}

/// Per-channel clamp into `cs`; non-finite channels become 0 first.
#[inline]
pub fn clamp_to_gamut(rgb: Rgb, cs: ColorSpace) -> Rgb {
    let b = cs.bounds();
    rgb.map(|c| b.clamp(if c.is_finite() { c } else { 0.0 }))
}

/// Linear scale-back into the gamut cube.
///
/// ```rust
/// use cph_color::{compress_linear, Rgb};
/// use cph_core::ColorSpace;
///
/// let out = compress_linear(Rgb::new(2.0, 1.0, -0.2), ColorSpace::Bt2020Pq);
/// assert_eq!(out, Rgb::new(1.0, 0.5, 0.0));
/// ```
pub fn compress_linear(rgb: Rgb, cs: ColorSpace) -> Rgb {
    let b = cs.bounds();
    let mut out = rgb;
    let max = out.max_element();
    if max > b.upper {
        let scale = b.upper / max;
        out = out.map(|c| (c * scale).min(b.upper));
    }
    out.map(|c| c.max(b.lower))
}

/// Iterative chroma reduction in OKLab until the sample fits `cs`.
///
/// Returns the input unchanged when it is already inside the gamut.
pub fn perceptual_clamp(rgb: Rgb, cs: ColorSpace) -> Rgb {
    if is_in_gamut(rgb, cs) {
        return rgb;
    }
    if !rgb.is_finite() {
        return clamp_to_gamut(rgb, cs);
    }

    let mut lab = rgb_to_oklab(rgb);
    for _ in 0..PERCEPTUAL_MAX_ITERATIONS {
        lab = lab.scale_chroma(CHROMA_STEP);
        let candidate = oklab_to_rgb(lab);
        if is_in_gamut(candidate, cs) {
            return candidate;
        }
    }
    clamp_to_gamut(oklab_to_rgb(lab), cs)
}

/// Two-stage gamut constraint.
///
/// Returns the constrained sample and whether the input needed correction
/// (out of gamut or non-finite). The output is always inside `cs`, and a
/// second application returns it unchanged.
///
/// # Example
///
/// ```rust
/// use cph_color::{apply_gamut_constraint, is_in_gamut, Rgb};
/// use cph_core::ColorSpace;
///
/// let (once, fired) = apply_gamut_constraint(Rgb::new(1.4, 0.2, -0.1), ColorSpace::P3D65, true);
/// assert!(fired);
/// assert!(is_in_gamut(once, ColorSpace::P3D65));
///
/// let (twice, fired) = apply_gamut_constraint(once, ColorSpace::P3D65, true);
/// assert!(!fired);
/// assert_eq!(once, twice);
/// ```
pub fn apply_gamut_constraint(rgb: Rgb, cs: ColorSpace, strict: bool) -> (Rgb, bool) {
    if !rgb.is_finite() {
        return (clamp_to_gamut(Rgb::ZERO, cs), true);
    }
    let was_out = !is_in_gamut(rgb, cs);

    let mut out = compress_linear(rgb, cs);
    if strict || !is_in_gamut(out, cs) {
        out = perceptual_clamp(out, cs);
    }
    if !out.is_finite() {
        out = Rgb::ZERO;
    }
    (clamp_to_gamut(out, cs), was_out)
}

/// [`apply_gamut_constraint`] over a slice. Returns how many samples were
/// corrected.
pub fn apply_gamut_slice(pixels: &mut [Rgb], cs: ColorSpace, strict: bool) -> usize {
    let mut corrected = 0;
    for px in pixels.iter_mut() {
        let (out, fired) = apply_gamut_constraint(*px, cs, strict);
        *px = out;
        corrected += usize::from(fired);
    }
    corrected
}
