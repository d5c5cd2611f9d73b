//! Chroma gains in OKLab.
//!
//! Two gains act on the `a`/`b` axes only:
//!
//! - `sat_base` scales chroma everywhere
//! - `sat_hi` is blended in above the pivot with weight
//!   `w = smoothstep(pivot, 1, lum_weight)`
//!
//! Lightness is never modified.

use crate::{Rgb, oklab_to_rgb, rgb_to_oklab};
use cph_core::{ParamField, ParameterSet};
use cph_math::{fix_invalid_vec, mix, smoothstep};

/// The three controls consumed by [`apply_saturation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationParams {
    /// Global chroma gain.
    pub sat_base: f32,
    /// Highlight chroma gain.
    pub sat_hi: f32,
    /// Pivot where highlight gain starts to fade in.
    pub pivot: f32,
}

impl SaturationParams {
    /// Picks the saturation controls out of a parameter set.
    pub fn from_params(p: &ParameterSet) -> Self {
        Self { sat_base: p.sat_base, sat_hi: p.sat_hi, pivot: p.pivot_pq }
    }
}

impl Default for SaturationParams {
    fn default() -> Self {
        Self::from_params(&ParameterSet::default())
    }
}

fn clamp_field(field: ParamField, v: f32) -> f32 {
    let (lo, hi) = field.range();
    if v.is_finite() { v.clamp(lo, hi) } else { field.midpoint() }
}

/// Applies base and highlight saturation to one sample.
///
/// Arguments are clamped: gains to [0, 2], pivot to [0.05, 0.3], weight to
/// [0, 1]. Non-finite input returns black.
///
/// # Example
///
/// ```rust
/// use cph_color::{apply_saturation, rgb_to_oklab, Rgb};
///
/// let grey = apply_saturation(Rgb::new(0.8, 0.2, 0.1), 0.0, 1.5, 0.18, 0.0);
/// assert!(rgb_to_oklab(grey).chroma() < 1e-4);
/// ```
pub fn apply_saturation(rgb: Rgb, sat_base: f32, sat_hi: f32, pivot: f32, lum_weight: f32) -> Rgb {
    if !rgb.is_finite() {
        return Rgb::ZERO;
    }
    let sat_base = clamp_field(ParamField::SatBase, sat_base);
    let sat_hi = clamp_field(ParamField::SatHi, sat_hi);
    let pivot = clamp_field(ParamField::PivotPq, pivot);
    let lum = if lum_weight.is_finite() { lum_weight.clamp(0.0, 1.0) } else { 0.0 };

    let mut lab = rgb_to_oklab(rgb).scale_chroma(sat_base);
    let w = smoothstep(pivot, 1.0, lum);
    lab.a = mix(lab.a, lab.a * sat_hi, w);
    lab.b = mix(lab.b, lab.b * sat_hi, w);

    fix_invalid_vec(oklab_to_rgb(lab), 0.0)
}

/// [`apply_saturation`] over a slice, weighting each sample by its MaxRGB.
pub fn apply_saturation_slice(pixels: &mut [Rgb], params: SaturationParams) {
    for px in pixels.iter_mut() {
        let weight = px.max_element();
        *px = apply_saturation(*px, params.sat_base, params.sat_hi, params.pivot, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unity_gains_are_identity() {
        let px = Rgb::new(0.6, 0.35, 0.2);
        let out = apply_saturation(px, 1.0, 1.0, 0.18, 0.9);
        assert_abs_diff_eq!(out.x, px.x, epsilon = 1e-3);
        assert_abs_diff_eq!(out.y, px.y, epsilon = 1e-3);
        assert_abs_diff_eq!(out.z, px.z, epsilon = 1e-3);
    }

    #[test]
    fn test_lightness_untouched() {
        let px = Rgb::new(0.7, 0.2, 0.4);
        let l0 = rgb_to_oklab(px).l;
        for (base, hi, w) in [(0.0, 0.0, 0.0), (2.0, 0.5, 1.0), (0.5, 2.0, 0.6)] {
            let out = apply_saturation(px, base, hi, 0.18, w);
            assert_abs_diff_eq!(rgb_to_oklab(out).l, l0, epsilon = 2e-3);
        }
    }

    #[test]
    fn test_zero_base_desaturates() {
        let out = apply_saturation(Rgb::new(0.9, 0.1, 0.3), 0.0, 2.0, 0.18, 0.0);
        assert!(rgb_to_oklab(out).chroma() < 1e-4);
        assert_abs_diff_eq!(out.x, out.y, epsilon = 1e-3);
        assert_abs_diff_eq!(out.y, out.z, epsilon = 1e-3);
    }

    #[test]
    fn test_highlight_gain_below_pivot_has_no_effect() {
        let px = Rgb::new(0.15, 0.05, 0.02);
        let a = apply_saturation(px, 1.0, 0.0, 0.18, 0.1);
        let b = apply_saturation(px, 1.0, 2.0, 0.18, 0.1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_highlight_gain_dominates_at_top() {
        let px = Rgb::new(0.9, 0.5, 0.3);
        let out = apply_saturation(px, 1.0, 0.0, 0.18, 1.0);
        assert!(rgb_to_oklab(out).chroma() < 1e-4);
    }

    #[test]
    fn test_argument_clamping() {
        let px = Rgb::new(0.5, 0.3, 0.2);
        let wild = apply_saturation(px, 9.0, -3.0, 5.0, 7.0);
        let tame = apply_saturation(px, 2.0, 0.0, 0.3, 1.0);
        assert_eq!(wild, tame);
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(apply_saturation(Rgb::new(f32::NAN, 0.0, 0.0), 1.0, 1.0, 0.18, 0.5), Rgb::ZERO);
        let out = apply_saturation(Rgb::splat(0.5), f32::NAN, 1.0, 0.18, f32::NAN);
        assert!(out.is_finite());
    }

    #[test]
    fn test_slice_matches_scalar() {
        let mut px = vec![Rgb::new(0.2, 0.1, 0.05), Rgb::new(0.95, 0.4, 0.1)];
        let expected: Vec<Rgb> = px
            .iter()
            .map(|p| apply_saturation(*p, 1.3, 0.7, 0.18, p.max_element()))
            .collect();
        apply_saturation_slice(&mut px, SaturationParams { sat_base: 1.3, sat_hi: 0.7, pivot: 0.18 });
        assert_eq!(px, expected);
    }
}
