//! OKLab perceptual space (Ottosson 2020).
//!
//! Forward: basis rotation to LMS, clamp to non-negative, cube root, second
//! rotation to `(L, a, b)`. Inverse mirrors it with a cube instead of the
//! root. Distances in OKLab roughly track perceived difference, which is why
//! chroma scaling and gamut projection happen here.
//!
//! Non-finite input, or a non-finite result, maps to zero.

use crate::Rgb;
use cph_math::{Mat3, Vec3};

/// Linear RGB to LMS cone response.
pub const RGB_TO_LMS: Mat3 = Mat3::from_rows([
    [0.4122214708, 0.5363325363, 0.0514459929],
    [0.2119034982, 0.6806995451, 0.1073969566],
    [0.0883024619, 0.2817188376, 0.6299787005],
]);

/// Non-linear LMS to `(L, a, b)`.
pub const LMS_TO_OKLAB: Mat3 = Mat3::from_rows([
    [0.2104542553, 0.7936177850, -0.0040720468],
    [1.9779984951, -2.4285922050, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.8086757660],
]);

/// `(L, a, b)` to non-linear LMS.
pub const OKLAB_TO_LMS: Mat3 = Mat3::from_rows([
    [1.0, 0.3963377774, 0.2158037573],
    [1.0, -0.1055613458, -0.0638541728],
    [1.0, -0.0894841775, -1.2914855480],
]);

/// LMS to linear RGB.
pub const LMS_TO_RGB: Mat3 = Mat3::from_rows([
    [4.0767416621, -3.3077115913, 0.2309699292],
    [-1.2684380046, 2.6097574011, -0.3413193965],
    [-0.0041960863, -0.7034186147, 1.7076147010],
]);

/// A color in OKLab.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklab {
    /// Perceived lightness.
    pub l: f32,
    /// Green-red opponent axis.
    pub a: f32,
    /// Blue-yellow opponent axis.
    pub b: f32,
}

impl Oklab {
    /// Creates a new value.
    #[inline]
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Chroma, `sqrt(a^2 + b^2)`.
    #[inline]
    pub fn chroma(&self) -> f32 {
        self.a.hypot(self.b)
    }

    /// Scales both chroma axes, leaving lightness alone.
    #[inline]
    pub fn scale_chroma(self, k: f32) -> Self {
        Self::new(self.l, self.a * k, self.b * k)
    }

    fn to_vec(self) -> Vec3 {
        Vec3::new(self.l, self.a, self.b)
    }

    fn from_vec(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Linear-basis RGB to OKLab.
///
/// # Example
///
/// ```rust
/// use cph_color::{rgb_to_oklab, Rgb};
///
/// let white = rgb_to_oklab(Rgb::ONE);
/// assert!((white.l - 1.0).abs() < 1e-3);
/// assert!(white.chroma() < 1e-3);
/// ```
pub fn rgb_to_oklab(rgb: Rgb) -> Oklab {
    if !rgb.is_finite() {
        return Oklab::default();
    }
    let lms = (RGB_TO_LMS * rgb).map(|c| c.max(0.0).cbrt());
    let lab = LMS_TO_OKLAB * lms;
    if lab.is_finite() { Oklab::from_vec(lab) } else { Oklab::default() }
}

/// OKLab to linear-basis RGB.
pub fn oklab_to_rgb(lab: Oklab) -> Rgb {
    let v = lab.to_vec();
    if !v.is_finite() {
        return Rgb::ZERO;
    }
    let lms = (OKLAB_TO_LMS * v).map(|c| c * c * c);
    let rgb = LMS_TO_RGB * lms;
    if rgb.is_finite() { rgb } else { Rgb::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_roundtrip(rgb: Rgb) {
        let back = oklab_to_rgb(rgb_to_oklab(rgb));
        assert_abs_diff_eq!(back.x, rgb.x, epsilon = 1e-3);
        assert_abs_diff_eq!(back.y, rgb.y, epsilon = 1e-3);
        assert_abs_diff_eq!(back.z, rgb.z, epsilon = 1e-3);
    }

    #[test]
    fn test_roundtrip_cube() {
        for r in 0..=8 {
            for g in 0..=8 {
                for b in 0..=8 {
                    assert_roundtrip(Rgb::new(r as f32 / 8.0, g as f32 / 8.0, b as f32 / 8.0));
                }
            }
        }
    }

    #[test]
    fn test_roundtrip_above_one() {
        assert_roundtrip(Rgb::new(1.8, 0.4, 0.05));
        assert_roundtrip(Rgb::new(0.0, 2.0, 1.5));
    }

    #[test]
    fn test_reference_values() {
        // Published OKLab values for linear sRGB primaries.
        let red = rgb_to_oklab(Rgb::X);
        assert_abs_diff_eq!(red.l, 0.6279554, epsilon = 1e-4);
        assert_abs_diff_eq!(red.a, 0.2248631, epsilon = 1e-4);
        assert_abs_diff_eq!(red.b, 0.1258463, epsilon = 1e-4);
    }

    #[test]
    fn test_black_is_origin() {
        let lab = rgb_to_oklab(Rgb::ZERO);
        assert_eq!(lab, Oklab::default());
    }

    #[test]
    fn test_non_finite_guard() {
        assert_eq!(rgb_to_oklab(Rgb::new(f32::NAN, 0.0, 0.0)), Oklab::default());
        assert_eq!(oklab_to_rgb(Oklab::new(f32::INFINITY, 0.0, 0.0)), Rgb::ZERO);
    }

    #[test]
    fn test_scale_chroma_keeps_lightness() {
        let lab = Oklab::new(0.7, 0.1, -0.05).scale_chroma(0.5);
        assert_eq!(lab.l, 0.7);
        assert_abs_diff_eq!(lab.chroma(), 0.5 * 0.1f32.hypot(0.05), epsilon = 1e-7);
    }
}
