//! # cph-primaries
//!
//! Chromaticities of the supported gamuts and the fixed 3x3 matrices that
//! rotate linear light between BT.2020 and each output gamut.
//!
//! The matrices used on the pixel path are `const` tables
//! ([`BT2020_TO_P3D65`], [`BT2020_TO_ACESCG`], ...). They are reproducible
//! from the chromaticities through [`derive_matrix`], which the tests use
//! to cross-check every table.
//!
//! # Usage
//!
//! ```rust
//! use cph_core::ColorSpace;
//! use cph_math::Vec3;
//! use cph_primaries::{from_bt2020, to_bt2020};
//!
//! let p3 = Vec3::new(0.2, 0.4, 0.1);
//! let bt2020 = to_bt2020(ColorSpace::P3D65) * p3;
//! let back = from_bt2020(ColorSpace::P3D65) * bt2020;
//! assert!((back - p3).length() < 1e-5);
//! ```
//!
//! # Dependencies
//!
//! - [`cph-core`] - [`ColorSpace`] tags
//! - [`cph-math`] - matrix operations and Bradford adaptation
//!
//! # Used By
//!
//! - `cph-color` - working-domain conversion

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use cph_core::ColorSpace;
use cph_math::{BRADFORD, Mat3, Vec3, adapt_matrix};

/// RGB primaries and white point as CIE xy chromaticities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red primary.
    pub r: (f32, f32),
    /// Green primary.
    pub g: (f32, f32),
    /// Blue primary.
    pub b: (f32, f32),
    /// White point.
    pub w: (f32, f32),
    /// Display name.
    pub name: &'static str,
}

impl Primaries {
    /// White point as XYZ with Y = 1.
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        xy_to_xyz(self.w)
    }

    /// Primaries of a color space tag. The working domain uses BT.2020.
    pub const fn of(cs: ColorSpace) -> Self {
        match cs {
            ColorSpace::Bt2020Pq => REC2020,
            ColorSpace::P3D65 => DISPLAY_P3,
            ColorSpace::Rec709 => REC709,
            ColorSpace::AcesCg => ACES_AP1,
        }
    }
}

/// D65 white (xy).
pub const D65_XY: (f32, f32) = (0.3127, 0.3290);

/// ACES white (xy).
pub const ACES_WHITE_XY: (f32, f32) = (0.32168, 0.33767);

/// ITU-R BT.2020.
pub const REC2020: Primaries = Primaries {
    r: (0.708, 0.292),
    g: (0.170, 0.797),
    b: (0.131, 0.046),
    w: D65_XY,
    name: "Rec.2020",
};

/// Display P3 (P3 primaries, D65 white).
pub const DISPLAY_P3: Primaries = Primaries {
    r: (0.680, 0.320),
    g: (0.265, 0.690),
    b: (0.150, 0.060),
    w: D65_XY,
    name: "P3-D65",
};

/// ITU-R BT.709.
pub const REC709: Primaries = Primaries {
    r: (0.640, 0.330),
    g: (0.300, 0.600),
    b: (0.150, 0.060),
    w: D65_XY,
    name: "Rec.709",
};

/// ACES AP1 (ACEScg).
pub const ACES_AP1: Primaries = Primaries {
    r: (0.713, 0.293),
    g: (0.165, 0.830),
    b: (0.128, 0.044),
    w: ACES_WHITE_XY,
    name: "ACEScg",
};

// ============================================================================
// Derivation
// ============================================================================

fn xy_to_xyz((x, y): (f32, f32)) -> Vec3 {
    if y.abs() < 1e-10 {
        Vec3::ZERO
    } else {
        Vec3::new(x / y, 1.0, (1.0 - x - y) / y)
    }
}

/// Normalized primary matrix: linear RGB to XYZ, white mapping to Y = 1.
pub fn rgb_to_xyz_matrix(p: &Primaries) -> Mat3 {
    let r = xy_to_xyz(p.r);
    let g = xy_to_xyz(p.g);
    let b = xy_to_xyz(p.b);
    let m = Mat3::from_col_vecs(r, g, b);
    let s = m.inverse().unwrap_or(Mat3::IDENTITY) * p.white_xyz();
    Mat3::from_col_vecs(r * s.x, g * s.y, b * s.z)
}

/// Linear RGB in `src` to linear RGB in `dst`.
///
/// Includes a Bradford adaptation whenever the white points differ.
pub fn derive_matrix(src: &Primaries, dst: &Primaries) -> Mat3 {
    let to_xyz = rgb_to_xyz_matrix(src);
    let from_xyz = rgb_to_xyz_matrix(dst).inverse().unwrap_or(Mat3::IDENTITY);
    if src.w == dst.w {
        from_xyz * to_xyz
    } else {
        from_xyz * adapt_matrix(BRADFORD, src.white_xyz(), dst.white_xyz()) * to_xyz
    }
}

// ============================================================================
// Static gamut-basis tables
// ============================================================================

/// BT.2020 to P3-D65.
pub const BT2020_TO_P3D65: Mat3 = Mat3::from_rows([
    [1.3435782526, -0.2821796705, -0.0613985821],
    [-0.0652974528, 1.0757879158, -0.0104904631],
    [0.0028217873, -0.0195984945, 1.0167767073],
]);

/// P3-D65 to BT.2020.
pub const P3D65_TO_BT2020: Mat3 = Mat3::from_rows([
    [0.7538330344, 0.1985973691, 0.0475695966],
    [0.0457438490, 0.9417772198, 0.0124789312],
    [-0.0012103404, 0.0176017173, 0.9836086231],
]);

/// BT.2020 to Rec.709.
pub const BT2020_TO_REC709: Mat3 = Mat3::from_rows([
    [1.6604910021, -0.5876411388, -0.0728498633],
    [-0.1245504745, 1.1328998971, -0.0083494226],
    [-0.0181507634, -0.1005788980, 1.1187296614],
]);

/// Rec.709 to BT.2020.
pub const REC709_TO_BT2020: Mat3 = Mat3::from_rows([
    [0.6274038959, 0.3292830384, 0.0433130657],
    [0.0690972894, 0.9195403951, 0.0113623156],
    [0.0163914389, 0.0880133079, 0.8955952532],
]);

/// BT.2020 (D65) to ACEScg (ACES white), Bradford adapted.
pub const BT2020_TO_ACESCG: Mat3 = Mat3::from_rows([
    [0.9748949779, 0.0195991086, 0.0055059134],
    [0.0021795628, 0.9955354689, 0.0022849683],
    [0.0047972397, 0.0245320166, 0.9706707437],
]);

/// ACEScg (ACES white) to BT.2020 (D65), Bradford adapted.
pub const ACESCG_TO_BT2020: Mat3 = Mat3::from_rows([
    [1.0258247477, -0.0200531908, -0.0057715568],
    [-0.0022343695, 1.0045865019, -0.0023521324],
    [-0.0050133515, -0.0252900718, 1.0303034233],
]);

/// Linear `cs` to linear BT.2020. Identity for the working domain.
pub const fn to_bt2020(cs: ColorSpace) -> Mat3 {
    match cs {
        ColorSpace::Bt2020Pq => Mat3::IDENTITY,
        ColorSpace::P3D65 => P3D65_TO_BT2020,
        ColorSpace::Rec709 => REC709_TO_BT2020,
        ColorSpace::AcesCg => ACESCG_TO_BT2020,
    }
}

/// Linear BT.2020 to linear `cs`. Identity for the working domain.
pub const fn from_bt2020(cs: ColorSpace) -> Mat3 {
    match cs {
        ColorSpace::Bt2020Pq => Mat3::IDENTITY,
        ColorSpace::P3D65 => BT2020_TO_P3D65,
        ColorSpace::Rec709 => BT2020_TO_REC709,
        ColorSpace::AcesCg => BT2020_TO_ACESCG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUTS: [ColorSpace; 3] = [ColorSpace::P3D65, ColorSpace::Rec709, ColorSpace::AcesCg];

    #[test]
    fn test_tables_match_derivation() {
        for cs in OUTPUTS {
            let fwd = derive_matrix(&REC2020, &Primaries::of(cs));
            let inv = derive_matrix(&Primaries::of(cs), &REC2020);
            assert!(from_bt2020(cs).max_abs_diff(&fwd) < 2e-4, "{cs} forward");
            assert!(to_bt2020(cs).max_abs_diff(&inv) < 2e-4, "{cs} inverse");
        }
    }

    #[test]
    fn test_tables_are_inverse_pairs() {
        for cs in OUTPUTS {
            let id = from_bt2020(cs) * to_bt2020(cs);
            assert!(id.max_abs_diff(&Mat3::IDENTITY) < 1e-4, "{cs}");
        }
    }

    #[test]
    fn test_white_preserved() {
        for cs in [ColorSpace::P3D65, ColorSpace::Rec709] {
            let w = from_bt2020(cs) * Vec3::ONE;
            assert!((w - Vec3::ONE).length() < 1e-4, "{cs}");
        }
        // Adapted white also maps to equal-energy RGB.
        let w = from_bt2020(ColorSpace::AcesCg) * Vec3::ONE;
        assert!((w - Vec3::ONE).length() < 1e-4);
    }

    #[test]
    fn test_npm_luminance_row() {
        let m = rgb_to_xyz_matrix(&REC2020);
        assert!((m.m[1][0] - 0.2627).abs() < 1e-4);
        assert!((m.m[1][1] - 0.6780).abs() < 1e-4);
        assert!((m.m[1][2] - 0.0593).abs() < 1e-4);
    }

    #[test]
    fn test_working_is_identity() {
        assert_eq!(to_bt2020(ColorSpace::Bt2020Pq), Mat3::IDENTITY);
        assert_eq!(from_bt2020(ColorSpace::Bt2020Pq), Mat3::IDENTITY);
    }
}
