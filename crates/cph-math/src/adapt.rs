//! Chromatic adaptation.
//!
//! ACEScg uses the ACES white (~D60) while the working gamut is D65, so the
//! BT.2020 to ACEScg rotation folds in a von Kries-style adaptation in the
//! Bradford cone space.
//!
//! # Usage
//!
//! ```rust
//! use cph_math::{adapt_matrix, BRADFORD, D60, D65};
//!
//! let m = adapt_matrix(BRADFORD, D65, D60);
//! let w = m * D65;
//! assert!((w.z - D60.z).abs() < 1e-4);
//! ```

use crate::{Mat3, Vec3};

// ============================================================================
// White points (XYZ, Y = 1)
// ============================================================================

/// CIE D65.
pub const D65: Vec3 = Vec3::new(0.95047, 1.0, 1.08883);

/// ACES white point (xy 0.32168, 0.33767).
pub const D60: Vec3 = Vec3::new(0.952_646_1, 1.0, 1.008_825_2);

// ============================================================================
// Cone response matrices
// ============================================================================

/// Bradford cone response matrix (Lam 1985).
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Builds the XYZ adaptation matrix taking `src_white` to `dst_white`.
///
/// `M^-1 * diag(dst_cone / src_cone) * M` with `M = method`. A singular
/// `method` falls back to plain XYZ scaling.
pub fn adapt_matrix(method: Mat3, src_white: Vec3, dst_white: Vec3) -> Mat3 {
    let (method, method_inv) = match method.inverse() {
        Some(inv) => (method, inv),
        None => (Mat3::IDENTITY, Mat3::IDENTITY),
    };
    let src = method * src_white;
    let dst = method * dst_white;
    let scale = Mat3::diagonal(dst.x / src.x, dst.y / src.y, dst.z / src.z);
    method_inv * scale * method
}
