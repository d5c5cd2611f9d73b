//! 3x3 matrix type for linear color transforms.
//!
//! Gamut-basis rotations (BT.2020 to P3-D65, OKLab's LMS stages, Bradford
//! adaptation) are all expressed as [`Mat3`].
//!
//! # Convention
//!
//! Row-major storage, column vectors:
//!
//! ```text
//! | m00 m01 m02 |   | r |   | m00*r + m01*g + m02*b |
//! | m10 m11 m12 | * | g | = | m10*r + m11*g + m12*b |
//! | m20 m21 m22 |   | b |   | m20*r + m21*g + m22*b |
//! ```

use crate::Vec3;
use std::ops::{Index, Mul};

/// A 3x3 matrix in row-major order.
///
/// Constructed with [`Mat3::from_rows`] so tables can be declared as `const`.
///
/// # Example
///
/// ```rust
/// use cph_math::{Mat3, Vec3};
///
/// let v = Vec3::new(0.1, 0.2, 0.3);
/// assert_eq!(Mat3::IDENTITY * v, v);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// Rows: `[row0, row1, row2]`.
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// All zeros.
    pub const ZERO: Self = Self { m: [[0.0; 3]; 3] };

    /// Identity.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// Builds a matrix from rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Builds a matrix whose columns are `c0`, `c1`, `c2`.
    #[inline]
    pub fn from_col_vecs(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows([[c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z]])
    }

    /// Diagonal matrix.
    #[inline]
    pub const fn diagonal(d0: f32, d1: f32, d2: f32) -> Self {
        Self::from_rows([[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]])
    }

    /// Row `i` as a vector.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.m[i])
    }

    /// Determinant.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse via the adjugate, `None` when the matrix is singular.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cph_math::Mat3;
    ///
    /// let m = Mat3::diagonal(2.0, 4.0, 8.0);
    /// let inv = m.inverse().unwrap();
    /// assert_eq!(inv, Mat3::diagonal(0.5, 0.25, 0.125));
    /// ```
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-10 {
            return None;
        }
        let m = &self.m;
        let r = 1.0 / det;
        Some(Self::from_rows([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * r,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * r,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * r,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * r,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * r,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * r,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * r,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * r,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * r,
            ],
        ]))
    }

    /// `self * v`.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }

    /// `self * other`.
    #[inline]
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = (0..3).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        out
    }

    /// Largest absolute element-wise difference to `other`.
    ///
    /// Used to compare static tables against derived matrices.
    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }

    /// True if no element is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(rhs)
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl Index<usize> for Mat3 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, i: usize) -> &[f32; 3] {
        &self.m[i]
    }
}
