//! # cph-math
//!
//! Math primitives shared by every stage of the tone-reproduction pipeline.
//!
//! - [`Mat3`] - 3x3 matrices for gamut-basis rotations
//! - [`Vec3`] - RGB / LMS / Lab triplets
//! - Chromatic adaptation ([`adapt_matrix`], [`BRADFORD`])
//! - Interpolation ([`smoothstep`], [`mix`], [`saturate`])
//! - Numeric protection ([`safe_divide`], [`safe_log`], [`safe_pow`], [`fix_invalid`])
//!
//! # Design
//!
//! Matrices are **row-major** and multiply **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Every guard in [`protect`] returns a caller-supplied fallback instead of
//! propagating NaN or infinity, so downstream stages never see non-finite
//! intermediates.
//!
//! # Usage
//!
//! ```rust
//! use cph_math::{Mat3, Vec3, smoothstep, mix};
//!
//! let m = Mat3::diagonal(0.5, 0.5, 0.5);
//! let v = m * Vec3::new(1.0, 0.5, 0.25);
//! assert_eq!(v.x, 0.5);
//!
//! let w = smoothstep(0.18, 1.0, 0.6);
//! let blended = mix(0.2, 0.8, w);
//! assert!(blended > 0.2 && blended < 0.8);
//! ```
//!
//! # Used By
//!
//! - `cph-primaries` - static gamut-basis matrices
//! - `cph-color` - OKLab and gamut engine
//! - `cph-tone` - curve segments and blending

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod interp;
mod mat3;
pub mod protect;
mod vec3;

pub use adapt::*;
pub use interp::*;
pub use mat3::*;
pub use protect::*;
pub use vec3::*;
