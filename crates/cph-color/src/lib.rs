//! # cph-color
//!
//! Saturation and gamut engine for the tone-reproduction pipeline.
//!
//! - [`oklab`] - forward/inverse OKLab on linear-basis RGB
//! - [`saturation`] - base and highlight chroma gains in OKLab
//! - [`gamut`] - membership, distance, linear compression, perceptual clamp
//! - [`convert`] - images to and from the BT.2020 PQ working domain
//!
//! All entry points are pure functions over [`Rgb`] values and never return
//! NaN or infinity, so they can run on any number of threads against
//! independent samples.
//!
//! # Usage
//!
//! ```rust
//! use cph_color::{apply_gamut_constraint, apply_saturation, is_in_gamut, Rgb};
//! use cph_core::ColorSpace;
//!
//! let px = Rgb::new(0.9, 0.3, 0.1);
//! let px = apply_saturation(px, 1.2, 0.9, 0.18, px.max_element());
//! let (px, _corrected) = apply_gamut_constraint(px, ColorSpace::Bt2020Pq, false);
//! assert!(is_in_gamut(px, ColorSpace::Bt2020Pq));
//! ```
//!
//! # Dependencies
//!
//! - [`cph-math`] - matrices, smoothstep, numeric guards
//! - [`cph-transfer`] - PQ encode/decode
//! - [`cph-primaries`] - static gamut-basis tables
//!
//! # Used By
//!
//! - `cph-pipeline` - frame orchestrator

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod convert;
pub mod gamut;
pub mod oklab;
pub mod saturation;

pub use convert::{from_working, from_working_rgb, to_working, to_working_rgb};
pub use gamut::{
    apply_gamut_constraint, apply_gamut_slice, clamp_to_gamut, compress_linear, gamut_distance,
    is_in_gamut, perceptual_clamp,
};
pub use oklab::{Oklab, oklab_to_rgb, rgb_to_oklab};
pub use saturation::{SaturationParams, apply_saturation, apply_saturation_slice};

/// RGB triplet; the color space is tracked by the caller.
pub type Rgb = cph_math::Vec3;
