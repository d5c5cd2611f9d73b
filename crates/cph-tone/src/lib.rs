//! # cph-tone
//!
//! Luminance tone curves for HDR to display-range reproduction.
//!
//! Two families map PQ-domain luminance in [0, 1] to [0, 1]:
//!
//! - **PPR** (pivoted power-rational): power law below the pivot, rational
//!   shoulder above it, smoothstep blend over +/-10% of the pivot
//! - **RLOG** (rational-logarithmic): `ln(1 + a x)` shadows, `b x / (1 + c x)`
//!   highlights scaled to meet at the threshold, smoothstep blend over +/-0.05
//!
//! Both are followed by a rational soft knee above `yknee` and a toe floor
//! for positive outputs. [`ToneCurve::validate`] checks monotonicity and
//! slope continuity numerically.
//!
//! # Usage
//!
//! ```rust
//! use cph_core::{Curve, ParameterSet};
//! use cph_tone::ToneCurve;
//!
//! let params = ParameterSet { curve: Curve::Rlog, ..Default::default() };
//! let curve = ToneCurve::new(&params)?;
//!
//! let mut lum = vec![0.0, 0.25, 0.5, 0.75, 1.0];
//! curve.map_in_place(&mut lum);
//! assert!(lum.windows(2).all(|w| w[0] <= w[1]));
//! assert!(curve.validate().passed());
//! # Ok::<(), cph_core::CoreError>(())
//! ```
//!
//! # Dependencies
//!
//! - [`cph-core`] - [`ParameterSet`](cph_core::ParameterSet) and ranges
//! - [`cph-math`] - `mix` and `smoothstep`
//!
//! # Used By
//!
//! - `cph-pipeline` - MaxRGB tone mapping

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod curve;
pub mod validate;

pub use curve::{CurveShape, PPR_BLEND_FRACTION, RLOG_BLEND_HALF_WIDTH, SoftKnee, ToneCurve};
pub use validate::{
    C1Report, CurveValidation, DEFAULT_C1_EPSILON, DEFAULT_C1_THRESHOLD, DEFAULT_PROBE_POINTS,
    DEFAULT_SAMPLE_COUNT,
};
