//! # cph-core
//!
//! Core types shared by the tone-reproduction crates.
//!
//! - [`ParameterSet`] - the validated control bundle for one processing session
//! - [`Curve`] / [`ParamField`] - curve family selector and per-field ranges
//! - [`ColorSpace`] - working and output gamut tags with their bounds
//! - [`Image`] - working-domain pixel buffer with invariant checks
//! - [`CoreError`] - error type for buffer and parameter failures
//!
//! ## Crate Structure
//!
//! ```text
//! cph-core (this crate)
//!    ^
//!    +-- cph-tone (curve engine)
//!    +-- cph-color (saturation, gamut, domain conversion)
//!    +-- cph-fallback (error classification, throttling)
//!    +-- cph-pipeline (frame orchestrator)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for [`ParameterSet`] and its enums

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod colorspace;
pub mod error;
pub mod image;
pub mod params;

pub use colorspace::*;
pub use error::*;
pub use image::*;
pub use params::*;
