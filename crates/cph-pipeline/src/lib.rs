//! # cph-pipeline
//!
//! Frame orchestrator tying the tone, color and fallback engines together.
//!
//! A [`Processor`] owns one session: corrected parameters, the tone curve,
//! running [`FrameStats`] and a shared
//! [`ErrorHandler`](cph_fallback::ErrorHandler). Each frame goes to the BT.2020
//! PQ working domain, through MaxRGB tone mapping, an optional
//! [`DetailFilter`], OKLab saturation and the gamut constraint, and back to
//! the input's color space.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use cph_core::{ColorSpace, Curve, Image, ParameterSet};
//! use cph_fallback::ErrorHandler;
//! use cph_pipeline::Processor;
//!
//! let handler = Arc::new(ErrorHandler::new());
//! let params = ParameterSet { curve: Curve::Rlog, dci_compliance: true, ..Default::default() };
//! let mut proc = Processor::new(params, Arc::clone(&handler))?;
//!
//! let frame = Image::new(16, 9, 3, ColorSpace::Rec709)?;
//! let out = proc.process_frame(&frame)?;
//! assert_eq!((out.width(), out.height()), (16, 9));
//! assert!(handler.error_history().is_empty());
//! # Ok::<(), cph_pipeline::PipelineError>(())
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - row-parallel pixel loops via rayon; disabled per
//!   session by `ParameterSet::deterministic`
//!
//! # Dependencies
//!
//! - [`cph-tone`] - tone curve
//! - [`cph-color`] - domain conversion, saturation, gamut
//! - [`cph-fallback`] - error classification
//!
//! # Used By
//!
//! - `cph-cli` - command line front end
//! - `cph-bench` - frame benchmarks

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod detail;
pub mod processor;
pub mod stages;
pub mod stats;

pub use detail::{DetailFilter, highlight_mask};
pub use error::{PipelineError, PipelineResult};
pub use processor::Processor;
pub use stats::{FrameStats, PqStats};
