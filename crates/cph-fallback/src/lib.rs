//! # cph-fallback
//!
//! Error and fallback engine for the tone-reproduction pipeline.
//!
//! Failures are classified by [`ErrorCode`]. Each code selects one of three
//! [`FallbackStrategy`] tiers:
//!
//! | Tier | Codes | Action |
//! |------|-------|--------|
//! | `ParameterCorrection` | `RANGE_PIVOT`, `RANGE_KNEE` | clamp and continue |
//! | `StandardFallback` | `SCHEMA_MISSING`, `DCI_BOUND`, `GAMUT_OOG`, `DET_MISMATCH`, `HL_FLICKER` | simplified standard curve |
//! | `HardFallback` | `NAN_INF` | identity |
//!
//! An [`ErrorHandler`] records every event in a bounded history, keeps the
//! last error and current strategy, throttles log output per code and
//! notifies an optional callback. Handlers are passed explicitly; [`global`]
//! provides a lazily built process-wide default.
//!
//! # Usage
//!
//! ```rust
//! use cph_fallback::{ErrorCode, ErrorContext, ErrorHandler};
//!
//! let handler = ErrorHandler::new();
//! handler.report(
//!     ErrorCode::RangeKnee,
//!     "curve failed slope check",
//!     ErrorContext::new().clip("A001").timecode("01:00:00:00"),
//! );
//! let last = handler.last_error().unwrap();
//! assert!(last.to_string().contains("[A001][01:00:00:00] code=RANGE_KNEE"));
//! ```
//!
//! # Dependencies
//!
//! - [`cph-core`] - parameter ranges for correction
//! - `tracing` - throttled log output
//! - `chrono` - event timestamps
//!
//! # Used By
//!
//! - `cph-pipeline` - instruments every processing stage

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod code;
pub mod event;
pub mod handler;
pub mod throttle;

pub use code::{ErrorCode, FallbackStrategy, Level};
pub use event::{ErrorContext, ErrorEvent};
pub use handler::{DEFAULT_HISTORY_CAPACITY, ErrorCallback, ErrorHandler, global, reset_global};
pub use throttle::{LogThrottle, MAX_LOGS_PER_WINDOW, ThrottleState, WINDOW};
