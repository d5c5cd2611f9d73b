//! # cph-transfer
//!
//! PQ (SMPTE ST 2084) transfer functions.
//!
//! The working domain stores PQ code values in [0, 1]. Linear values outside
//! the working domain are normalized so that 1.0 is the PQ peak of
//! 10000 cd/m2; [`pq::encode`] and [`pq::decode`] map between the two.
//! [`pq::oetf`] and [`pq::eotf`] use absolute nits.
//!
//! # Usage
//!
//! ```rust
//! use cph_transfer::pq;
//!
//! let code = pq::oetf(100.0);
//! assert!((code - 0.508).abs() < 0.001);
//! assert!((pq::eotf(code) - 100.0).abs() < 0.1);
//! ```
//!
//! # Used By
//!
//! - `cph-color` - working-domain conversion

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod pq;
