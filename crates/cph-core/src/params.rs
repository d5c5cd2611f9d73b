//! Processing parameters.
//!
//! A [`ParameterSet`] is built from defaults, optionally overridden, then
//! validated or corrected once before a session starts. Every scalar field
//! has a closed range exposed through [`ParamField::range`].
//!
//! # Usage
//!
//! ```rust
//! use cph_core::{Curve, ParamField, ParameterSet};
//!
//! let mut params = ParameterSet { curve: Curve::Rlog, rlog_a: 40.0, ..Default::default() };
//! assert!(!params.is_valid());
//!
//! assert!(params.clamp_to_valid_range());
//! assert_eq!(params.rlog_a, ParamField::RlogA.range().1);
//! assert!(params.is_valid());
//! ```

use std::fmt;
use std::str::FromStr;

/// Tone curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Curve {
    /// Pivoted power-rational.
    #[default]
    Ppr,
    /// Rational-logarithmic.
    Rlog,
}

impl Curve {
    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ppr => "ppr",
            Self::Rlog => "rlog",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ppr" => Ok(Self::Ppr),
            "rlog" => Ok(Self::Rlog),
            _ => Err(format!("unknown curve '{}', expected ppr or rlog", s)),
        }
    }
}

/// Scalar fields of a [`ParameterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    /// Pivot in PQ units.
    PivotPq,
    /// PPR shadow gamma.
    GammaS,
    /// PPR highlight gamma.
    GammaH,
    /// PPR shoulder strength.
    ShoulderH,
    /// Black lift.
    BlackLift,
    /// Highlight detail amount.
    HighlightDetail,
    /// Base saturation gain.
    SatBase,
    /// Highlight saturation gain.
    SatHi,
    /// RLOG dark-segment strength.
    RlogA,
    /// RLOG highlight gain.
    RlogB,
    /// RLOG highlight rolloff.
    RlogC,
    /// RLOG blend threshold.
    RlogT,
    /// Soft-knee start.
    Yknee,
    /// Soft-knee strength.
    Alpha,
    /// Toe floor.
    Toe,
}

impl ParamField {
    /// Every field, in validation order.
    pub const ALL: [Self; 15] = [
        Self::PivotPq,
        Self::GammaS,
        Self::GammaH,
        Self::ShoulderH,
        Self::BlackLift,
        Self::HighlightDetail,
        Self::SatBase,
        Self::SatHi,
        Self::RlogA,
        Self::RlogB,
        Self::RlogC,
        Self::RlogT,
        Self::Yknee,
        Self::Alpha,
        Self::Toe,
    ];

    /// Snake-case field name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PivotPq => "pivot_pq",
            Self::GammaS => "gamma_s",
            Self::GammaH => "gamma_h",
            Self::ShoulderH => "shoulder_h",
            Self::BlackLift => "black_lift",
            Self::HighlightDetail => "highlight_detail",
            Self::SatBase => "sat_base",
            Self::SatHi => "sat_hi",
            Self::RlogA => "rlog_a",
            Self::RlogB => "rlog_b",
            Self::RlogC => "rlog_c",
            Self::RlogT => "rlog_t",
            Self::Yknee => "yknee",
            Self::Alpha => "alpha",
            Self::Toe => "toe",
        }
    }

    /// Closed valid range `(min, max)`.
    pub const fn range(self) -> (f32, f32) {
        match self {
            Self::PivotPq => (0.05, 0.30),
            Self::GammaS => (1.0, 1.6),
            Self::GammaH => (0.8, 1.4),
            Self::ShoulderH => (0.5, 3.0),
            Self::BlackLift => (0.0, 0.02),
            Self::HighlightDetail => (0.0, 1.0),
            Self::SatBase | Self::SatHi => (0.0, 2.0),
            Self::RlogA => (1.0, 16.0),
            Self::RlogB => (0.8, 1.2),
            Self::RlogC => (0.5, 3.0),
            Self::RlogT => (0.4, 0.7),
            Self::Yknee => (0.95, 0.99),
            Self::Alpha => (0.2, 1.0),
            Self::Toe => (0.0, 0.01),
        }
    }

    /// Range midpoint, substituted for non-finite values.
    #[inline]
    pub fn midpoint(self) -> f32 {
        let (lo, hi) = self.range();
        (lo + hi) * 0.5
    }

    /// True when the knee/toe stage owns this field.
    ///
    /// Used to pick between range-pivot and range-knee classifications.
    pub const fn is_knee(self) -> bool {
        matches!(self, Self::Yknee | Self::Alpha | Self::Toe)
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One field found outside its range or non-finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamViolation {
    /// Offending field.
    pub field: ParamField,
    /// Offending value.
    pub value: f32,
}

impl ParamViolation {
    /// True if the value was NaN or infinite rather than merely out of range.
    #[inline]
    pub fn is_non_finite(&self) -> bool {
        !self.value.is_finite()
    }
}

/// Tone reproduction controls for one processing session.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParameterSet {
    /// Curve family.
    pub curve: Curve,
    /// Pivot separating shadow and highlight behavior, PQ units.
    pub pivot_pq: f32,
    /// PPR shadow exponent.
    pub gamma_s: f32,
    /// PPR highlight exponent.
    pub gamma_h: f32,
    /// PPR shoulder strength in the highlight denominator.
    pub shoulder_h: f32,
    /// Black lift.
    pub black_lift: f32,
    /// Amount handed to the highlight detail filter; 0 disables it.
    pub highlight_detail: f32,
    /// Global chroma gain.
    pub sat_base: f32,
    /// Chroma gain approached above the pivot.
    pub sat_hi: f32,
    /// RLOG dark-segment strength.
    pub rlog_a: f32,
    /// RLOG highlight gain.
    pub rlog_b: f32,
    /// RLOG highlight rolloff.
    pub rlog_c: f32,
    /// RLOG blend threshold.
    pub rlog_t: f32,
    /// Output level where soft-knee compression starts.
    pub yknee: f32,
    /// Soft-knee strength.
    pub alpha: f32,
    /// Minimum level for strictly positive outputs.
    pub toe: f32,
    /// Strict gamut handling for DCI deliverables.
    pub dci_compliance: bool,
    /// Bit-exact repeatable processing (sequential pixel loops).
    pub deterministic: bool,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            curve: Curve::Ppr,
            pivot_pq: 0.18,
            gamma_s: 1.25,
            gamma_h: 1.10,
            shoulder_h: 1.5,
            black_lift: 0.002,
            highlight_detail: 0.2,
            sat_base: 1.0,
            sat_hi: 0.95,
            rlog_a: 8.0,
            rlog_b: 1.0,
            rlog_c: 1.5,
            rlog_t: 0.55,
            yknee: 0.97,
            alpha: 0.6,
            toe: 0.002,
            dci_compliance: false,
            deterministic: false,
        }
    }
}

impl ParameterSet {
    /// Reads a scalar field.
    pub fn get(&self, field: ParamField) -> f32 {
        match field {
            ParamField::PivotPq => self.pivot_pq,
            ParamField::GammaS => self.gamma_s,
            ParamField::GammaH => self.gamma_h,
            ParamField::ShoulderH => self.shoulder_h,
            ParamField::BlackLift => self.black_lift,
            ParamField::HighlightDetail => self.highlight_detail,
            ParamField::SatBase => self.sat_base,
            ParamField::SatHi => self.sat_hi,
            ParamField::RlogA => self.rlog_a,
            ParamField::RlogB => self.rlog_b,
            ParamField::RlogC => self.rlog_c,
            ParamField::RlogT => self.rlog_t,
            ParamField::Yknee => self.yknee,
            ParamField::Alpha => self.alpha,
            ParamField::Toe => self.toe,
        }
    }

    /// Mutable access to a scalar field.
    pub fn get_mut(&mut self, field: ParamField) -> &mut f32 {
        match field {
            ParamField::PivotPq => &mut self.pivot_pq,
            ParamField::GammaS => &mut self.gamma_s,
            ParamField::GammaH => &mut self.gamma_h,
            ParamField::ShoulderH => &mut self.shoulder_h,
            ParamField::BlackLift => &mut self.black_lift,
            ParamField::HighlightDetail => &mut self.highlight_detail,
            ParamField::SatBase => &mut self.sat_base,
            ParamField::SatHi => &mut self.sat_hi,
            ParamField::RlogA => &mut self.rlog_a,
            ParamField::RlogB => &mut self.rlog_b,
            ParamField::RlogC => &mut self.rlog_c,
            ParamField::RlogT => &mut self.rlog_t,
            ParamField::Yknee => &mut self.yknee,
            ParamField::Alpha => &mut self.alpha,
            ParamField::Toe => &mut self.toe,
        }
    }

    /// Sets a scalar field.
    #[inline]
    pub fn set(&mut self, field: ParamField, value: f32) {
        *self.get_mut(field) = value;
    }

    /// Lists every field that is non-finite or out of range.
    pub fn validate(&self) -> Vec<ParamViolation> {
        ParamField::ALL
            .iter()
            .filter_map(|&field| {
                let value = self.get(field);
                let (lo, hi) = field.range();
                let ok = value.is_finite() && value >= lo && value <= hi;
                (!ok).then_some(ParamViolation { field, value })
            })
            .collect()
    }

    /// True if every field is finite and in range.
    pub fn is_valid(&self) -> bool {
        ParamField::ALL.iter().all(|&field| {
            let value = self.get(field);
            let (lo, hi) = field.range();
            value.is_finite() && value >= lo && value <= hi
        })
    }

    /// Clamps every field into range, replacing non-finite values by the
    /// range midpoint. Returns true if anything changed.
    ///
    /// This is the silent form; `cph-fallback` wraps it with event reporting.
    pub fn clamp_to_valid_range(&mut self) -> bool {
        let mut changed = false;
        for field in ParamField::ALL {
            let value = self.get(field);
            let corrected = correct_value(field, value);
            if corrected.to_bits() != value.to_bits() {
                self.set(field, corrected);
                changed = true;
            }
        }
        changed
    }
}

/// Deterministic correction of one value: midpoint if non-finite, else clamp.
#[inline]
pub fn correct_value(field: ParamField, value: f32) -> f32 {
    if !value.is_finite() {
        return field.midpoint();
    }
    let (lo, hi) = field.range();
    value.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_valid() {
        let p = ParameterSet::default();
        assert!(p.is_valid());
        assert!(p.validate().is_empty());
    }

    #[test]
    fn test_midpoints() {
        assert_relative_eq!(ParamField::PivotPq.midpoint(), 0.175);
        assert_relative_eq!(ParamField::GammaS.midpoint(), 1.3);
        assert_relative_eq!(ParamField::ShoulderH.midpoint(), 1.75);
        assert_relative_eq!(ParamField::RlogA.midpoint(), 8.5);
        assert_relative_eq!(ParamField::Toe.midpoint(), 0.005);
    }

    #[test]
    fn test_validate_lists_offenders() {
        let p = ParameterSet { pivot_pq: f32::NAN, gamma_s: 10.0, ..Default::default() };
        let v = p.validate();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].field, ParamField::PivotPq);
        assert!(v[0].is_non_finite());
        assert_eq!(v[1].field, ParamField::GammaS);
        assert_eq!(v[1].value, 10.0);
    }

    #[test]
    fn test_clamp_to_valid_range() {
        let mut p = ParameterSet {
            pivot_pq: f32::INFINITY,
            gamma_h: 0.1,
            toe: -1.0,
            ..Default::default()
        };
        assert!(p.clamp_to_valid_range());
        assert_relative_eq!(p.pivot_pq, 0.175);
        assert_eq!(p.gamma_h, 0.8);
        assert_eq!(p.toe, 0.0);
        assert!(p.is_valid());
        assert!(!p.clamp_to_valid_range());
    }

    #[test]
    fn test_get_set_cover_all_fields() {
        let mut p = ParameterSet::default();
        for (i, field) in ParamField::ALL.iter().enumerate() {
            p.set(*field, i as f32);
            assert_eq!(p.get(*field), i as f32);
        }
    }

    #[test]
    fn test_curve_parse() {
        assert_eq!("RLOG".parse::<Curve>().unwrap(), Curve::Rlog);
        assert!("aces".parse::<Curve>().is_err());
    }

    #[test]
    fn test_knee_fields() {
        assert!(ParamField::Yknee.is_knee());
        assert!(!ParamField::PivotPq.is_knee());
    }
}
