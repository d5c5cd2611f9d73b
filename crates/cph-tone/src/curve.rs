//! Tone curve evaluation.
//!
//! A [`ToneCurve`] is built once from a validated [`ParameterSet`] and then
//! evaluated per sample. Evaluation is a pure function of the input, so one
//! curve can be shared by any number of threads.
//!
//! Stages, in order:
//!
//! ```text
//! x -> clamp [0,1] -> family (PPR | RLOG) -> soft knee -> toe -> clamp [0,1]
//! ```

use cph_core::{CoreError, Curve, ParameterSet, Result};
use cph_math::{mix, safe_divide, safe_log, safe_pow, smoothstep};

/// Half-width of the PPR blend band as a fraction of the pivot.
pub const PPR_BLEND_FRACTION: f32 = 0.1;

/// Half-width of the RLOG blend band around the threshold.
pub const RLOG_BLEND_HALF_WIDTH: f32 = 0.05;

// ============================================================================
// Curve families
// ============================================================================

/// Precomputed family parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    /// Pivoted power-rational: power shadows, rational highlights.
    Ppr {
        /// Pivot, fixed point of the curve.
        pivot: f32,
        /// Shadow exponent.
        gamma_s: f32,
        /// Highlight exponent.
        gamma_h: f32,
        /// Shoulder strength.
        shoulder: f32,
        /// Blend band half-width.
        band: f32,
    },
    /// Rational-logarithmic: log shadows, rational highlights scaled to meet
    /// them at the threshold.
    Rlog {
        /// Dark-segment strength.
        a: f32,
        /// Highlight gain.
        b: f32,
        /// Highlight rolloff.
        c: f32,
        /// Blend threshold.
        t: f32,
        /// `ln(1 + a)`.
        log_norm: f32,
        /// Continuity scale applied to the highlight segment.
        k: f32,
    },
}

impl CurveShape {
    fn from_params(p: &ParameterSet) -> Self {
        match p.curve {
            Curve::Ppr => Self::Ppr {
                pivot: p.pivot_pq,
                gamma_s: p.gamma_s,
                gamma_h: p.gamma_h,
                shoulder: p.shoulder_h,
                band: p.pivot_pq * PPR_BLEND_FRACTION,
            },
            Curve::Rlog => {
                let (a, b, c, t) = (p.rlog_a, p.rlog_b, p.rlog_c, p.rlog_t);
                let log_norm = (1.0 + a).ln();
                let dark_t = rlog_dark(t, a, log_norm);
                let hi_t = rlog_highlight(t, b, c);
                let k = safe_divide(dark_t, hi_t, 1.0);
                Self::Rlog { a, b, c, t, log_norm, k }
            }
        }
    }

    /// Raw family output for `x` in [0, 1], before knee and toe.
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        match *self {
            Self::Ppr { pivot, gamma_s, gamma_h, shoulder, band } => {
                let s = ppr_shadow(x, pivot, gamma_s);
                let h = ppr_highlight(x, pivot, gamma_h, shoulder);
                if x <= pivot - band {
                    s
                } else if x >= pivot + band {
                    h
                } else {
                    mix(s, h, smoothstep(pivot - band, pivot + band, x))
                }
            }
            Self::Rlog { a, b, c, t, log_norm, k } => {
                let dark = rlog_dark(x, a, log_norm);
                let hi = rlog_highlight(x, b, c) * k;
                let lo_edge = t - RLOG_BLEND_HALF_WIDTH;
                let hi_edge = t + RLOG_BLEND_HALF_WIDTH;
                if x < lo_edge {
                    dark
                } else if x > hi_edge {
                    hi
                } else {
                    mix(dark, hi, smoothstep(lo_edge, hi_edge, x))
                }
            }
        }
    }

    /// Point where the two segments meet.
    pub fn critical_point(&self) -> f32 {
        match *self {
            Self::Ppr { pivot, .. } => pivot,
            Self::Rlog { t, .. } => t,
        }
    }

    /// Family tag.
    pub fn curve(&self) -> Curve {
        match self {
            Self::Ppr { .. } => Curve::Ppr,
            Self::Rlog { .. } => Curve::Rlog,
        }
    }
}

#[inline]
fn ppr_shadow(x: f32, p: f32, gamma_s: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else if x >= p {
        p
    } else {
        p * safe_pow(x / p, gamma_s, 0.0)
    }
}

#[inline]
fn ppr_highlight(x: f32, p: f32, gamma_h: f32, shoulder: f32) -> f32 {
    if x <= p {
        return p;
    }
    let n = ((x - p) / (1.0 - p)).min(1.0);
    let denom = 1.0 + shoulder * n;
    if denom <= 0.0 {
        return x;
    }
    p + safe_pow(n / denom, gamma_h, 0.0) * (1.0 - p)
}

#[inline]
fn rlog_dark(x: f32, a: f32, log_norm: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else if log_norm <= 0.0 {
        x
    } else {
        safe_log(1.0 + a * x, 0.0) / log_norm
    }
}

#[inline]
fn rlog_highlight(x: f32, b: f32, c: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        b / (1.0 + c)
    } else {
        b * x / (1.0 + c * x)
    }
}

// ============================================================================
// Knee and toe
// ============================================================================

/// Rational compression of the range above `yknee`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftKnee {
    /// Level where compression starts.
    pub yknee: f32,
    /// Compression strength.
    pub alpha: f32,
}

impl SoftKnee {
    /// Compresses `y` above the knee; identity below.
    #[inline]
    pub fn apply(&self, y: f32) -> f32 {
        if y <= self.yknee {
            return y;
        }
        let span = 1.0 - self.yknee;
        if span <= 0.0 {
            return self.yknee;
        }
        let ne = (y - self.yknee) / span;
        self.yknee + ne / (1.0 + self.alpha * ne) * span
    }
}

/// Floor for strictly positive outputs. Zero stays zero.
#[inline]
fn apply_toe(y: f32, toe: f32) -> f32 {
    if toe <= 0.0 || y <= 0.0 { y } else { y.max(toe) }
}

// ============================================================================
// ToneCurve
// ============================================================================

/// Luminance tone curve.
///
/// # Example
///
/// ```rust
/// use cph_core::ParameterSet;
/// use cph_tone::ToneCurve;
///
/// let curve = ToneCurve::new(&ParameterSet::default())?;
/// assert_eq!(curve.map_luminance(0.0), 0.0);
/// assert!((curve.map_luminance(0.18) - 0.18).abs() < 1e-6);
/// assert!(curve.map_luminance(1.0) <= 1.0);
/// # Ok::<(), cph_core::CoreError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    shape: CurveShape,
    knee: SoftKnee,
    toe: f32,
}

impl ToneCurve {
    /// Builds a curve from a parameter set.
    ///
    /// Fails with [`CoreError::InvalidParameter`] naming the first field that
    /// is non-finite or out of range. Correct the set first if that is not
    /// wanted.
    pub fn new(params: &ParameterSet) -> Result<Self> {
        if let Some(v) = params.validate().first() {
            let (min, max) = v.field.range();
            return Err(CoreError::InvalidParameter { field: v.field.name(), value: v.value, min, max });
        }
        Ok(Self {
            shape: CurveShape::from_params(params),
            knee: SoftKnee { yknee: params.yknee, alpha: params.alpha },
            toe: params.toe,
        })
    }

    /// Family parameters.
    #[inline]
    pub fn shape(&self) -> &CurveShape {
        &self.shape
    }

    /// Family tag.
    #[inline]
    pub fn curve(&self) -> Curve {
        self.shape.curve()
    }

    /// Knee settings.
    #[inline]
    pub fn knee(&self) -> SoftKnee {
        self.knee
    }

    /// Toe floor.
    #[inline]
    pub fn toe(&self) -> f32 {
        self.toe
    }

    /// Maps one PQ-domain luminance value.
    ///
    /// Always returns a finite value in [0, 1]. Non-finite input maps to 0.
    #[inline]
    pub fn map_luminance(&self, x: f32) -> f32 {
        if !x.is_finite() {
            return 0.0;
        }
        let y = self.shape.eval(x.clamp(0.0, 1.0));
        let y = apply_toe(self.knee.apply(y), self.toe);
        if y.is_finite() { y.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Maps `input` into `output` element by element.
    ///
    /// Only the common prefix is written when the lengths differ.
    pub fn map_slice(&self, input: &[f32], output: &mut [f32]) {
        for (dst, &src) in output.iter_mut().zip(input) {
            *dst = self.map_luminance(src);
        }
    }

    /// Maps every value in place.
    pub fn map_in_place(&self, values: &mut [f32]) {
        for v in values.iter_mut() {
            *v = self.map_luminance(*v);
        }
    }
}
