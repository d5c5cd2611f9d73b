//! Numerical curve checks.
//!
//! - [`ToneCurve::validate_monotonicity`] samples the domain uniformly plus a
//!   dense cluster around the segment junction and checks the outputs never
//!   decrease.
//! - [`ToneCurve::validate_c1`] compares central-difference slopes on both
//!   sides of interior points and fails when the jump exceeds a threshold.
//!
//! Both are run once per session, not per pixel.

use crate::{CurveShape, ToneCurve};
use tracing::debug;

/// Uniform samples used by [`ToneCurve::validate`].
pub const DEFAULT_SAMPLE_COUNT: usize = 4096;

/// Probe points clustered around the junction.
pub const DEFAULT_PROBE_POINTS: usize = 256;

/// Finite-difference step for the slope check.
pub const DEFAULT_C1_EPSILON: f32 = 1e-2;

/// Largest tolerated slope jump.
pub const DEFAULT_C1_THRESHOLD: f32 = 2.0;

/// Interior grid resolution of the slope check.
const C1_GRID: usize = 50;

/// Outcome of the slope check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct C1Report {
    /// Largest slope jump found; infinite when the check could not run.
    pub max_gap: f32,
    /// Location of `max_gap`.
    pub worst_x: f32,
    /// `max_gap <= threshold`.
    pub passed: bool,
}

/// Both checks at their default settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveValidation {
    /// Outputs never decrease.
    pub monotonic: bool,
    /// Slope jumps stay under [`DEFAULT_C1_THRESHOLD`].
    pub c1_continuous: bool,
    /// Largest slope jump.
    pub max_derivative_gap: f32,
}

impl CurveValidation {
    /// Both checks passed.
    #[inline]
    pub fn passed(&self) -> bool {
        self.monotonic && self.c1_continuous
    }
}

impl ToneCurve {
    /// Sorted, deduplicated sample positions in [0, 1].
    ///
    /// `sample_count` uniform points `i / (n - 1)` plus `probe_points` around
    /// the junction: a 0.1 wide window centred on the PPR pivot, 0.2 wide on
    /// the RLOG threshold.
    pub fn sample_points(&self, sample_count: usize, probe_points: usize) -> Vec<f32> {
        let mut points = Vec::with_capacity(sample_count + probe_points);
        if sample_count == 1 {
            points.push(0.0);
        } else if sample_count > 1 {
            let last = (sample_count - 1) as f32;
            points.extend((0..sample_count).map(|i| i as f32 / last));
        }

        if probe_points > 0 {
            let (center, width) = match *self.shape() {
                CurveShape::Ppr { pivot, .. } => (pivot, 0.1),
                CurveShape::Rlog { t, .. } => (t, 0.2),
            };
            let m = probe_points as f32;
            points.extend(
                (0..probe_points).map(|i| (center + (i as f32 / m - 0.5) * width).clamp(0.0, 1.0)),
            );
        }

        points.sort_by(f32::total_cmp);
        points.dedup();
        points
    }

    /// True if the curve never decreases over the sample set.
    pub fn validate_monotonicity(&self, sample_count: usize, probe_points: usize) -> bool {
        let mut prev = -1.0f32;
        for x in self.sample_points(sample_count, probe_points) {
            let y = self.map_luminance(x);
            if y < prev {
                debug!(x, y, prev, "tone curve decreases");
                return false;
            }
            prev = y;
        }
        true
    }

    fn derivative(&self, x: f32, epsilon: f32) -> f32 {
        let lo = (x - epsilon).max(0.0);
        let hi = (x + epsilon).min(1.0);
        let dx = hi - lo;
        if dx <= 0.0 {
            return 0.0;
        }
        (self.map_luminance(hi) - self.map_luminance(lo)) / dx
    }

    /// Slope-jump scan over the interior grid `i / 49`, `i = 1..=48`.
    ///
    /// Points within `epsilon` of either end are skipped. A non-positive or
    /// non-finite `epsilon` yields a failed report with an infinite gap.
    pub fn c1_report(&self, epsilon: f32, threshold: f32) -> C1Report {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return C1Report { max_gap: f32::INFINITY, worst_x: 0.0, passed: false };
        }
        let last = (C1_GRID - 1) as f32;
        let mut max_gap = 0.0f32;
        let mut worst_x = 0.0f32;
        for i in 1..C1_GRID - 1 {
            let x = i as f32 / last;
            if x <= epsilon || x >= 1.0 - epsilon {
                continue;
            }
            let gap = (self.derivative(x + epsilon, epsilon) - self.derivative(x - epsilon, epsilon)).abs();
            if gap > max_gap {
                max_gap = gap;
                worst_x = x;
            }
        }
        let passed = max_gap <= threshold;
        if !passed {
            debug!(max_gap, worst_x, threshold, "tone curve slope jump");
        }
        C1Report { max_gap, worst_x, passed }
    }

    /// True if no slope jump exceeds `threshold`.
    #[inline]
    pub fn validate_c1(&self, epsilon: f32, threshold: f32) -> bool {
        self.c1_report(epsilon, threshold).passed
    }

    /// Runs both checks at their default settings.
    ///
    /// ```rust
    /// use cph_core::ParameterSet;
    /// use cph_tone::ToneCurve;
    ///
    /// let v = ToneCurve::new(&ParameterSet::default())?.validate();
    /// assert!(v.passed());
    /// # Ok::<(), cph_core::CoreError>(())
    /// ```
    pub fn validate(&self) -> CurveValidation {
        let c1 = self.c1_report(DEFAULT_C1_EPSILON, DEFAULT_C1_THRESHOLD);
        CurveValidation {
            monotonic: self.validate_monotonicity(DEFAULT_SAMPLE_COUNT, DEFAULT_PROBE_POINTS),
            c1_continuous: c1.passed,
            max_derivative_gap: c1.max_gap,
        }
    }
}
