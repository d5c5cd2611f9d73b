//! Frame statistics.
//!
//! Luminance statistics use MaxRGB of the working-domain result with the
//! darkest and brightest 1% of pixels discarded.

use cph_core::Image;

/// Trimmed MaxRGB statistics of one frame, PQ units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PqStats {
    /// Trimmed minimum.
    pub min_pq: f32,
    /// Trimmed mean.
    pub avg_pq: f32,
    /// Trimmed maximum.
    pub max_pq: f32,
    /// Population variance of the trimmed set.
    pub variance: f32,
}

impl Default for PqStats {
    fn default() -> Self {
        Self { min_pq: 0.0, avg_pq: 0.0, max_pq: 1.0, variance: 0.0 }
    }
}

impl PqStats {
    /// Statistics of `values` after discarding `len / 100` from each end.
    ///
    /// Non-finite values are ignored. `None` if nothing remains.
    ///
    /// ```rust
    /// use cph_pipeline::PqStats;
    ///
    /// let mut v: Vec<f32> = (0..200).map(|i| i as f32 / 199.0).collect();
    /// v[0] = -5.0;
    /// v[199] = 9.0;
    /// let s = PqStats::trimmed(&mut v).unwrap();
    /// assert!(s.min_pq > 0.0 && s.max_pq < 1.0);
    /// ```
    pub fn trimmed(values: &mut Vec<f32>) -> Option<Self> {
        values.retain(|v| v.is_finite());
        values.sort_by(f32::total_cmp);
        let trim = values.len() / 100;
        let kept = values.get(trim..values.len() - trim)?;
        if kept.is_empty() {
            return None;
        }
        let n = kept.len() as f64;
        let mean = kept.iter().map(|&v| v as f64).sum::<f64>() / n;
        let variance = kept.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            min_pq: kept[0],
            avg_pq: mean as f32,
            max_pq: kept[kept.len() - 1],
            variance: variance as f32,
        })
    }

    /// Statistics of the MaxRGB of every pixel of `frame`.
    pub fn of_frame(frame: &Image) -> Option<Self> {
        let mut values: Vec<f32> = frame.pixels().map(|px| px[0].max(px[1]).max(px[2])).collect();
        Self::trimmed(&mut values)
    }
}

/// Running statistics of a processing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Statistics of the most recent frame.
    pub pq: PqStats,
    /// Frames processed since the last reset.
    pub frame_count: u64,
    /// Pixels corrected by the gamut stage in the most recent frame.
    pub gamut_corrected: usize,
    /// Curve passed the monotonicity check.
    pub monotonic: bool,
    /// Curve passed the slope check.
    pub c1_continuous: bool,
    /// Largest slope jump measured.
    pub max_derivative_gap: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            pq: PqStats::default(),
            frame_count: 0,
            gamut_corrected: 0,
            monotonic: true,
            c1_continuous: true,
            max_derivative_gap: 0.0,
        }
    }
}

impl FrameStats {
    /// Folds in one processed working-domain frame.
    pub fn record_frame(&mut self, frame: &Image, gamut_corrected: usize) {
        if let Some(pq) = PqStats::of_frame(frame) {
            self.pq = pq;
        }
        self.gamut_corrected = gamut_corrected;
        self.frame_count += 1;
    }

    /// Ranges and ordering hold: values finite and in [0, 1],
    /// `min <= avg <= max`, variance and gap non-negative.
    pub fn is_consistent(&self) -> bool {
        let PqStats { min_pq, avg_pq, max_pq, variance } = self.pq;
        let unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        unit(min_pq)
            && unit(avg_pq)
            && unit(max_pq)
            && min_pq <= avg_pq
            && avg_pq <= max_pq
            && variance.is_finite()
            && variance >= 0.0
            && self.max_derivative_gap.is_finite()
            && self.max_derivative_gap >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cph_core::ColorSpace;

    #[test]
    fn test_trim_count() {
        // 300 values: 3 dropped from each end.
        let mut v: Vec<f32> = (0..300).map(|i| i as f32).collect();
        let s = PqStats::trimmed(&mut v).unwrap();
        assert_eq!(s.min_pq, 3.0);
        assert_eq!(s.max_pq, 296.0);
        assert_abs_diff_eq!(s.avg_pq, 149.5, epsilon = 1e-4);
    }

    #[test]
    fn test_small_sets_untrimmed() {
        let mut v = vec![0.4, 0.2, f32::NAN, 0.6];
        let s = PqStats::trimmed(&mut v).unwrap();
        assert_eq!(s.min_pq, 0.2);
        assert_eq!(s.max_pq, 0.6);
        assert_abs_diff_eq!(s.avg_pq, 0.4, epsilon = 1e-6);
        assert_abs_diff_eq!(s.variance, 0.08 / 3.0, epsilon = 1e-6);
        assert!(PqStats::trimmed(&mut Vec::new()).is_none());
    }

    #[test]
    fn test_record_frame() {
        let img = Image::from_vec(2, 1, 3, vec![0.2, 0.5, 0.1, 0.3, 0.3, 0.3], ColorSpace::Bt2020Pq).unwrap();
        let mut st = FrameStats::default();
        assert!(st.is_consistent());
        st.record_frame(&img, 7);
        assert_eq!(st.frame_count, 1);
        assert_eq!(st.gamut_corrected, 7);
        assert_eq!(st.pq.min_pq, 0.3);
        assert_eq!(st.pq.max_pq, 0.5);
        assert!(st.is_consistent());
    }

    #[test]
    fn test_inconsistent() {
        let st = FrameStats {
            pq: PqStats { min_pq: 0.6, avg_pq: 0.5, max_pq: 0.9, variance: 0.0 },
            ..Default::default()
        };
        assert!(!st.is_consistent());
    }
}
