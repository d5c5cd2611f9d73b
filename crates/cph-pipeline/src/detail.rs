//! Highlight detail hook.
//!
//! The detail filter itself lives outside this crate. The orchestrator hands
//! it the tone-mapped working frame and a per-pixel highlight mask, and
//! carries on unfiltered if it fails.

use crate::PipelineResult;
use cph_core::Image;

/// Spatial/temporal detail filter applied after tone mapping.
pub trait DetailFilter: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str {
        "detail"
    }

    /// Returns a filtered copy of `frame`.
    ///
    /// `mask` holds one weight in [0, 1] per pixel (see [`highlight_mask`]);
    /// `amount` is the session's `highlight_detail` control. The result must
    /// have the same shape as `frame`.
    fn apply(&self, frame: &Image, mask: &[f32], amount: f32) -> PipelineResult<Image>;
}

/// Highlight weight per pixel: 0 at or below `pivot`, rising linearly in
/// MaxRGB to 1 at full scale.
pub fn highlight_mask(frame: &Image, pivot: f32) -> Vec<f32> {
    let span = 1.0 - pivot;
    frame
        .pixels()
        .map(|px| {
            let lum = px[0].max(px[1]).max(px[2]);
            if lum > pivot && span > 0.0 { ((lum - pivot) / span).clamp(0.0, 1.0) } else { 0.0 }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cph_core::ColorSpace;

    #[test]
    fn test_mask() {
        let img = Image::from_vec(
            4,
            1,
            3,
            vec![0.1, 0.1, 0.1, 0.2, 0.0, 0.0, 0.0, 0.6, 0.0, 1.0, 1.0, 1.0],
            ColorSpace::Bt2020Pq,
        )
        .unwrap();
        let mask = highlight_mask(&img, 0.2);
        assert_eq!(mask.len(), 4);
        assert_eq!(mask[0], 0.0);
        assert_eq!(mask[1], 0.0);
        assert_abs_diff_eq!(mask[2], 0.5, epsilon = 1e-6);
        assert_eq!(mask[3], 1.0);
    }
}
