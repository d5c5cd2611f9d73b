//! End-to-end frame processing through the orchestrator.

use cph_core::{ColorSpace, Curve, Image, ParameterSet};
use cph_fallback::{ErrorCode, ErrorHandler};
use cph_pipeline::{DetailFilter, PipelineError, PipelineResult, Processor};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

/// Linear ramp with some chroma, 1.0 = 10000 nits.
fn ramp(width: usize, height: usize, channels: usize, cs: ColorSpace) -> Image {
    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        for x in 0..width {
            let t = (y * width + x) as f32 / (width * height) as f32;
            let peak = 0.1 * t * t;
            data.extend_from_slice(&[peak, peak * 0.6, peak * 0.3]);
            if channels == 4 {
                data.push(0.5);
            }
        }
    }
    Image::from_vec(width, height, channels, data, cs).unwrap()
}

fn processor(params: ParameterSet) -> (Processor, Arc<ErrorHandler>) {
    let handler = Arc::new(ErrorHandler::new());
    let p = Processor::new(params, Arc::clone(&handler)).unwrap();
    (p, handler)
}

struct Brighten;

impl DetailFilter for Brighten {
    fn name(&self) -> &str {
        "brighten"
    }

    fn apply(&self, frame: &Image, mask: &[f32], amount: f32) -> PipelineResult<Image> {
        let mut out = frame.clone();
        for (px, m) in out.pixels_mut().zip(mask) {
            for c in &mut px[..3] {
                *c = (*c + 0.05 * amount * m).min(1.0);
            }
        }
        Ok(out)
    }
}

struct Failing;

impl DetailFilter for Failing {
    fn apply(&self, _: &Image, _: &[f32], _: f32) -> PipelineResult<Image> {
        Err(PipelineError::Detail("motion estimate diverged".into()))
    }
}

struct WrongShape;

impl DetailFilter for WrongShape {
    fn apply(&self, frame: &Image, _: &[f32], _: f32) -> PipelineResult<Image> {
        Ok(Image::new(1, 1, 3, frame.color_space)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn output_matches_input_layout() {
    for cs in [ColorSpace::P3D65, ColorSpace::Rec709, ColorSpace::AcesCg, ColorSpace::Bt2020Pq] {
        for curve in [Curve::Ppr, Curve::Rlog] {
            let (mut p, _) = processor(ParameterSet { curve, ..Default::default() });
            let input = ramp(32, 8, 4, cs);
            let out = p.process_frame(&input).unwrap();
            assert_eq!(out.color_space, cs);
            assert_eq!((out.width(), out.height(), out.channels()), (32, 8, 4));
            assert!(out.is_valid());
            let bounds = cs.bounds();
            for px in out.pixels() {
                assert!(px[..3].iter().all(|&c| bounds.contains(c)), "{cs} {px:?}");
                assert_eq!(px[3], 0.5);
            }
        }
    }
}

#[test]
fn black_stays_black() {
    let (mut p, _) = processor(ParameterSet::default());
    let out = p.process_frame(&Image::new(4, 4, 3, ColorSpace::P3D65).unwrap()).unwrap();
    assert!(out.data().iter().all(|&v| v == 0.0));
}

#[test]
fn brightness_order_preserved() {
    let (mut p, _) = processor(ParameterSet::default());
    let grey: Vec<f32> = (0..16).flat_map(|i| [0.005 * i as f32; 3]).collect();
    let input = Image::from_vec(16, 1, 3, grey, ColorSpace::Rec709).unwrap();
    let out = p.process_frame(&input).unwrap();
    let lum: Vec<f32> = out.pixels().map(|px| px[1]).collect();
    assert!(lum.windows(2).all(|w| w[0] <= w[1] + 1e-6), "{lum:?}");
}

#[test]
fn deterministic_matches_parallel() {
    let input = ramp(64, 16, 3, ColorSpace::P3D65);
    let (mut a, _) = processor(ParameterSet { deterministic: true, ..Default::default() });
    let (mut b, _) = processor(ParameterSet::default());
    assert_eq!(a.process_frame(&input).unwrap(), b.process_frame(&input).unwrap());
}

#[test]
fn dci_strict_reports_gamut_correction() {
    let params = ParameterSet { sat_base: 2.0, dci_compliance: true, ..Default::default() };
    let (mut p, handler) = processor(params);
    let input = Image::from_vec(2, 1, 3, vec![0.7, 0.0, 0.0, 0.0, 0.6, 0.0], ColorSpace::Bt2020Pq).unwrap();
    p.process_frame(&input).unwrap();

    assert_eq!(p.stats().gamut_corrected, 2);
    let last = handler.last_error().unwrap();
    assert_eq!(last.code, ErrorCode::GamutOog);
    assert_eq!(last.context.value, Some(2.0));
}

#[test]
fn non_strict_corrects_silently() {
    let params = ParameterSet { sat_base: 2.0, ..Default::default() };
    let (mut p, handler) = processor(params);
    let input = Image::from_vec(1, 1, 3, vec![0.7, 0.0, 0.0], ColorSpace::Bt2020Pq).unwrap();
    let out = p.process_frame(&input).unwrap();
    assert_eq!(p.stats().gamut_corrected, 1);
    assert!(handler.error_history().is_empty());
    assert!(out.data().iter().all(|&c| (0.0..=1.0).contains(&c)));
}

#[test]
fn detail_filter_applied_when_enabled() {
    let input = ramp(16, 16, 3, ColorSpace::Bt2020Pq);
    let base = {
        let (mut p, _) = processor(ParameterSet::default());
        p.process_frame(&input).unwrap()
    };

    let (mut p, handler) = processor(ParameterSet { highlight_detail: 1.0, ..Default::default() });
    p.set_detail_filter(Box::new(Brighten));
    let filtered = p.process_frame(&input).unwrap();
    assert_ne!(base, filtered);
    assert!(handler.error_history().is_empty());

    // highlight_detail = 0 disables the filter.
    let (mut p, _) = processor(ParameterSet { highlight_detail: 0.0, ..Default::default() });
    p.set_detail_filter(Box::new(Brighten));
    let off = p.process_frame(&input).unwrap();
    let (mut q, _) = processor(ParameterSet { highlight_detail: 0.0, ..Default::default() });
    assert_eq!(off, q.process_frame(&input).unwrap());
}

#[test]
fn detail_filter_failure_continues_unfiltered() {
    let input = ramp(16, 4, 3, ColorSpace::P3D65);
    let (mut plain, _) = processor(ParameterSet::default());
    let expected = plain.process_frame(&input).unwrap();

    for filter in [Box::new(Failing) as Box<dyn DetailFilter>, Box::new(WrongShape)] {
        let (mut p, handler) = processor(ParameterSet::default());
        p.set_detail_filter(filter);
        let out = p.process_frame(&input).unwrap();
        assert_eq!(out, expected);
        let last = handler.last_error().unwrap();
        assert_eq!(last.code, ErrorCode::HlFlicker);
        assert_eq!(last.field(), Some("highlight_detail"));
    }
}

#[test]
fn stats_track_frames() {
    let (mut p, _) = processor(ParameterSet::default());
    let input = ramp(32, 32, 3, ColorSpace::Rec709);
    for _ in 0..3 {
        p.process_frame(&input).unwrap();
    }
    let st = p.stats();
    assert_eq!(st.frame_count, 3);
    assert!(st.is_consistent());
    assert!(st.pq.max_pq > st.pq.min_pq);
    assert!(st.pq.variance > 0.0);

    p.reset_stats();
    assert_eq!(p.stats().frame_count, 0);
    p.process_frame(&input).unwrap();
    assert_eq!(p.stats().frame_count, 1);
    assert!(p.stats().monotonic);
}

#[test]
fn invalid_params_corrected_on_init() {
    let handler = Arc::new(ErrorHandler::new());
    let mut p = Processor::with_handler(Arc::clone(&handler));
    let params = ParameterSet { pivot_pq: f32::NAN, gamma_s: 10.0, ..Default::default() };
    assert!(p.initialize(params));
    assert!((p.params().pivot_pq - 0.175).abs() < 1e-6);
    assert_eq!(p.params().gamma_s, 1.6);
    assert_eq!(handler.error_history().len(), 2);

    p.clear_errors();
    assert!(p.error_history().is_empty());
}
