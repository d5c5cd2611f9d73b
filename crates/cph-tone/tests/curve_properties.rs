//! Property sweeps over the valid parameter ranges.
//!
//! Every combination on a coarse grid of the curve controls must produce a
//! curve that starts at 0, stays in [0, 1], never decreases and passes the
//! slope check at the default settings.

use cph_core::{Curve, ParameterSet};
use cph_tone::{DEFAULT_C1_EPSILON, DEFAULT_C1_THRESHOLD, ToneCurve};

// ============================================================================
// Grids
// ============================================================================

const KNEES: [f32; 2] = [0.95, 0.99];
const ALPHAS: [f32; 2] = [0.2, 1.0];
const TOES: [f32; 2] = [0.0, 0.01];

fn with_knee_toe(base: ParameterSet) -> Vec<ParameterSet> {
    let mut out = Vec::new();
    for yknee in KNEES {
        for alpha in ALPHAS {
            for toe in TOES {
                out.push(ParameterSet { yknee, alpha, toe, ..base });
            }
        }
    }
    out
}

fn ppr_grid() -> Vec<ParameterSet> {
    let mut out = Vec::new();
    for pivot_pq in [0.05, 0.12, 0.18, 0.3] {
        for gamma_s in [1.0, 1.3, 1.6] {
            for gamma_h in [0.8, 1.1, 1.4] {
                for shoulder_h in [0.5, 1.5, 3.0] {
                    let base = ParameterSet {
                        curve: Curve::Ppr,
                        pivot_pq,
                        gamma_s,
                        gamma_h,
                        shoulder_h,
                        ..Default::default()
                    };
                    out.extend(with_knee_toe(base));
                }
            }
        }
    }
    out
}

fn rlog_grid() -> Vec<ParameterSet> {
    let mut out = Vec::new();
    for rlog_a in [1.0, 4.0, 8.0, 16.0] {
        for rlog_b in [0.8, 1.2] {
            for rlog_c in [0.5, 1.5, 3.0] {
                for rlog_t in [0.4, 0.55, 0.7] {
                    let base =
                        ParameterSet { curve: Curve::Rlog, rlog_a, rlog_b, rlog_c, rlog_t, ..Default::default() };
                    out.extend(with_knee_toe(base));
                }
            }
        }
    }
    out
}

fn all_curves() -> impl Iterator<Item = (ParameterSet, ToneCurve)> {
    ppr_grid().into_iter().chain(rlog_grid()).map(|p| {
        let c = ToneCurve::new(&p).expect("grid values are in range");
        (p, c)
    })
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn zero_maps_to_zero_exactly() {
    for (p, c) in all_curves() {
        assert_eq!(c.map_luminance(0.0), 0.0, "{p:?}");
    }
}

#[test]
fn output_within_unit_range() {
    for (p, c) in all_curves() {
        for i in 0..=256 {
            let y = c.map_luminance(i as f32 / 256.0);
            assert!((0.0..=1.0).contains(&y), "{p:?} x={i}/256 y={y}");
        }
    }
}

#[test]
fn monotonic_across_valid_ranges() {
    for (p, c) in all_curves() {
        assert!(c.validate_monotonicity(1024, 128), "{p:?}");
    }
}

#[test]
fn monotonic_with_default_sampling() {
    for family in [Curve::Ppr, Curve::Rlog] {
        let c = ToneCurve::new(&ParameterSet { curve: family, ..Default::default() }).unwrap();
        assert!(c.validate().monotonic);
    }
}

#[test]
fn slope_continuity_across_valid_ranges() {
    for (p, c) in all_curves() {
        let r = c.c1_report(DEFAULT_C1_EPSILON, DEFAULT_C1_THRESHOLD);
        assert!(r.passed, "{p:?} gap {} at {}", r.max_gap, r.worst_x);
    }
}

#[test]
fn ppr_pivot_is_fixed_point() {
    for p in ppr_grid() {
        let c = ToneCurve::new(&p).unwrap();
        let y = c.map_luminance(p.pivot_pq);
        assert!((y - p.pivot_pq).abs() < 1e-5, "{p:?} -> {y}");
    }
}

#[test]
fn non_finite_inputs_map_to_zero() {
    for (_, c) in all_curves().step_by(37) {
        assert_eq!(c.map_luminance(f32::NAN), 0.0);
        assert_eq!(c.map_luminance(f32::INFINITY), 0.0);
    }
}

#[test]
fn out_of_domain_inputs_clamp() {
    for (_, c) in all_curves().step_by(11) {
        assert_eq!(c.map_luminance(-0.5), 0.0);
        assert_eq!(c.map_luminance(3.0), c.map_luminance(1.0));
    }
}
