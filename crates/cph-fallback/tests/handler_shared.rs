//! Handler behavior under sharing: threads and the process-wide default.

use cph_core::ParameterSet;
use cph_fallback::{ErrorCode, ErrorHandler, FallbackStrategy, global, reset_global};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[test]
fn concurrent_reports_are_all_recorded() {
    let handler = Arc::new(ErrorHandler::new());
    let seen = Arc::new(AtomicUsize::new(0));
    {
        let seen = Arc::clone(&seen);
        handler.set_callback(move |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
    }

    let workers: Vec<_> = (0..8)
        .map(|t| {
            let h = Arc::clone(&handler);
            thread::spawn(move || {
                for i in 0..25 {
                    h.handle_error(ErrorCode::GamutOog, format!("worker {t} frame {i}"));
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(handler.error_history().len(), 200);
    assert_eq!(seen.load(Ordering::Relaxed), 200);
    assert_eq!(handler.current_strategy(), FallbackStrategy::StandardFallback);

    let s = handler.throttle_state(ErrorCode::GamutOog).unwrap();
    assert!(s.count <= 10, "{s:?}");
    assert!(s.suppressed > 0, "{s:?}");
}

#[test]
fn mixed_codes_track_latest_strategy() {
    let h = ErrorHandler::new();
    h.handle_error(ErrorCode::RangePivot, "clamped");
    assert_eq!(h.current_strategy(), FallbackStrategy::ParameterCorrection);
    h.handle_error(ErrorCode::NanInf, "nan");
    assert_eq!(h.current_strategy(), FallbackStrategy::HardFallback);
    h.handle_error(ErrorCode::DetMismatch, "rerun differs");
    assert_eq!(h.current_strategy(), FallbackStrategy::StandardFallback);
}

#[test]
fn every_invalid_field_is_corrected() {
    let h = ErrorHandler::new();
    let mut p = ParameterSet {
        pivot_pq: 1.0,
        gamma_s: f32::NEG_INFINITY,
        gamma_h: 0.0,
        shoulder_h: 9.0,
        black_lift: -1.0,
        highlight_detail: 4.0,
        sat_base: f32::NAN,
        sat_hi: -2.0,
        rlog_a: 100.0,
        rlog_b: 0.0,
        rlog_c: 0.0,
        rlog_t: 1.0,
        yknee: 1.0,
        alpha: 0.0,
        toe: 0.5,
        ..Default::default()
    };
    assert!(h.validate_and_correct_params(&mut p));
    assert!(p.is_valid());
    assert_eq!(h.error_history().len(), 15);
    assert_eq!(h.error_history().iter().filter(|e| e.code == ErrorCode::NanInf).count(), 2);
    assert_eq!(h.error_history().iter().filter(|e| e.code == ErrorCode::RangeKnee).count(), 3);
    assert!(!h.validate_and_correct_params(&mut p));
}

#[test]
fn global_handler_is_shared() {
    let a = global();
    let b = global();
    assert!(Arc::ptr_eq(&a, &b));

    a.handle_error(ErrorCode::SchemaMissing, "global test");
    assert!(b.error_history().iter().any(|e| e.message == "global test"));

    reset_global();
    assert!(global().last_error().is_none());
}
