//! The error handler.
//!
//! One [`ErrorHandler`] is shared by everything that processes a session. It
//! owns the history, the last-error and current-strategy slots and the log
//! throttle behind a single mutex. Reporting is rare compared with per-pixel
//! work, so one coarse lock is enough.
//!
//! # Example
//!
//! ```rust
//! use cph_core::ParameterSet;
//! use cph_fallback::{ErrorCode, ErrorHandler, FallbackStrategy};
//!
//! let handler = ErrorHandler::new();
//!
//! let mut params = ParameterSet { pivot_pq: f32::NAN, gamma_s: 10.0, ..Default::default() };
//! assert!(handler.validate_and_correct_params(&mut params));
//! assert!(params.is_valid());
//!
//! let strategy = handler.handle_error(ErrorCode::GamutOog, "12 pixels out of gamut");
//! assert_eq!(strategy, FallbackStrategy::StandardFallback);
//! assert_eq!(handler.error_history().len(), 3);
//! ```

use crate::{ErrorCode, ErrorContext, ErrorEvent, FallbackStrategy, Level, LogThrottle, ThrottleState};
use cph_core::{ParamField, ParameterSet, correct_value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{error, info, warn};

/// Events kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// Observer invoked synchronously for every event.
pub type ErrorCallback = Arc<dyn Fn(&ErrorEvent) + Send + Sync>;

struct HandlerState {
    last_error: Option<ErrorEvent>,
    strategy: FallbackStrategy,
    history: VecDeque<ErrorEvent>,
    throttle: LogThrottle,
    callback: Option<ErrorCallback>,
}

/// Classifies failures, records them and selects a fallback.
pub struct ErrorHandler {
    state: Mutex<HandlerState>,
    capacity: usize,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.lock();
        f.debug_struct("ErrorHandler")
            .field("strategy", &st.strategy)
            .field("history", &st.history.len())
            .field("capacity", &self.capacity)
            .field("callback", &st.callback.is_some())
            .finish()
    }
}

impl ErrorHandler {
    /// Handler with [`DEFAULT_HISTORY_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Handler keeping at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(HandlerState {
                last_error: None,
                strategy: FallbackStrategy::default(),
                history: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
                throttle: LogThrottle::default(),
                callback: None,
            }),
            capacity,
        }
    }

    // Every update is a plain field write, so a poisoned state is still whole.
    fn lock(&self) -> MutexGuard<'_, HandlerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a failure without extra context.
    #[inline]
    pub fn handle_error(&self, code: ErrorCode, message: impl Into<String>) -> FallbackStrategy {
        self.report(code, message, ErrorContext::default())
    }

    /// Records a failure and returns the tier it selects.
    ///
    /// Every call creates an event, updates the last-error and
    /// current-strategy slots and appends to the history. The log line is
    /// subject to the throttle. The callback runs after the lock is released.
    pub fn report(&self, code: ErrorCode, message: impl Into<String>, context: ErrorContext) -> FallbackStrategy {
        let event = ErrorEvent::new(code, message, context);
        let strategy = event.strategy;

        let callback = {
            let mut st = self.lock();
            st.strategy = strategy;
            st.last_error = Some(event.clone());
            if st.history.len() >= self.capacity {
                st.history.pop_front();
            }
            st.history.push_back(event.clone());
            if st.throttle.should_log(code) {
                log_event(&event);
            }
            st.callback.clone()
        };

        if let Some(cb) = callback {
            cb(&event);
        }
        strategy
    }

    /// Corrects every out-of-range or non-finite field in place.
    ///
    /// Non-finite values become the range midpoint and raise
    /// [`ErrorCode::NanInf`]. Out-of-range values are clamped and raise
    /// [`ErrorCode::RangeKnee`] for knee/toe fields, [`ErrorCode::RangePivot`]
    /// otherwise. Returns true if anything changed; afterwards
    /// `params.is_valid()` holds.
    pub fn validate_and_correct_params(&self, params: &mut ParameterSet) -> bool {
        let mut corrected = false;
        for field in ParamField::ALL {
            let value = params.get(field);
            let (lo, hi) = field.range();
            if value.is_finite() && value >= lo && value <= hi {
                continue;
            }
            let fixed = correct_value(field, value);
            params.set(field, fixed);
            corrected = true;

            let ctx = ErrorContext::new().field(field.name()).value(value);
            if value.is_finite() {
                let code = if field.is_knee() { ErrorCode::RangeKnee } else { ErrorCode::RangePivot };
                self.report(code, format!("outside [{lo}, {hi}], clamped to {fixed}"), ctx);
            } else {
                self.report(ErrorCode::NanInf, format!("non-finite, reset to midpoint {fixed}"), ctx);
            }
        }
        corrected
    }

    /// Most recent event.
    pub fn last_error(&self) -> Option<ErrorEvent> {
        self.lock().last_error.clone()
    }

    /// Snapshot of the history, oldest first.
    pub fn error_history(&self) -> Vec<ErrorEvent> {
        self.lock().history.iter().cloned().collect()
    }

    /// Tier selected by the most recent event.
    pub fn current_strategy(&self) -> FallbackStrategy {
        self.lock().strategy
    }

    /// Maximum history length.
    #[inline]
    pub fn history_capacity(&self) -> usize {
        self.capacity
    }

    /// Throttle bookkeeping for one code.
    pub fn throttle_state(&self, code: ErrorCode) -> Option<ThrottleState> {
        self.lock().throttle.state(code)
    }

    /// One line per code with suppressed log output.
    pub fn aggregate_reports(&self) -> Vec<String> {
        self.lock().throttle.aggregate_reports()
    }

    /// Empties the history.
    pub fn clear_history(&self) {
        self.lock().history.clear();
    }

    /// Clears the last error, strategy, throttle and history.
    ///
    /// The callback stays registered.
    pub fn reset(&self) {
        let mut st = self.lock();
        st.last_error = None;
        st.strategy = FallbackStrategy::default();
        st.throttle.reset();
        st.history.clear();
    }

    /// Registers the observer, replacing any previous one.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&ErrorEvent) + Send + Sync + 'static,
    {
        self.lock().callback = Some(Arc::new(callback));
    }

    /// Removes the observer.
    pub fn clear_callback(&self) {
        self.lock().callback = None;
    }
}

fn log_event(event: &ErrorEvent) {
    let field = event.field().unwrap_or("");
    let value = event.context.value.unwrap_or(f32::NAN);
    match event.level() {
        Level::Info => info!(code = %event.code, field, value, action = event.action(), "{}", event.message),
        Level::Warn => warn!(code = %event.code, field, value, action = event.action(), "{}", event.message),
        Level::Error => error!(code = %event.code, field, value, action = event.action(), "{}", event.message),
    }
}

// ============================================================================
// Process-wide default
// ============================================================================

static GLOBAL: OnceLock<Arc<ErrorHandler>> = OnceLock::new();

/// Process-wide handler, built on first use.
///
/// Prefer passing an explicit handler; this exists for call sites with no
/// session context.
pub fn global() -> Arc<ErrorHandler> {
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(ErrorHandler::new())))
}

/// Resets the process-wide handler and drops its callback.
pub fn reset_global() {
    if let Some(h) = GLOBAL.get() {
        h.reset();
        h.clear_callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_handle_error_updates_slots() {
        let h = ErrorHandler::new();
        assert!(h.last_error().is_none());
        assert_eq!(h.current_strategy(), FallbackStrategy::ParameterCorrection);

        assert_eq!(h.handle_error(ErrorCode::NanInf, "bad pixel"), FallbackStrategy::HardFallback);
        assert_eq!(h.current_strategy(), FallbackStrategy::HardFallback);
        let last = h.last_error().unwrap();
        assert_eq!(last.code, ErrorCode::NanInf);
        assert_eq!(last.action(), "IDENTITY");
        assert_eq!(last.message, "bad pixel");
    }

    #[test]
    fn test_throttled_logging() {
        let h = ErrorHandler::new();
        for i in 0..15 {
            h.handle_error(ErrorCode::GamutOog, format!("frame {i}"));
        }
        let s = h.throttle_state(ErrorCode::GamutOog).unwrap();
        assert_eq!(s.count, 10);
        assert_eq!(s.suppressed, 5);
        // Throttling only limits log lines; every event is recorded.
        assert_eq!(h.error_history().len(), 15);

        let reports = h.aggregate_reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("code GAMUT_OOG: 5 events suppressed"));
    }

    #[test]
    fn test_correct_params() {
        let h = ErrorHandler::new();
        let mut p = ParameterSet { pivot_pq: f32::NAN, gamma_s: 10.0, ..Default::default() };
        assert!(h.validate_and_correct_params(&mut p));
        assert_abs_diff_eq!(p.pivot_pq, 0.175, epsilon = 1e-6);
        assert_eq!(p.gamma_s, 1.6);
        assert!(p.is_valid());

        let hist = h.error_history();
        assert_eq!(hist.len(), 2);
        assert_eq!(hist[0].code, ErrorCode::NanInf);
        assert_eq!(hist[0].field(), Some("pivot_pq"));
        assert!(hist[0].context.value.unwrap().is_nan());
        assert_eq!(hist[1].code, ErrorCode::RangePivot);
        assert_eq!(hist[1].context.value, Some(10.0));
    }

    #[test]
    fn test_correct_knee_fields() {
        let h = ErrorHandler::new();
        let mut p = ParameterSet { yknee: 0.5, toe: -1.0, ..Default::default() };
        assert!(h.validate_and_correct_params(&mut p));
        assert_eq!(p.yknee, 0.95);
        assert_eq!(p.toe, 0.0);
        assert!(h.error_history().iter().all(|e| e.code == ErrorCode::RangeKnee));
    }

    #[test]
    fn test_valid_params_untouched() {
        let h = ErrorHandler::new();
        let mut p = ParameterSet::default();
        assert!(!h.validate_and_correct_params(&mut p));
        assert_eq!(p, ParameterSet::default());
        assert!(h.error_history().is_empty());
    }

    #[test]
    fn test_history_bounded() {
        let h = ErrorHandler::with_capacity(4);
        for i in 0..10 {
            h.handle_error(ErrorCode::DciBound, format!("{i}"));
        }
        let hist = h.error_history();
        assert_eq!(hist.len(), 4);
        assert_eq!(hist[0].message, "6");
        assert_eq!(hist[3].message, "9");
    }

    #[test]
    fn test_callback_runs_outside_lock() {
        let h = Arc::new(ErrorHandler::new());
        let seen = Arc::new(AtomicUsize::new(0));
        {
            let h2 = Arc::clone(&h);
            let seen = Arc::clone(&seen);
            h.set_callback(move |ev| {
                // Re-entering the handler would deadlock if the lock were held.
                assert_eq!(h2.last_error().map(|e| e.code), Some(ev.code));
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }
        h.handle_error(ErrorCode::HlFlicker, "detail failed");
        h.report(ErrorCode::RangeKnee, "knee", ErrorContext::new().field("yknee"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        h.clear_callback();
        h.handle_error(ErrorCode::HlFlicker, "again");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reset() {
        let h = ErrorHandler::new();
        for _ in 0..12 {
            h.handle_error(ErrorCode::NanInf, "x");
        }
        h.reset();
        assert!(h.last_error().is_none());
        assert!(h.error_history().is_empty());
        assert_eq!(h.current_strategy(), FallbackStrategy::ParameterCorrection);
        assert!(h.throttle_state(ErrorCode::NanInf).is_none());
        assert!(h.aggregate_reports().is_empty());
    }

    #[test]
    fn test_clear_history_keeps_last_error() {
        let h = ErrorHandler::new();
        h.handle_error(ErrorCode::SchemaMissing, "no params");
        h.clear_history();
        assert!(h.error_history().is_empty());
        assert_eq!(h.last_error().map(|e| e.code), Some(ErrorCode::SchemaMissing));
    }
}
