//! Per-code log-volume throttle.
//!
//! Each code gets a fixed window. Within it the first
//! [`MAX_LOGS_PER_WINDOW`] events are logged and the rest are counted as
//! suppressed. The window restarts on the first event after it expires; the
//! suppressed count carries over so it can be reported later.

use crate::ErrorCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Log lines allowed per code per window.
pub const MAX_LOGS_PER_WINDOW: u32 = 10;

/// Window length.
pub const WINDOW: Duration = Duration::from_secs(1);

/// Throttle bookkeeping for one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleState {
    /// Lines logged in the current window.
    pub count: u32,
    /// Start of the current window.
    pub window_start: Instant,
    /// Suppressed events since the last reset.
    pub suppressed: u64,
    /// First suppression.
    pub first_suppressed: Option<Instant>,
    /// Most recent suppression.
    pub last_suppressed: Option<Instant>,
}

impl ThrottleState {
    fn new(now: Instant) -> Self {
        Self { count: 0, window_start: now, suppressed: 0, first_suppressed: None, last_suppressed: None }
    }

    /// Time between first and last suppression.
    pub fn suppressed_span(&self) -> Duration {
        match (self.first_suppressed, self.last_suppressed) {
            (Some(first), Some(last)) => last.saturating_duration_since(first),
            _ => Duration::ZERO,
        }
    }
}

/// Throttle over all codes.
#[derive(Debug, Clone)]
pub struct LogThrottle {
    states: HashMap<ErrorCode, ThrottleState>,
    max_per_window: u32,
    window: Duration,
}

impl Default for LogThrottle {
    fn default() -> Self {
        Self::new(MAX_LOGS_PER_WINDOW, WINDOW)
    }
}

impl LogThrottle {
    /// Throttle with a custom budget and window.
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self { states: HashMap::new(), max_per_window, window }
    }

    /// Whether an event with `code` may be logged now.
    #[inline]
    pub fn should_log(&mut self, code: ErrorCode) -> bool {
        self.should_log_at(code, Instant::now())
    }

    /// Whether an event with `code` may be logged at `now`.
    pub fn should_log_at(&mut self, code: ErrorCode, now: Instant) -> bool {
        let state = self.states.entry(code).or_insert_with(|| ThrottleState::new(now));
        if now.saturating_duration_since(state.window_start) >= self.window {
            state.count = 0;
            state.window_start = now;
        }
        if state.count >= self.max_per_window {
            state.suppressed += 1;
            if state.first_suppressed.is_none() {
                state.first_suppressed = Some(now);
            }
            state.last_suppressed = Some(now);
            return false;
        }
        state.count += 1;
        true
    }

    /// Current state of one code.
    pub fn state(&self, code: ErrorCode) -> Option<ThrottleState> {
        self.states.get(&code).copied()
    }

    /// Summary line for a code with suppressed events.
    pub fn aggregate_report(&self, code: ErrorCode) -> Option<String> {
        let state = self.states.get(&code)?;
        (state.suppressed > 0).then(|| {
            format!(
                "code {}: {} events suppressed over {} ms",
                code,
                state.suppressed,
                state.suppressed_span().as_millis()
            )
        })
    }

    /// Summaries for every code with suppressed events, in code order.
    pub fn aggregate_reports(&self) -> Vec<String> {
        ErrorCode::ALL.iter().filter_map(|&c| self.aggregate_report(c)).collect()
    }

    /// Forgets all state.
    pub fn reset(&mut self) {
        self.states.clear();
    }
}
