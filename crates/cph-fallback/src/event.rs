//! Error events.
//!
//! An [`ErrorEvent`] is created once by the handler and never modified. Its
//! `Display` form is the log line:
//!
//! ```text
//! [2026-03-01 12:00:00.123][WARN][clip-7][01:00:00:12] code=RANGE_PIVOT, field=pivot_pq, val=0.5, action=PARAM_CORRECT - out of range
//! ```

use crate::{ErrorCode, FallbackStrategy, Level};
use chrono::{DateTime, Local};
use std::fmt;

/// Optional detail attached to a reported failure.
///
/// ```rust
/// use cph_fallback::ErrorContext;
///
/// let ctx = ErrorContext::new().field("gamma_s").value(10.0).clip("A001").timecode("01:00:00:00");
/// assert_eq!(ctx.field.as_deref(), Some("gamma_s"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// Parameter name.
    pub field: Option<String>,
    /// Offending value.
    pub value: Option<f32>,
    /// Clip identifier.
    pub clip_id: Option<String>,
    /// Timecode of the frame.
    pub timecode: Option<String>,
}

impl ErrorContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field name.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field = Some(name.into());
        self
    }

    /// Sets the offending value.
    pub fn value(mut self, v: f32) -> Self {
        self.value = Some(v);
        self
    }

    /// Sets the clip identifier.
    pub fn clip(mut self, id: impl Into<String>) -> Self {
        self.clip_id = Some(id.into());
        self
    }

    /// Sets the timecode.
    pub fn timecode(mut self, tc: impl Into<String>) -> Self {
        self.timecode = Some(tc.into());
        self
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    /// Classification.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Field, value and provenance.
    pub context: ErrorContext,
    /// Tier selected for this event.
    pub strategy: FallbackStrategy,
    /// Wall-clock creation time.
    pub timestamp: DateTime<Local>,
}

impl ErrorEvent {
    /// Creates an event stamped with the current time.
    pub fn new(code: ErrorCode, message: impl Into<String>, context: ErrorContext) -> Self {
        Self {
            code,
            message: message.into(),
            context,
            strategy: code.strategy(),
            timestamp: Local::now(),
        }
    }

    /// Action label, e.g. `PARAM_CORRECT`.
    #[inline]
    pub fn action(&self) -> &'static str {
        self.strategy.action()
    }

    /// Log level.
    #[inline]
    pub fn level(&self) -> Level {
        self.code.level()
    }

    /// Field name, if any.
    pub fn field(&self) -> Option<&str> {
        self.context.field.as_deref()
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}]", self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"), self.level())?;
        if let Some(clip) = &self.context.clip_id {
            write!(f, "[{clip}]")?;
        }
        if let Some(tc) = &self.context.timecode {
            write!(f, "[{tc}]")?;
        }
        write!(f, " code={}", self.code)?;
        if let Some(field) = &self.context.field {
            write!(f, ", field={field}")?;
        }
        if let Some(v) = self.context.value {
            write!(f, ", val={v}")?;
        }
        write!(f, ", action={}", self.action())?;
        if !self.message.is_empty() {
            write!(f, " - {}", self.message)?;
        }
        Ok(())
    }
}
