//! Failure classification and the fallback tier each class selects.

use std::fmt;

/// Failure classification.
///
/// Each code selects exactly one [`FallbackStrategy`] through
/// [`ErrorCode::strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ErrorCode {
    /// No failure; informational.
    Success = 0,
    /// Required parameters or session state missing.
    SchemaMissing = 1,
    /// A parameter was outside its range.
    RangePivot = 2,
    /// Knee, toe or curve-shape check failed.
    RangeKnee = 3,
    /// NaN or infinity in parameters or pixels.
    NanInf = 4,
    /// Deterministic re-run produced different output.
    DetMismatch = 5,
    /// Highlight detail stage failed or flickered.
    HlFlicker = 6,
    /// DCI delivery bound exceeded.
    DciBound = 7,
    /// Pixels left the target gamut.
    GamutOog = 8,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: [Self; 9] = [
        Self::Success,
        Self::SchemaMissing,
        Self::RangePivot,
        Self::RangeKnee,
        Self::NanInf,
        Self::DetMismatch,
        Self::HlFlicker,
        Self::DciBound,
        Self::GamutOog,
    ];

    /// Upper-case name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::SchemaMissing => "SCHEMA_MISSING",
            Self::RangePivot => "RANGE_PIVOT",
            Self::RangeKnee => "RANGE_KNEE",
            Self::NanInf => "NAN_INF",
            Self::DetMismatch => "DET_MISMATCH",
            Self::HlFlicker => "HL_FLICKER",
            Self::DciBound => "DCI_BOUND",
            Self::GamutOog => "GAMUT_OOG",
        }
    }

    /// Numeric value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Fallback tier selected by this code.
    ///
    /// `Success` stays on the lightest tier.
    pub const fn strategy(self) -> FallbackStrategy {
        match self {
            Self::Success | Self::RangePivot | Self::RangeKnee => FallbackStrategy::ParameterCorrection,
            Self::SchemaMissing | Self::DciBound | Self::GamutOog | Self::DetMismatch | Self::HlFlicker => {
                FallbackStrategy::StandardFallback
            }
            Self::NanInf => FallbackStrategy::HardFallback,
        }
    }

    /// Log level of events with this code.
    pub const fn level(self) -> Level {
        match self {
            Self::Success => Level::Info,
            Self::RangePivot | Self::RangeKnee | Self::DetMismatch | Self::HlFlicker => Level::Warn,
            _ => Level::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fallback tier, from lightest to heaviest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FallbackStrategy {
    /// Clamp the offending value and continue.
    #[default]
    ParameterCorrection,
    /// Revert to the simplified standard curve.
    StandardFallback,
    /// Pass input through unchanged.
    HardFallback,
}

impl FallbackStrategy {
    /// Action label recorded on events.
    pub const fn action(self) -> &'static str {
        match self {
            Self::ParameterCorrection => "PARAM_CORRECT",
            Self::StandardFallback => "FALLBACK2094",
            Self::HardFallback => "IDENTITY",
        }
    }
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Severity of an event in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Informational.
    Info,
    /// Recoverable; output still meets the contract.
    Warn,
    /// Output degraded to a fallback.
    Error,
}

impl Level {
    /// Upper-case tag.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
