//! The frame orchestrator.
//!
//! # Processing order
//!
//! ```text
//! input (linear, tagged)
//!   -> validate                      NAN_INF on failure
//!   -> working domain (BT.2020 PQ)
//!   -> tone map MaxRGB, scale RGB
//!   -> detail filter (optional)      HL_FLICKER on failure, continue
//!   -> saturation, gamut constraint  GAMUT_OOG when DCI strict
//!   -> finite check                  NAN_INF, identity fallback
//!   -> output domain (input's tag)
//!   -> statistics, curve checks on the first frame (RANGE_KNEE)
//! ```

use crate::{DetailFilter, FrameStats, PipelineError, PipelineResult, highlight_mask, stages};
use cph_color::{SaturationParams, from_working, to_working};
use cph_core::{Image, ParameterSet};
use cph_fallback::{ErrorCode, ErrorContext, ErrorEvent, ErrorHandler};
use cph_tone::ToneCurve;
use std::sync::Arc;
use tracing::{debug, trace};

/// Tone-reproduction session: parameters, curve, statistics and the error
/// handler every stage reports to.
///
/// # Example
///
/// ```rust
/// use cph_core::{ColorSpace, Image, ParameterSet};
/// use cph_pipeline::Processor;
///
/// let mut proc = Processor::default();
/// assert!(proc.initialize(ParameterSet::default()));
///
/// let frame = Image::from_vec(2, 1, 3, vec![0.01, 0.005, 0.002, 0.2, 0.1, 0.05], ColorSpace::P3D65)?;
/// let out = proc.process_frame(&frame)?;
/// assert_eq!(out.color_space, ColorSpace::P3D65);
/// assert_eq!(proc.stats().frame_count, 1);
/// # Ok::<(), cph_pipeline::PipelineError>(())
/// ```
pub struct Processor {
    params: ParameterSet,
    curve: Option<ToneCurve>,
    handler: Arc<ErrorHandler>,
    detail: Option<Box<dyn DetailFilter>>,
    stats: FrameStats,
}

impl Default for Processor {
    fn default() -> Self {
        Self::with_handler(Arc::new(ErrorHandler::new()))
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("params", &self.params)
            .field("initialized", &self.curve.is_some())
            .field("detail", &self.detail.as_ref().map(|d| d.name().to_owned()))
            .field("stats", &self.stats)
            .finish()
    }
}

impl Processor {
    /// Uninitialized processor reporting to `handler`.
    pub fn with_handler(handler: Arc<ErrorHandler>) -> Self {
        Self { params: ParameterSet::default(), curve: None, handler, detail: None, stats: FrameStats::default() }
    }

    /// Initialized processor; see [`Processor::try_initialize`].
    pub fn new(params: ParameterSet, handler: Arc<ErrorHandler>) -> PipelineResult<Self> {
        let mut p = Self::with_handler(handler);
        p.try_initialize(params)?;
        Ok(p)
    }

    /// Corrects `params` through the handler and builds the curve.
    ///
    /// Out-of-range and non-finite fields are corrected and reported rather
    /// than rejected. Statistics are reset on success.
    pub fn try_initialize(&mut self, mut params: ParameterSet) -> PipelineResult<()> {
        self.handler.validate_and_correct_params(&mut params);
        if let Some(v) = params.validate().first() {
            return Err(PipelineError::InvalidParams(format!("{} = {}", v.field, v.value)));
        }
        let curve = ToneCurve::new(&params)?;
        debug!(curve = %params.curve, pivot = params.pivot_pq, "processor initialized");
        self.params = params;
        self.curve = Some(curve);
        self.stats = FrameStats::default();
        Ok(())
    }

    /// [`Processor::try_initialize`] reporting failure as `false`.
    ///
    /// The cause is recorded on the handler as `SCHEMA_MISSING`.
    pub fn initialize(&mut self, params: ParameterSet) -> bool {
        match self.try_initialize(params) {
            Ok(()) => true,
            Err(e) => {
                self.curve = None;
                self.handler.handle_error(ErrorCode::SchemaMissing, format!("initialization failed: {e}"));
                false
            }
        }
    }

    /// True once parameters have been accepted.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.curve.is_some()
    }

    /// Effective (corrected) parameters.
    #[inline]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Tone curve, once initialized.
    #[inline]
    pub fn curve(&self) -> Option<&ToneCurve> {
        self.curve.as_ref()
    }

    /// Shared error handler.
    #[inline]
    pub fn handler(&self) -> &Arc<ErrorHandler> {
        &self.handler
    }

    /// Installs the highlight detail filter. It runs when
    /// `highlight_detail > 0`.
    pub fn set_detail_filter(&mut self, filter: Box<dyn DetailFilter>) {
        self.detail = Some(filter);
    }

    /// Removes the detail filter.
    pub fn clear_detail_filter(&mut self) {
        self.detail = None;
    }

    /// Strict gamut handling for DCI deliverables.
    pub fn set_dci_compliance(&mut self, enabled: bool) {
        self.params.dci_compliance = enabled;
    }

    /// Sequential, repeatable pixel loops.
    pub fn set_deterministic(&mut self, enabled: bool) {
        self.params.deterministic = enabled;
    }

    /// Session statistics.
    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Clears statistics; the next frame re-runs the curve checks.
    pub fn reset_stats(&mut self) {
        self.stats = FrameStats::default();
    }

    /// Events recorded by the handler.
    pub fn error_history(&self) -> Vec<ErrorEvent> {
        self.handler.error_history()
    }

    /// Most recent event.
    pub fn last_error(&self) -> Option<ErrorEvent> {
        self.handler.last_error()
    }

    /// Empties the handler's history.
    pub fn clear_errors(&self) {
        self.handler.clear_history();
    }

    fn parallel(&self) -> bool {
        cfg!(feature = "parallel") && !self.params.deterministic
    }

    /// Processes one frame; the output carries the input's color space.
    ///
    /// Fails when not initialized or when the input breaks the [`Image`]
    /// invariants. A non-finite intermediate result returns the input
    /// unchanged (identity fallback) rather than an error.
    pub fn process_frame(&mut self, input: &Image) -> PipelineResult<Image> {
        let Some(curve) = self.curve else {
            self.handler.handle_error(ErrorCode::SchemaMissing, "processor not initialized");
            return Err(PipelineError::NotInitialized);
        };
        if let Err(e) = input.validate() {
            self.handler.handle_error(ErrorCode::NanInf, format!("invalid input frame: {e}"));
            return Err(e.into());
        }

        let parallel = self.parallel();
        debug!(width = input.width(), height = input.height(), space = %input.color_space, parallel, "process frame");

        let mut work = to_working(input)?;

        let zeroed = stages::tone_map(&curve, &mut work, parallel);
        trace!(zeroed, "tone map");

        if self.params.highlight_detail > 0.0 {
            work = self.run_detail(work);
        }

        let sat = SaturationParams::from_params(&self.params);
        let strict = self.params.dci_compliance;
        let corrected = stages::color(&sat, strict, &mut work, parallel);
        trace!(corrected, strict, "saturation and gamut");
        if strict && corrected > 0 {
            self.handler.report(
                ErrorCode::GamutOog,
                format!("{corrected} pixels outside BT.2020 corrected"),
                ErrorContext::new().value(corrected as f32),
            );
        }

        if !work.is_valid() {
            self.handler.handle_error(ErrorCode::NanInf, "non-finite result, passing input through");
            return Ok(input.clone());
        }

        let output = from_working(&work, input.color_space)?;

        self.stats.record_frame(&work, corrected);
        if self.stats.frame_count == 1 {
            self.check_curve(&curve);
        }
        Ok(output)
    }

    fn run_detail(&self, work: Image) -> Image {
        let Some(filter) = self.detail.as_deref() else {
            return work;
        };
        let mask = highlight_mask(&work, self.params.pivot_pq);
        let result = filter.apply(&work, &mask, self.params.highlight_detail).and_then(|out| {
            let same_shape = out.width() == work.width()
                && out.height() == work.height()
                && out.channels() == work.channels();
            if !same_shape {
                return Err(PipelineError::Detail(format!(
                    "returned {}x{}x{}, expected {}x{}x{}",
                    out.width(),
                    out.height(),
                    out.channels(),
                    work.width(),
                    work.height(),
                    work.channels()
                )));
            }
            out.validate()?;
            Ok(out)
        });
        match result {
            Ok(out) => out,
            Err(e) => {
                self.handler.report(
                    ErrorCode::HlFlicker,
                    format!("{} failed: {e}", filter.name()),
                    ErrorContext::new().field("highlight_detail").value(self.params.highlight_detail),
                );
                work
            }
        }
    }

    fn check_curve(&mut self, curve: &ToneCurve) {
        let v = curve.validate();
        self.stats.monotonic = v.monotonic;
        self.stats.c1_continuous = v.c1_continuous;
        self.stats.max_derivative_gap = v.max_derivative_gap;
        if !v.monotonic {
            self.handler.handle_error(ErrorCode::RangeKnee, "tone curve is not monotonic");
        }
        if !v.c1_continuous {
            self.handler.report(
                ErrorCode::RangeKnee,
                "tone curve slope jump above threshold",
                ErrorContext::new().value(v.max_derivative_gap),
            );
        }
    }
}
