//! Error types for frame processing.

use cph_core::CoreError;
use thiserror::Error;

/// Error type for the frame orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// `process_frame` called before a successful initialization.
    #[error("processor not initialized")]
    NotInitialized,

    /// Parameters stayed invalid after correction.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Buffer or parameter failure from the core types.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The highlight detail filter failed.
    #[error("detail filter: {0}")]
    Detail(String),
}

/// Result type for frame processing.
pub type PipelineResult<T> = Result<T, PipelineError>;
