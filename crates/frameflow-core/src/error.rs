//! Error types for FrameFlow.

use thiserror::Error;

/// Main error type for FrameFlow operations.
///
/// Every variant carries enough detail to be shown to an end user; the
/// orchestrator surfaces these synchronously from `enable`/`disable`/
/// `change_preset`.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Hardware probe unavailable. Non-fatal: callers degrade to the
    /// lowest capability tier instead of aborting startup.
    #[error("Hardware detection failed: {0}")]
    Detection(String),

    /// Malformed custom parameters. The prior pipeline state is kept.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No synthesis backend discoverable, or the artifact build failed.
    #[error("Pipeline compilation failed: {0}")]
    Compilation(String),

    /// The playback engine rejected a compiled artifact.
    #[error("Engine rejected pipeline: {0}")]
    Attach(String),

    /// A playback engine call failed outside of attach.
    #[error("Engine error: {0}")]
    Engine(String),

    /// Operation not legal in the current pipeline state.
    #[error("Cannot {operation} while pipeline is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for FrameFlow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
