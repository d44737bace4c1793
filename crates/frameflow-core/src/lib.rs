//! FrameFlow Core - Foundation types for adaptive frame interpolation
//!
//! This crate provides the fundamental types used throughout FrameFlow:
//! - Frame rate representation (rational, NTSC-aware)
//! - CPU frame buffers for cadence analysis
//! - Quality presets and pipeline parameter resolution
//! - The runtime configuration surface
//! - The shared error taxonomy

pub mod config;
pub mod error;
pub mod frame;
pub mod params;
pub mod rate;

pub use config::InterpolationConfig;
pub use error::{FlowError, Result};
pub use frame::{FrameBuffer, PixelFormat};
pub use params::{PipelineParameters, QualityPreset, ScalingAlgorithm, SynthesisModel};
pub use rate::FrameRate;

/// Processing limits for real-time interpolation.
pub mod limits {
    /// Source heights above this are downscaled before synthesis to keep
    /// per-frame latency bounded.
    pub const REALTIME_CEILING_HEIGHT: u32 = 720;

    /// Internal synthesis scale used when the source is above the ceiling.
    pub const ABOVE_CEILING_SCALE: f32 = 0.5;

    /// Capacity of the look-ahead frame buffer that absorbs synthesis jitter.
    pub const LOOKAHEAD_FRAMES: usize = 100;

    /// Artifacts older than this are removed by the background sweep.
    pub const ARTIFACT_RETENTION_SECS: u64 = 60 * 60;
}
