//! The configuration surface consumed by the pipeline core.
//!
//! Persistence of user settings is an external concern; the player hands a
//! fully populated [`InterpolationConfig`] to the orchestrator at
//! construction time.

use crate::params::{PipelineParameters, QualityPreset};
use serde::{Deserialize, Serialize};

/// Configuration the orchestrator is constructed with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Preset applied when interpolation is enabled.
    pub preset: QualityPreset,
    /// Parameter values used when `preset` is `Custom`.
    pub custom: Option<PipelineParameters>,
    /// Enable interpolation automatically when the engine reports a
    /// completed source load.
    pub auto_enable_on_load: bool,
    /// Adapter index handed to the synthesis stage.
    pub gpu_index: u32,
}
