//! Declarative interpolation stage graph.
//!
//! A compiled pipeline is an ordered list of stages with every parameter
//! resolved to a literal value. The playback engine loads and executes the
//! serialized form without further context; conditional stages carry their
//! own runtime condition (e.g. the downscale ceiling) rather than being
//! resolved against a particular source.

use crate::cadence::FALLBACK_OFFSETS;
use frameflow_core::{FlowError, PipelineParameters, Result, ScalingAlgorithm, SynthesisModel};
use serde::{Deserialize, Serialize};

/// Working color formats at the convert boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    /// Planar RGB single-precision, the synthesis model's input format.
    RgbSingle,
    /// 8-bit YUV 4:2:0, the playback engine's output format.
    Yuv420p8,
}

/// One operation in the compiled pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PipelineStage {
    /// Determine true source cadence and drop container duplicates.
    /// Runs first, inside the pipeline, against live frame timing.
    DetectCadence {
        cycle: usize,
        /// Offsets of the fixed decimation pattern used when frame
        /// similarity is unavailable.
        fallback_offsets: Vec<usize>,
    },
    /// Color-space conversion (matrix BT.709 both ways).
    ConvertColor {
        format: ColorFormat,
        algorithm: ScalingAlgorithm,
    },
    /// Downscale when the source height exceeds `ceiling_height`; records
    /// original dimensions for the later upscale. Trades spatial detail
    /// for bounded per-frame synthesis latency.
    Downscale {
        ceiling_height: u32,
        algorithm: ScalingAlgorithm,
    },
    /// Mark hard cuts; a marked boundary suppresses synthesis for that
    /// frame pair (the frame is duplicated instead of blending scenes).
    MarkSceneChanges { threshold: f32 },
    /// Model-based frame synthesis. The multiplier comes from the runtime
    /// cadence decision; `scale_above_ceiling` is the internal processing
    /// scale applied when the source was above the ceiling.
    Synthesize {
        model: SynthesisModel,
        uhd_mode: bool,
        fp16: bool,
        gpu_index: u32,
        scale_above_ceiling: f32,
    },
    /// Degraded temporal-blend interpolation, emitted only when no
    /// synthesis backend is discoverable and fallback is allowed.
    BlendFrames,
    /// Upscale back to the dimensions recorded by `Downscale`.
    Upscale { algorithm: ScalingAlgorithm },
    /// Bounded FIFO look-ahead buffer absorbing synthesis jitter.
    /// Evicts by age/capacity only, never by key.
    CacheFrames { capacity: usize, linear: bool },
}

/// A complete, parameter-resolved pipeline description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Worker threads the executor should use.
    pub worker_threads: usize,
    /// Snapshot of the parameters this pipeline was compiled from.
    pub params: PipelineParameters,
    /// Stages in execution order.
    pub stages: Vec<PipelineStage>,
}

impl PipelineSpec {
    /// Structural validation: an interpolation stage (synthesis or blend
    /// fallback) and the output color conversion must both be present
    /// before the artifact is handed to the playback engine.
    pub fn validate(&self) -> bool {
        let has_interpolation = self.stages.iter().any(|s| {
            matches!(
                s,
                PipelineStage::Synthesize { .. } | PipelineStage::BlendFrames
            )
        });
        let has_output = self.stages.iter().any(|s| {
            matches!(
                s,
                PipelineStage::ConvertColor {
                    format: ColorFormat::Yuv420p8,
                    ..
                }
            )
        });
        has_interpolation && has_output
    }

    /// Whether this pipeline uses the degraded blend fallback.
    pub fn is_blend_fallback(&self) -> bool {
        self.stages
            .iter()
            .any(|s| matches!(s, PipelineStage::BlendFrames))
    }

    /// Serialize to the artifact wire form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FlowError::Serialization(format!("pipeline spec: {e}")))
    }

    /// Deserialize from the artifact wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FlowError::Serialization(format!("pipeline spec: {e}")))
    }
}

/// The cadence stage with the documented fallback pattern baked in.
pub fn cadence_stage() -> PipelineStage {
    PipelineStage::DetectCadence {
        cycle: 5,
        fallback_offsets: FALLBACK_OFFSETS.to_vec(),
    }
}
