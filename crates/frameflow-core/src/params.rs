//! Quality presets and pipeline parameter resolution.
//!
//! A preset is a fixed row in a table; `Custom` passes externally supplied
//! values through validation. Resolution is pure and deterministic so the
//! same preset always compiles the same pipeline.

use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-facing quality/performance trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    /// Lowest latency: 540p processing, lite model, bilinear scaling.
    Fast,
    /// Default: 720p processing, full model, spline36 scaling.
    #[default]
    Balanced,
    /// Highest quality: 1080p processing, full model, lanczos, UHD mode.
    Beauty,
    /// Externally supplied parameter values.
    Custom,
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fast => "Fast",
            Self::Balanced => "Balanced",
            Self::Beauty => "Beauty",
            Self::Custom => "Custom",
        };
        write!(f, "{name}")
    }
}

/// Resampling kernel used by the scale/convert stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingAlgorithm {
    Bilinear,
    #[default]
    Spline36,
    Lanczos,
    Mitchell,
}

impl ScalingAlgorithm {
    /// Kernel name as the pipeline description spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bilinear => "bilinear",
            Self::Spline36 => "spline36",
            Self::Lanczos => "lanczos",
            Self::Mitchell => "mitchell",
        }
    }

    /// The fast variant used for the latency-critical downscale step.
    /// Speed wins over ringing behavior there, whatever the user picked.
    pub fn fast_variant(self) -> Self {
        Self::Bilinear
    }
}

/// Frame synthesis model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SynthesisModel {
    /// Full RIFE v4.6 model.
    #[default]
    RifeV4,
    /// Lite RIFE v4.6 variant for entry-tier hardware.
    RifeV4Lite,
    /// Anime-tuned RIFE model.
    RifeAnime,
}

impl SynthesisModel {
    /// Model name as published.
    pub fn name(self) -> &'static str {
        match self {
            Self::RifeV4 => "rife-v4.6",
            Self::RifeV4Lite => "rife-v4.6-lite",
            Self::RifeAnime => "rife-anime",
        }
    }

    /// Filename looked up during backend discovery.
    pub fn filename(self) -> &'static str {
        match self {
            Self::RifeV4 => "rife_v4.6.onnx",
            Self::RifeV4Lite => "rife_v4.6_lite.onnx",
            Self::RifeAnime => "rife_anime.onnx",
        }
    }
}

/// Concrete parameters driving pipeline compilation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParameters {
    /// Height the synthesis stage works at. Must be positive.
    pub target_height: u32,
    /// Scene-change sensitivity in `[0, 1]`; lower is more sensitive.
    pub scene_threshold: f32,
    /// Which synthesis model to load.
    pub model: SynthesisModel,
    /// UHD mode for high-resolution sources.
    pub uhd_mode: bool,
    /// Resampling kernel for scale/convert stages.
    pub scaling: ScalingAlgorithm,
}

impl Default for PipelineParameters {
    fn default() -> Self {
        QualityPreset::Balanced.table_entry()
    }
}

impl PipelineParameters {
    /// Check the value-range invariants.
    pub fn validate(&self) -> Result<()> {
        if self.target_height == 0 {
            return Err(FlowError::InvalidParameter(
                "target height must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.scene_threshold) {
            return Err(FlowError::InvalidParameter(format!(
                "scene threshold {} outside [0, 1]",
                self.scene_threshold
            )));
        }
        Ok(())
    }
}

impl QualityPreset {
    /// The fixed parameter row for a non-custom preset.
    ///
    /// `Custom` has no row of its own and returns the `Balanced` values;
    /// use [`resolve`] to apply user-supplied parameters.
    pub fn table_entry(self) -> PipelineParameters {
        match self {
            Self::Fast => PipelineParameters {
                target_height: 540,
                scene_threshold: 0.20,
                model: SynthesisModel::RifeV4Lite,
                uhd_mode: false,
                scaling: ScalingAlgorithm::Bilinear,
            },
            Self::Balanced | Self::Custom => PipelineParameters {
                target_height: 720,
                scene_threshold: 0.15,
                model: SynthesisModel::RifeV4,
                uhd_mode: false,
                scaling: ScalingAlgorithm::Spline36,
            },
            Self::Beauty => PipelineParameters {
                target_height: 1080,
                scene_threshold: 0.10,
                model: SynthesisModel::RifeV4,
                uhd_mode: true,
                scaling: ScalingAlgorithm::Lanczos,
            },
        }
    }
}

/// Resolve a preset to concrete parameters.
///
/// `Fast`/`Balanced`/`Beauty` return the fixed table row. `Custom` returns
/// the supplied parameter set verbatim after validation and fails with
/// [`FlowError::InvalidParameter`] when no custom set was supplied or the
/// values are out of range.
pub fn resolve(
    preset: QualityPreset,
    custom: Option<&PipelineParameters>,
) -> Result<PipelineParameters> {
    match preset {
        QualityPreset::Custom => {
            let params = custom.ok_or_else(|| {
                FlowError::InvalidParameter(
                    "Custom preset selected but no custom parameters supplied".into(),
                )
            })?;
            params.validate()?;
            Ok(*params)
        }
        other => Ok(other.table_entry()),
    }
}
