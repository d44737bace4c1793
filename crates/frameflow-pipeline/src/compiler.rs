//! Pipeline compilation.
//!
//! Builds the fixed stage order of the interpolation pipeline from resolved
//! parameters: cadence detection, color conversion in, conditional
//! downscale at the real-time ceiling, scene-change marking, synthesis,
//! conditional upscale, color conversion out, look-ahead buffering.

use crate::backend::{self, BackendConfig, SynthesisBackend};
use crate::graph::{cadence_stage, ColorFormat, PipelineSpec, PipelineStage};
use frameflow_core::{limits, FlowError, PipelineParameters, Result};
use tracing::{debug, info};

/// Compiler construction-time configuration.
#[derive(Debug, Clone, Default)]
pub struct CompilerConfig {
    pub backend: BackendConfig,
    /// Adapter index the synthesis stage is pinned to.
    pub gpu_index: u32,
}

/// Compiles parameters into a validated pipeline description.
pub struct PipelineCompiler {
    config: CompilerConfig,
}

impl PipelineCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile a pipeline spec for the given parameters.
    ///
    /// Fails with [`FlowError::Compilation`] when no synthesis backend is
    /// discoverable (and blend fallback is disabled) or the produced graph
    /// does not validate.
    pub fn compile(&self, params: &PipelineParameters) -> Result<PipelineSpec> {
        params.validate()?;
        let discovered = backend::discover(&self.config.backend, params.model)?;

        let mut stages = Vec::with_capacity(8);
        stages.push(cadence_stage());
        stages.push(PipelineStage::ConvertColor {
            format: ColorFormat::RgbSingle,
            algorithm: params.scaling,
        });
        // Latency beats detail above the ceiling; the fast kernel is used
        // for the downscale whatever the preset picked.
        stages.push(PipelineStage::Downscale {
            ceiling_height: limits::REALTIME_CEILING_HEIGHT,
            algorithm: params.scaling.fast_variant(),
        });
        stages.push(PipelineStage::MarkSceneChanges {
            threshold: params.scene_threshold,
        });
        match discovered {
            SynthesisBackend::Model { model, .. } => {
                stages.push(PipelineStage::Synthesize {
                    model,
                    uhd_mode: params.uhd_mode,
                    fp16: true,
                    gpu_index: self.config.gpu_index,
                    scale_above_ceiling: limits::ABOVE_CEILING_SCALE,
                });
            }
            SynthesisBackend::TemporalBlend => {
                stages.push(PipelineStage::BlendFrames);
            }
        }
        stages.push(PipelineStage::Upscale {
            algorithm: params.scaling.fast_variant(),
        });
        stages.push(PipelineStage::ConvertColor {
            format: ColorFormat::Yuv420p8,
            algorithm: params.scaling.fast_variant(),
        });
        stages.push(PipelineStage::CacheFrames {
            capacity: limits::LOOKAHEAD_FRAMES,
            linear: true,
        });

        let spec = PipelineSpec {
            worker_threads: num_cpus::get(),
            params: *params,
            stages,
        };

        if !spec.validate() {
            return Err(FlowError::Compilation(
                "compiled pipeline failed structural validation".into(),
            ));
        }

        debug!(stages = spec.stages.len(), threads = spec.worker_threads, "Pipeline graph built");
        info!(
            model = params.model.name(),
            target_height = params.target_height,
            blend_fallback = spec.is_blend_fallback(),
            "Pipeline compiled"
        );
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameflow_core::{QualityPreset, SynthesisModel};

    fn compiler_with_model(dir: &std::path::Path, model: SynthesisModel) -> PipelineCompiler {
        std::fs::write(dir.join(model.filename()), b"model").unwrap();
        PipelineCompiler::new(CompilerConfig {
            backend: BackendConfig {
                model_dirs: vec![dir.to_path_buf()],
                allow_blend_fallback: false,
            },
            gpu_index: 0,
        })
    }

    #[test]
    fn test_compile_fixed_stage_order() {
        let tmp = tempfile::tempdir().expect("failed to create tempdir");
        let params = QualityPreset::Balanced.table_entry();
        let compiler = compiler_with_model(tmp.path(), params.model);

        let spec = compiler.compile(&params).unwrap();
        assert!(spec.validate());
        assert_eq!(spec.stages.len(), 8);
        assert!(matches!(spec.stages[0], PipelineStage::DetectCadence { .. }));
        assert!(matches!(
            spec.stages[1],
            PipelineStage::ConvertColor {
                format: ColorFormat::RgbSingle,
                ..
            }
        ));
        assert!(matches!(
            spec.stages[2],
            PipelineStage::Downscale {
                ceiling_height: 720,
                ..
            }
        ));
        assert!(matches!(spec.stages[4], PipelineStage::Synthesize { .. }));
        assert!(matches!(
            spec.stages[7],
            PipelineStage::CacheFrames { capacity: 100, .. }
        ));
    }

    #[test]
    fn test_compile_without_backend_fails() {
        let tmp = tempfile::tempdir().expect("failed to create tempdir");
        let compiler = PipelineCompiler::new(CompilerConfig {
            backend: BackendConfig {
                model_dirs: vec![tmp.path().to_path_buf()],
                allow_blend_fallback: false,
            },
            gpu_index: 0,
        });
        let result = compiler.compile(&QualityPreset::Fast.table_entry());
        assert!(matches!(result, Err(FlowError::Compilation(_))));
    }

    #[test]
    fn test_compile_blend_fallback() {
        let tmp = tempfile::tempdir().expect("failed to create tempdir");
        let compiler = PipelineCompiler::new(CompilerConfig {
            backend: BackendConfig {
                model_dirs: vec![tmp.path().to_path_buf()],
                allow_blend_fallback: true,
            },
            gpu_index: 0,
        });
        let spec = compiler.compile(&QualityPreset::Fast.table_entry()).unwrap();
        assert!(spec.is_blend_fallback());
        assert!(spec.validate());
    }

    #[test]
    fn test_compile_rejects_invalid_params() {
        let tmp = tempfile::tempdir().expect("failed to create tempdir");
        let mut params = QualityPreset::Fast.table_entry();
        let compiler = compiler_with_model(tmp.path(), params.model);
        params.scene_threshold = 2.0;
        assert!(matches!(
            compiler.compile(&params),
            Err(FlowError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_compiled_parameters_are_literal() {
        let tmp = tempfile::tempdir().expect("failed to create tempdir");
        let params = QualityPreset::Beauty.table_entry();
        let compiler = compiler_with_model(tmp.path(), params.model);

        let spec = compiler.compile(&params).unwrap();
        let json = spec.to_json().unwrap();
        // Resolved literals, no templating placeholders.
        assert!(json.contains("\"threshold\": 0.1"));
        assert!(!json.contains("{{"));
        assert_eq!(spec.params, params);
    }

    #[test]
    fn test_gpu_index_threaded_through() {
        let tmp = tempfile::tempdir().expect("failed to create tempdir");
        let params = QualityPreset::Balanced.table_entry();
        std::fs::write(tmp.path().join(params.model.filename()), b"m").unwrap();
        let compiler = PipelineCompiler::new(CompilerConfig {
            backend: BackendConfig {
                model_dirs: vec![tmp.path().to_path_buf()],
                allow_blend_fallback: false,
            },
            gpu_index: 1,
        });
        let spec = compiler.compile(&params).unwrap();
        let synth = spec
            .stages
            .iter()
            .find_map(|s| match s {
                PipelineStage::Synthesize { gpu_index, .. } => Some(*gpu_index),
                _ => None,
            })
            .unwrap();
        assert_eq!(synth, 1);
    }
}
