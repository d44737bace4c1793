//! Preset resolution through compilation to persisted artifacts.

use frameflow_core::{params, PipelineParameters, QualityPreset, ScalingAlgorithm, SynthesisModel};
use frameflow_gpu::{recommended_parameters, GpuTier};
use frameflow_pipeline::{
    ArtifactStore, BackendConfig, CompilerConfig, PipelineCompiler, PipelineStage,
};
use std::path::Path;

fn compiler(model_dir: &Path, fallback: bool) -> PipelineCompiler {
    PipelineCompiler::new(CompilerConfig {
        backend: BackendConfig {
            model_dirs: vec![model_dir.to_path_buf()],
            allow_blend_fallback: fallback,
        },
        gpu_index: 0,
    })
}

fn write_models(dir: &Path) {
    for model in [
        SynthesisModel::RifeV4,
        SynthesisModel::RifeV4Lite,
        SynthesisModel::RifeAnime,
    ] {
        std::fs::write(dir.join(model.filename()), b"model").unwrap();
    }
}

#[test]
fn test_every_preset_compiles_and_persists() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    write_models(tmp.path());
    let compiler = compiler(tmp.path(), false);
    let store = ArtifactStore::new(tmp.path().join("artifacts"));

    for preset in [
        QualityPreset::Fast,
        QualityPreset::Balanced,
        QualityPreset::Beauty,
    ] {
        let resolved = params::resolve(preset, None).unwrap();
        let spec = compiler.compile(&resolved).unwrap();
        assert!(spec.validate());
        assert!(!spec.is_blend_fallback());
        assert!(spec.worker_threads >= 1);

        let artifact = store.create(&spec).unwrap();
        assert_eq!(artifact.params, resolved);
        assert_eq!(store.load(&artifact).unwrap(), spec);
        store.delete(&artifact).unwrap();
    }
}

#[test]
fn test_preset_table_values() {
    let fast = params::resolve(QualityPreset::Fast, None).unwrap();
    assert_eq!(fast.target_height, 540);
    assert_eq!(fast.model, SynthesisModel::RifeV4Lite);
    assert_eq!(fast.scaling, ScalingAlgorithm::Bilinear);

    let balanced = params::resolve(QualityPreset::Balanced, None).unwrap();
    assert_eq!(balanced.target_height, 720);
    assert!(!balanced.uhd_mode);

    let beauty = params::resolve(QualityPreset::Beauty, None).unwrap();
    assert_eq!(beauty.target_height, 1080);
    assert!(beauty.uhd_mode);
    assert_eq!(beauty.scaling, ScalingAlgorithm::Lanczos);
}

#[test]
fn test_tier_recommendation_compiles() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    write_models(tmp.path());
    let compiler = compiler(tmp.path(), false);

    for tier in [
        GpuTier::Unsupported,
        GpuTier::Entry,
        GpuTier::Mid,
        GpuTier::High,
    ] {
        let params = recommended_parameters(tier);
        let resolved = params::resolve(QualityPreset::Custom, Some(&params)).unwrap();
        assert!(compiler.compile(&resolved).is_ok());
    }
}

#[test]
fn test_blend_fallback_replaces_synthesis_stage() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    // No model files on disk.
    let compiler = compiler(tmp.path(), true);

    let spec = compiler
        .compile(&params::resolve(QualityPreset::Balanced, None).unwrap())
        .unwrap();
    assert!(spec.is_blend_fallback());
    assert!(spec
        .stages
        .iter()
        .any(|s| matches!(s, PipelineStage::BlendFrames)));
    assert!(!spec
        .stages
        .iter()
        .any(|s| matches!(s, PipelineStage::Synthesize { .. })));
}

#[test]
fn test_invalid_custom_parameters_rejected_before_compile() {
    let bad = PipelineParameters {
        target_height: 0,
        scene_threshold: 0.15,
        model: SynthesisModel::RifeV4,
        uhd_mode: false,
        scaling: ScalingAlgorithm::Spline36,
    };
    assert!(params::resolve(QualityPreset::Custom, Some(&bad)).is_err());
    assert!(params::resolve(QualityPreset::Custom, None).is_err());
}
