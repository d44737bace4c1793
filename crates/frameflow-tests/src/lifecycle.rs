//! Cross-crate lifecycle tests: tier classification feeding the
//! orchestrator, artifact persistence across store instances, and the
//! retention sweep around a live pipeline.

use frameflow_core::{InterpolationConfig, QualityPreset, SynthesisModel};
use frameflow_gpu::{classify_tier, recommended_parameters, GpuTier};
use frameflow_pipeline::{
    artifact::RETENTION, ArtifactStore, BackendConfig, CompilerConfig, PipelineCompiler,
    PipelineSpec,
};
use frameflow_runtime::{InterpolationManager, LoggingEngine, PipelineState};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

fn write_models(dir: &Path) {
    for model in [
        SynthesisModel::RifeV4,
        SynthesisModel::RifeV4Lite,
        SynthesisModel::RifeAnime,
    ] {
        std::fs::write(dir.join(model.filename()), b"model").unwrap();
    }
}

fn compiler(model_dir: &Path) -> PipelineCompiler {
    PipelineCompiler::new(CompilerConfig {
        backend: BackendConfig {
            model_dirs: vec![model_dir.to_path_buf()],
            allow_blend_fallback: false,
        },
        gpu_index: 0,
    })
}

fn artifact_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.file_name().to_string_lossy().starts_with("frameflow_"))
                .count()
        })
        .unwrap_or(0)
}

#[test]
fn test_tier_parameters_drive_custom_pipeline() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    write_models(tmp.path());

    // An RTX 3080 classifies High; its recommended parameters go through
    // the manager as a custom preset.
    let tier = classify_tier("NVIDIA GeForce RTX 3080");
    assert_eq!(tier, GpuTier::High);
    let params = recommended_parameters(tier);

    let engine = Arc::new(LoggingEngine::new());
    let manager = InterpolationManager::new(
        InterpolationConfig {
            preset: QualityPreset::Custom,
            custom: Some(params),
            ..InterpolationConfig::default()
        },
        compiler(tmp.path()),
        ArtifactStore::new(tmp.path().join("artifacts")),
        engine.clone(),
    );

    manager.enable().unwrap();
    let status = manager.status();
    assert_eq!(status.state, PipelineState::Enabled);
    assert_eq!(status.parameters.unwrap(), params);
    assert!(engine.attached().is_some());

    manager.disable().unwrap();
    assert!(engine.attached().is_none());
}

#[test]
fn test_repeated_cycles_hold_one_artifact() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    write_models(tmp.path());
    let store_dir = tmp.path().join("artifacts");

    let manager = InterpolationManager::new(
        InterpolationConfig::default(),
        compiler(tmp.path()),
        ArtifactStore::new(&store_dir),
        Arc::new(LoggingEngine::new()),
    );

    for preset in [
        QualityPreset::Fast,
        QualityPreset::Beauty,
        QualityPreset::Balanced,
    ] {
        manager.enable().unwrap();
        assert_eq!(artifact_files(&store_dir), 1);
        manager.change_preset(preset).unwrap();
        assert_eq!(artifact_files(&store_dir), 1);
        manager.disable().unwrap();
        assert_eq!(artifact_files(&store_dir), 0);
    }
}

#[test]
fn test_artifact_survives_store_reopen() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    write_models(tmp.path());
    let store_dir = tmp.path().join("artifacts");

    let spec = compiler(tmp.path())
        .compile(&QualityPreset::Balanced.table_entry())
        .unwrap();
    let artifact = ArtifactStore::new(&store_dir).create(&spec).unwrap();

    // A fresh store instance must load the persisted document without any
    // in-process context.
    let reopened = ArtifactStore::new(&store_dir);
    let loaded = reopened.load(&artifact).unwrap();
    assert_eq!(loaded, spec);

    // The raw file parses as a spec document too.
    let json = std::fs::read_to_string(&artifact.path).unwrap();
    assert!(json.contains("\"op\""));
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    let spec_value = doc.get("spec").unwrap();
    let parsed: PipelineSpec = serde_json::from_value(spec_value.clone()).unwrap();
    assert_eq!(parsed, spec);
}

#[test]
fn test_sweep_removes_stale_but_not_live() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    write_models(tmp.path());
    let store_dir = tmp.path().join("artifacts");

    // An orphan left behind by a crashed run, aged past retention.
    let store = ArtifactStore::new(&store_dir);
    let spec = compiler(tmp.path())
        .compile(&QualityPreset::Fast.table_entry())
        .unwrap();
    let orphan = store.create(&spec).unwrap();
    let stale = SystemTime::now() - (RETENTION + Duration::from_secs(60));
    filetime::set_file_mtime(&orphan.path, filetime::FileTime::from_system_time(stale)).unwrap();

    let manager = InterpolationManager::new(
        InterpolationConfig::default(),
        compiler(tmp.path()),
        ArtifactStore::new(&store_dir),
        Arc::new(LoggingEngine::new()),
    );
    // Startup in the constructor already swept the orphan.
    assert_eq!(artifact_files(&store_dir), 0);

    manager.enable().unwrap();
    assert_eq!(manager.sweep_now(), 0);
    assert_eq!(artifact_files(&store_dir), 1);
    assert_eq!(manager.status().state, PipelineState::Enabled);
}
