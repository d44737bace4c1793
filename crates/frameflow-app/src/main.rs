//! FrameFlow - adaptive frame-interpolation pipeline
//!
//! Demo binary: probes the GPU, picks a preset for its tier, and drives
//! the orchestrator through an enable / preset-change / disable cycle
//! against the logging engine stub.

use anyhow::Result;
use frameflow_core::{InterpolationConfig, QualityPreset};
use frameflow_gpu::{DetectorConfig, GpuTier, HardwareDetector};
use frameflow_pipeline::{backend, ArtifactStore, BackendConfig, CompilerConfig, PipelineCompiler};
use frameflow_runtime::{
    spawn_sweeper, EngineEvent, EventBridge, InterpolationManager, LoggingEngine,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("FrameFlow starting...");

    // Probe the GPU and pick a preset for its tier.
    let profile = HardwareDetector::new(DetectorConfig::default()).detect_or_unsupported();
    info!(
        name = %profile.name,
        tier = ?profile.tier,
        "Hardware profile"
    );
    let preset = match profile.tier {
        GpuTier::High => QualityPreset::Beauty,
        GpuTier::Mid => QualityPreset::Balanced,
        GpuTier::Entry => QualityPreset::Fast,
        GpuTier::Unsupported => {
            warn!("No supported accelerator found; interpolation will run in fallback mode");
            QualityPreset::Fast
        }
    };

    let compiler = PipelineCompiler::new(CompilerConfig {
        backend: BackendConfig {
            model_dirs: backend::default_model_dirs(),
            // The demo has no model files installed; blending keeps it
            // runnable end to end.
            allow_blend_fallback: true,
        },
        gpu_index: 0,
    });
    let store = ArtifactStore::new(artifact_dir());
    let engine = Arc::new(LoggingEngine::new());

    let manager = Arc::new(InterpolationManager::new(
        InterpolationConfig {
            preset,
            auto_enable_on_load: true,
            ..InterpolationConfig::default()
        },
        compiler,
        store,
        engine.clone(),
    ));

    let bridge = EventBridge::spawn(manager.clone());
    let sweeper = spawn_sweeper(manager.clone(), SWEEP_INTERVAL);

    // Simulate the player loading a source; the bridge enables
    // interpolation when the load completes.
    engine.emit(EngineEvent::LoadStarted);
    engine.emit(EngineEvent::LoadCompleted);
    std::thread::sleep(Duration::from_millis(200));

    let status = manager.status();
    info!(state = status.state.as_str(), preset = %status.preset, "Pipeline status");
    let metrics = manager.metrics();
    info!(
        fps = metrics.current_fps,
        measured = metrics.measured,
        "Output rate"
    );

    // Swap presets while enabled, then shut down cleanly.
    if status.preset != QualityPreset::Fast {
        manager.change_preset(QualityPreset::Fast)?;
        info!(preset = %QualityPreset::Fast, "Preset changed");
    }
    manager.disable()?;

    sweeper.shutdown();
    bridge.shutdown();
    info!("FrameFlow stopped");
    Ok(())
}

fn artifact_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("frameflow")
        .join("artifacts")
}
