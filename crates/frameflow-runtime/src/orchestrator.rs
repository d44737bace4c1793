//! The pipeline orchestrator state machine.
//!
//! Owns the single live-artifact slot and serializes every transition under
//! one mutex: a transition completes, including artifact creation and
//! deletion, before the next call is accepted. `enable` is synchronous from
//! the caller's viewpoint; there is no observable partial state and no
//! mid-compile cancellation.

use crate::engine::{EngineEvent, PlaybackEngine};
use crossbeam_channel::{bounded, select, Receiver};
use frameflow_core::{
    params, FlowError, InterpolationConfig, PipelineParameters, QualityPreset, Result,
};
use frameflow_pipeline::artifact::RETENTION;
use frameflow_pipeline::{ArtifactStore, PipelineArtifact, PipelineCompiler};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Orchestrator state. `Disabled` is both initial and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Disabled,
    Enabling,
    Enabled,
    Disabling,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabling => "enabling",
            Self::Enabled => "enabled",
            Self::Disabling => "disabling",
        }
    }
}

/// Status surface exposed to the player UI.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    pub state: PipelineState,
    pub preset: QualityPreset,
    /// Parameters of the live pipeline, when one is enabled.
    pub parameters: Option<PipelineParameters>,
    /// Last surfaced error, user-displayable.
    pub last_error: Option<String>,
}

/// Output-rate metrics for the on-screen display.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PerformanceMetrics {
    pub current_fps: f64,
    /// Whether `current_fps` was measured by the engine or estimated.
    pub measured: bool,
}

/// Estimated output rates used when the engine cannot report one.
const ESTIMATED_FPS_ENABLED: f64 = 60.0;
const ESTIMATED_FPS_DISABLED: f64 = 24.0;

struct Inner {
    state: PipelineState,
    preset: QualityPreset,
    /// The single live-artifact slot; exclusively owned here.
    live: Option<PipelineArtifact>,
    current: Option<PipelineParameters>,
    last_error: Option<String>,
}

/// Enables, disables, and swaps interpolation pipelines against the
/// playback engine.
pub struct InterpolationManager {
    compiler: PipelineCompiler,
    store: ArtifactStore,
    engine: Arc<dyn PlaybackEngine>,
    custom: Option<PipelineParameters>,
    auto_enable_on_load: bool,
    inner: Mutex<Inner>,
}

impl InterpolationManager {
    /// Build the manager and run the startup artifact sweep.
    pub fn new(
        config: InterpolationConfig,
        compiler: PipelineCompiler,
        store: ArtifactStore,
        engine: Arc<dyn PlaybackEngine>,
    ) -> Self {
        let swept = store.sweep(RETENTION, None);
        if swept > 0 {
            info!(swept, "Removed stale artifacts at startup");
        }
        Self {
            compiler,
            store,
            engine,
            custom: config.custom,
            auto_enable_on_load: config.auto_enable_on_load,
            inner: Mutex::new(Inner {
                state: PipelineState::Disabled,
                preset: config.preset,
                live: None,
                current: None,
                last_error: None,
            }),
        }
    }

    /// Enable interpolation with the remembered preset.
    ///
    /// Compiles a pipeline, persists the artifact, and attaches it to the
    /// engine before returning. Already enabled is a no-op. On any failure
    /// the partially created artifact is deleted, the state returns to
    /// `Disabled`, and the error is surfaced; playback keeps running.
    pub fn enable(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        self.enable_locked(&mut inner)
    }

    /// Disable interpolation, detaching and deleting the live artifact.
    /// Idempotent when already disabled.
    pub fn disable(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        self.disable_locked(&mut inner)
    }

    /// Change the quality preset.
    ///
    /// When disabled this only updates the remembered preset. When enabled
    /// the pipeline is disabled and re-enabled with the new preset as one
    /// logical operation; if the re-enable fails the manager ends in
    /// `Disabled` and does not restore the previous artifact.
    pub fn change_preset(&self, preset: QualityPreset) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.preset == preset {
            return Ok(());
        }
        inner.preset = preset;

        if inner.state == PipelineState::Enabled {
            info!(preset = %preset, "Re-applying pipeline for new preset");
            self.disable_locked(&mut inner)?;
            self.enable_locked(&mut inner)?;
        }
        Ok(())
    }

    /// Current state, parameters, and last error.
    pub fn status(&self) -> PipelineStatus {
        let inner = self.inner.lock();
        PipelineStatus {
            state: inner.state,
            preset: inner.preset,
            parameters: inner.current,
            last_error: inner.last_error.clone(),
        }
    }

    /// Output-rate metrics. A failed engine query (`<= 0.0`) degrades to
    /// an estimate, never to an error.
    pub fn metrics(&self) -> PerformanceMetrics {
        let enabled = self.inner.lock().state == PipelineState::Enabled;
        let measured_fps = self.engine.current_output_fps();
        if measured_fps > 0.0 {
            PerformanceMetrics {
                current_fps: measured_fps,
                measured: true,
            }
        } else {
            PerformanceMetrics {
                current_fps: if enabled {
                    ESTIMATED_FPS_ENABLED
                } else {
                    ESTIMATED_FPS_DISABLED
                },
                measured: false,
            }
        }
    }

    /// Sweep stale artifacts, skipping the live one. Returns how many
    /// files were removed.
    pub fn sweep_now(&self) -> usize {
        let keep = self.inner.lock().live.as_ref().map(|a| a.id);
        self.store.sweep(RETENTION, keep)
    }

    /// Subscribe to the engine's notification channel.
    pub fn engine_events(&self) -> Receiver<EngineEvent> {
        self.engine.subscribe()
    }

    pub fn auto_enable_on_load(&self) -> bool {
        self.auto_enable_on_load
    }

    /// Record an engine-side failure on the status surface.
    pub(crate) fn note_engine_failure(&self, message: String) {
        self.inner.lock().last_error = Some(message);
    }

    fn enable_locked(&self, inner: &mut Inner) -> Result<()> {
        match inner.state {
            PipelineState::Enabled => return Ok(()),
            PipelineState::Disabled => {}
            other => {
                return Err(FlowError::InvalidState {
                    operation: "enable",
                    state: other.as_str(),
                })
            }
        }

        inner.state = PipelineState::Enabling;
        info!(preset = %inner.preset, "Enabling interpolation");

        match self.build_and_attach(inner.preset) {
            Ok((artifact, parameters)) => {
                debug!(artifact = %artifact.id, "Live artifact recorded");
                inner.live = Some(artifact);
                inner.current = Some(parameters);
                inner.last_error = None;
                inner.state = PipelineState::Enabled;
                info!("Interpolation enabled");
                Ok(())
            }
            Err(e) => {
                inner.state = PipelineState::Disabled;
                inner.current = None;
                inner.last_error = Some(e.to_string());
                warn!(error = %e, "Enable failed; pipeline stays off");
                Err(e)
            }
        }
    }

    fn disable_locked(&self, inner: &mut Inner) -> Result<()> {
        match inner.state {
            PipelineState::Disabled => return Ok(()),
            PipelineState::Enabled => {}
            other => {
                return Err(FlowError::InvalidState {
                    operation: "disable",
                    state: other.as_str(),
                })
            }
        }

        inner.state = PipelineState::Disabling;
        info!("Disabling interpolation");

        let artifact = inner.live.take();
        let detach_result = self.engine.detach();

        // Storage is released on every exit path, detach errors included.
        if let Some(artifact) = &artifact {
            if let Err(e) = self.store.delete(artifact) {
                warn!(artifact = %artifact.id, error = %e, "Failed to delete artifact storage");
            }
        }
        inner.current = None;
        inner.state = PipelineState::Disabled;

        match detach_result {
            Ok(()) => {
                info!("Interpolation disabled");
                Ok(())
            }
            Err(e) => {
                inner.last_error = Some(e.to_string());
                warn!(error = %e, "Engine detach failed");
                Err(e)
            }
        }
    }

    /// Compile, persist, and attach. Releases the artifact storage when
    /// the engine rejects it.
    fn build_and_attach(
        &self,
        preset: QualityPreset,
    ) -> Result<(PipelineArtifact, PipelineParameters)> {
        let parameters = params::resolve(preset, self.custom.as_ref())?;
        let spec = self.compiler.compile(&parameters)?;
        let artifact = self.store.create(&spec)?;

        if let Err(e) = self.engine.attach(&artifact) {
            if let Err(del) = self.store.delete(&artifact) {
                warn!(artifact = %artifact.id, error = %del, "Rollback delete failed");
            }
            return Err(e);
        }
        Ok((artifact, parameters))
    }
}

/// Handle for the periodic artifact sweeper; stops the thread on drop.
pub struct SweeperHandle {
    stop: Option<crossbeam_channel::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Run the retention sweep every `interval`, independent of pipeline state.
pub fn spawn_sweeper(manager: Arc<InterpolationManager>, interval: Duration) -> SweeperHandle {
    let (stop_tx, stop_rx) = bounded::<()>(1);
    let thread = std::thread::spawn(move || {
        let ticker = crossbeam_channel::tick(interval);
        loop {
            select! {
                recv(ticker) -> _ => {
                    manager.sweep_now();
                }
                recv(stop_rx) -> _ => break,
            }
        }
    });

    SweeperHandle {
        stop: Some(stop_tx),
        thread: Some(thread),
    }
}
