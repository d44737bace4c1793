//! Synthesis backend discovery.
//!
//! The frame-synthesis model is a black box behind the artifact boundary;
//! compilation only needs to know that a model file exists in one of the
//! configured directories. Discovery is explicit configuration, never
//! PATH-style environment probing.

use frameflow_core::{FlowError, Result, SynthesisModel};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where model files are looked up and what happens when none is found.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Directories searched, in order, for the model file.
    pub model_dirs: Vec<PathBuf>,
    /// Compile the degraded temporal-blend pipeline when no model is
    /// discoverable, instead of failing.
    pub allow_blend_fallback: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model_dirs: default_model_dirs(),
            allow_blend_fallback: false,
        }
    }
}

/// Per-user model directory, e.g. `~/.local/share/frameflow/models`.
pub fn default_model_dirs() -> Vec<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("frameflow").join("models"))
        .into_iter()
        .collect()
}

/// A discovered synthesis backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisBackend {
    /// Model file found on disk.
    Model {
        model: SynthesisModel,
        path: PathBuf,
    },
    /// No model available; degraded temporal blend.
    TemporalBlend,
}

/// Look for `model` in the configured directories.
///
/// Fails with [`FlowError::Compilation`] when the model is not found and
/// blend fallback is disabled.
pub fn discover(config: &BackendConfig, model: SynthesisModel) -> Result<SynthesisBackend> {
    for dir in &config.model_dirs {
        let path = dir.join(model.filename());
        if path.is_file() {
            debug!(model = model.name(), path = %path.display(), "Synthesis model found");
            return Ok(SynthesisBackend::Model { model, path });
        }
    }

    if config.allow_blend_fallback {
        warn!(
            model = model.name(),
            "No synthesis model found; falling back to temporal blend"
        );
        return Ok(SynthesisBackend::TemporalBlend);
    }

    Err(FlowError::Compilation(format!(
        "synthesis model '{}' not found in {} configured director{}",
        model.name(),
        config.model_dirs.len(),
        if config.model_dirs.len() == 1 { "y" } else { "ies" }
    )))
}
