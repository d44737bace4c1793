//! Artifact storage — one JSON file per compiled pipeline.
//!
//! Artifacts are content-addressed by id in a caller-supplied directory:
//!
//! ```text
//! {store-dir}/
//!   frameflow_{uuid}.json    # parameter-resolved pipeline description
//! ```
//!
//! The orchestrator owns the live artifact exclusively; everything else in
//! the directory is subject to the retention sweep.

use crate::graph::PipelineSpec;
use frameflow_core::{limits, FlowError, PipelineParameters, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unique artifact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A compiled pipeline persisted to backing storage.
///
/// Owned exclusively by the orchestrator while live; destroyed when
/// disabled, superseded, or swept past the retention window.
#[derive(Debug, Clone)]
pub struct PipelineArtifact {
    pub id: ArtifactId,
    /// Snapshot of the parameters the pipeline was compiled from.
    pub params: PipelineParameters,
    pub created_at: SystemTime,
    /// Backing file.
    pub path: PathBuf,
}

/// On-disk artifact document.
#[derive(Debug, Serialize, Deserialize)]
struct ArtifactDocument {
    id: ArtifactId,
    created_at: SystemTime,
    spec: PipelineSpec,
}

/// Default retention window for the sweep.
pub const RETENTION: Duration = Duration::from_secs(limits::ARTIFACT_RETENTION_SECS);

const FILE_PREFIX: &str = "frameflow_";

/// Directory-scoped artifact storage.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(id: ArtifactId) -> String {
        format!("{FILE_PREFIX}{id}.json")
    }

    /// Persist a compiled spec as a new artifact.
    pub fn create(&self, spec: &PipelineSpec) -> Result<PipelineArtifact> {
        std::fs::create_dir_all(&self.dir)?;

        let id = ArtifactId::generate();
        let created_at = SystemTime::now();
        let path = self.dir.join(Self::file_name(id));

        let doc = ArtifactDocument {
            id,
            created_at,
            spec: spec.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| FlowError::Serialization(format!("artifact {id}: {e}")))?;
        std::fs::write(&path, json)?;

        info!(artifact = %id, path = %path.display(), "Artifact written");
        Ok(PipelineArtifact {
            id,
            params: spec.params,
            created_at,
            path,
        })
    }

    /// Load an artifact's pipeline description back from storage.
    ///
    /// The file is self-contained: no context beyond the path is needed,
    /// which is what lets the playback engine execute it independently.
    pub fn load(&self, artifact: &PipelineArtifact) -> Result<PipelineSpec> {
        let json = std::fs::read_to_string(&artifact.path)?;
        let doc: ArtifactDocument = serde_json::from_str(&json)
            .map_err(|e| FlowError::Serialization(format!("artifact {}: {e}", artifact.id)))?;
        if doc.id != artifact.id {
            return Err(FlowError::Serialization(format!(
                "artifact id mismatch: file says {}, expected {}",
                doc.id, artifact.id
            )));
        }
        Ok(doc.spec)
    }

    /// Delete an artifact's backing storage. Missing files are fine; the
    /// sweep may have gotten there first.
    pub fn delete(&self, artifact: &PipelineArtifact) -> Result<()> {
        match std::fs::remove_file(&artifact.path) {
            Ok(()) => {
                debug!(artifact = %artifact.id, "Artifact storage released");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove artifacts older than `retention`, skipping the live one.
    ///
    /// Returns how many files were removed. Individual file errors are
    /// logged and skipped; the sweep itself never fails playback.
    pub fn sweep(&self, retention: Duration, keep: Option<ArtifactId>) -> usize {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return 0, // nothing persisted yet
        };

        let keep_name = keep.map(Self::file_name);
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) if n.starts_with(FILE_PREFIX) && n.ends_with(".json") => n.to_string(),
                _ => continue,
            };
            if keep_name.as_deref() == Some(name.as_str()) {
                continue;
            }

            let stale = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|mtime| now.duration_since(mtime).ok())
                .is_some_and(|age| age > retention);
            if !stale {
                continue;
            }

            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %path.display(), "Swept stale artifact");
                    removed += 1;
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to sweep artifact");
                }
            }
        }

        if removed > 0 {
            info!(removed, "Artifact sweep complete");
        }
        removed
    }
}
