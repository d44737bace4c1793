//! FrameFlow Pipeline - compilation of interpolation pipelines
//!
//! Turns resolved parameters into a declarative, parameter-complete stage
//! graph, persists it as an artifact the playback engine can load on its
//! own, and provides the cadence-detection algorithm that runs inside the
//! compiled pipeline:
//! - Cadence detection with pulldown removal
//! - Synthesis backend discovery
//! - Stage graph construction and validation
//! - Artifact storage with a retention sweep

pub mod artifact;
pub mod backend;
pub mod cadence;
pub mod compiler;
pub mod graph;

pub use artifact::{ArtifactId, ArtifactStore, PipelineArtifact};
pub use backend::{discover, BackendConfig, SynthesisBackend};
pub use cadence::CadenceDecision;
pub use compiler::{CompilerConfig, PipelineCompiler};
pub use graph::{ColorFormat, PipelineSpec, PipelineStage};
