//! FrameFlow Runtime - pipeline orchestration
//!
//! Drives compiled pipeline artifacts against a live playback engine:
//! - The playback engine boundary (trait + event channel)
//! - The enable/disable/change-preset state machine with guaranteed
//!   artifact cleanup on every exit path
//! - The event bridge performing deferred auto-enable on source load
//! - A background sweeper for stale artifacts

pub mod engine;
pub mod events;
pub mod orchestrator;

pub use engine::{EngineEvent, LoggingEngine, PlaybackEngine};
pub use events::EventBridge;
pub use orchestrator::{
    spawn_sweeper, InterpolationManager, PerformanceMetrics, PipelineState, PipelineStatus,
    SweeperHandle,
};
