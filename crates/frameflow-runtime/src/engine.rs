//! The playback engine boundary.
//!
//! The containing player (decode, render, transport) sits behind
//! [`PlaybackEngine`]. Engine notifications arrive on a channel
//! subscription rather than a polling tick; subscribers marshal them onto
//! the orchestrator before touching state.

use crossbeam_channel::{unbounded, Receiver, Sender};
use frameflow_core::Result;
use frameflow_pipeline::{ArtifactId, PipelineArtifact};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Notifications from the playback engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A new source started loading.
    LoadStarted,
    /// The source is fully loaded; deferred enable may run now.
    LoadCompleted,
    /// The source failed to load.
    LoadFailed(String),
}

/// What the core needs from the player.
pub trait PlaybackEngine: Send + Sync {
    /// Hand a compiled artifact to the engine. The artifact file is
    /// self-contained; the engine loads it without further context.
    fn attach(&self, artifact: &PipelineArtifact) -> Result<()>;

    /// Remove the currently attached artifact. Detaching with nothing
    /// attached is a no-op.
    fn detach(&self) -> Result<()>;

    /// Measured output frame rate. `<= 0.0` means the query failed and
    /// the value is unknown; callers must never treat that as an error.
    fn current_output_fps(&self) -> f64;

    /// Subscribe to engine notifications.
    fn subscribe(&self) -> Receiver<EngineEvent>;
}

/// Engine stub that accepts artifacts and logs.
///
/// Used by the demo binary and as the default engine when no real player
/// is wired up; it reports no measured frame rate.
#[derive(Default)]
pub struct LoggingEngine {
    attached: Mutex<Option<ArtifactId>>,
    subscribers: Mutex<Vec<Sender<EngineEvent>>>,
}

impl LoggingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast an event to all subscribers, e.g. from the player's
    /// load path.
    pub fn emit(&self, event: EngineEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Id of the currently attached artifact, if any.
    pub fn attached(&self) -> Option<ArtifactId> {
        *self.attached.lock()
    }
}

impl PlaybackEngine for LoggingEngine {
    fn attach(&self, artifact: &PipelineArtifact) -> Result<()> {
        info!(artifact = %artifact.id, path = %artifact.path.display(), "Engine: pipeline attached");
        *self.attached.lock() = Some(artifact.id);
        Ok(())
    }

    fn detach(&self) -> Result<()> {
        if let Some(id) = self.attached.lock().take() {
            info!(artifact = %id, "Engine: pipeline detached");
        } else {
            debug!("Engine: detach with nothing attached");
        }
        Ok(())
    }

    fn current_output_fps(&self) -> f64 {
        0.0 // unknown
    }

    fn subscribe(&self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_engine_tracks_attachment() {
        let engine = LoggingEngine::new();
        assert_eq!(engine.attached(), None);
        engine.detach().unwrap(); // no-op with nothing attached
        assert_eq!(engine.current_output_fps(), 0.0);
    }

    #[test]
    fn test_subscribe_receives_events() {
        let engine = LoggingEngine::new();
        let rx = engine.subscribe();
        engine.emit(EngineEvent::LoadStarted);
        engine.emit(EngineEvent::LoadCompleted);
        assert_eq!(rx.recv().unwrap(), EngineEvent::LoadStarted);
        assert_eq!(rx.recv().unwrap(), EngineEvent::LoadCompleted);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let engine = LoggingEngine::new();
        let rx = engine.subscribe();
        drop(rx);
        // Must not fail or grow the subscriber list forever.
        engine.emit(EngineEvent::LoadCompleted);
        assert!(engine.subscribers.lock().is_empty());
    }
}
