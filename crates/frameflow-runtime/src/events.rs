//! Bridges engine notifications onto the orchestrator.
//!
//! Engine callbacks never mutate pipeline state directly; they are
//! marshaled through a dedicated thread that calls into the manager, so
//! every transition still happens under the manager's lock.

use crate::engine::EngineEvent;
use crate::orchestrator::InterpolationManager;
use crossbeam_channel::{bounded, select, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Listens for engine events and drives deferred enable; stops the
/// bridge thread on drop.
pub struct EventBridge {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl EventBridge {
    pub fn spawn(manager: Arc<InterpolationManager>) -> Self {
        let events = manager.engine_events();
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let thread = std::thread::spawn(move || loop {
            select! {
                recv(events) -> event => match event {
                    Ok(EngineEvent::LoadStarted) => {
                        debug!("Source load started");
                    }
                    Ok(EngineEvent::LoadCompleted) => {
                        if manager.auto_enable_on_load() {
                            info!("Source loaded; enabling interpolation");
                            if let Err(e) = manager.enable() {
                                warn!(error = %e, "Deferred enable failed");
                            }
                        }
                    }
                    Ok(EngineEvent::LoadFailed(reason)) => {
                        warn!(reason = %reason, "Source load failed");
                        manager.note_engine_failure(reason);
                    }
                    // Engine dropped its side of the channel.
                    Err(_) => break,
                },
                recv(stop_rx) -> _ => break,
            }
        });

        Self {
            stop: Some(stop_tx),
            thread: Some(thread),
        }
    }

    /// Stop the bridge and wait for the thread to exit.
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

impl Drop for EventBridge {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
