//! True-cadence detection and pulldown removal.
//!
//! Broadcast and streamed sources frequently arrive in a 60 fps or 30 fps
//! container that repeats or telecines a lower true cadence. Interpolating
//! the container rate directly would synthesize frames between duplicates
//! and stutter, so the compiled pipeline recovers the true cadence first.
//!
//! This module is the algorithm that runs inside the pipeline: it works on
//! the nominal metadata rate plus a short sample of decoded frames, and all
//! helpers are pure so the policy is testable without a player.

use frameflow_core::{FrameBuffer, FrameRate};
use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Frames closer than this (mean absolute luma difference) count as
/// duplicates of their predecessor.
const DUPLICATE_MAD_THRESHOLD: f32 = 0.01;

/// Duplicate search window, matching the 3:2 pulldown period.
const DECIMATE_CYCLE: usize = 5;

/// Offsets kept by the fixed-pattern fallback (3 of every 5 frames,
/// assuming 24 fps content in a 60 fps container).
pub const FALLBACK_OFFSETS: [usize; 3] = [0, 2, 4];

/// Samples shorter than this cannot support a duplicate search.
const MIN_SAMPLE_FRAMES: usize = 2 * DECIMATE_CYCLE;

/// Outcome of cadence detection for one stream.
///
/// Computed at pipeline-start time from live frame timing; recomputed when
/// the source changes, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceDecision {
    /// Container rate from stream metadata, as measured.
    pub nominal_fps: f64,
    /// The as-authored rate after duplicate/pulldown removal.
    pub true_rate: FrameRate,
    /// Output rate the synthesis stage should produce.
    pub target: FrameRate,
    /// Exact synthesis multiplier (e.g. 5/2 for 24→60).
    pub multiplier: Rational64,
    /// Whether duplicated/telecined frames were removed.
    pub pulldown_removed: bool,
    /// True when similarity comparison was unavailable and the documented
    /// fixed decimation pattern was assumed instead. Never an error;
    /// playback proceeds on the assumed cadence.
    pub fallback: bool,
}

impl fmt::Display for CadenceDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} fps container -> {} true -> {} (x{})",
            self.nominal_fps, self.true_rate, self.target, self.multiplier
        )
    }
}

/// Detect the true cadence of a stream.
///
/// `sample` is a short run of consecutive decoded frames used for
/// duplicate detection; `None` means frame-similarity comparison is
/// unavailable and the fixed-pattern fallback applies where relevant.
pub fn detect(nominal: FrameRate, sample: Option<&[FrameBuffer]>) -> CadenceDecision {
    let fps = nominal.to_fps_f64();
    let sample = usable_sample(sample);

    let (true_rate, pulldown_removed, fallback) = if fps > 59.0 && fps < 61.0 {
        match sample {
            Some(frames) => {
                // Halve 60 -> 30 first, then hunt for the remaining
                // telecine duplicates on the pulldown period.
                let halved = select_every(frames, 2, &[0]);
                let decimated =
                    remove_duplicates(&halved, DECIMATE_CYCLE, DUPLICATE_MAD_THRESHOLD);
                if decimated.len() < halved.len() {
                    info!(fps, "3:2 pulldown recovered from 60 fps container");
                    (FrameRate::FPS_23_976, true, false)
                } else {
                    debug!(fps, "No pulldown in 60 fps container; true rate 30");
                    (FrameRate::FPS_30, false, false)
                }
            }
            None => {
                warn!(
                    fps,
                    "Similarity comparison unavailable; assuming 24 fps content, \
                     decimating {:?} of every {}",
                    FALLBACK_OFFSETS,
                    DECIMATE_CYCLE
                );
                (FrameRate::FPS_23_976, true, true)
            }
        }
    } else if fps > 29.5 && fps < 30.5 {
        match sample {
            Some(frames) => {
                let decimated =
                    remove_duplicates(frames, DECIMATE_CYCLE, DUPLICATE_MAD_THRESHOLD);
                if decimated.len() < frames.len() {
                    info!(fps, "3:2 pulldown removed from 30 fps stream");
                    (FrameRate::FPS_23_976, true, false)
                } else {
                    (nominal, false, false)
                }
            }
            None => {
                debug!(fps, "Similarity comparison unavailable; retaining 30 fps");
                (nominal, false, true)
            }
        }
    } else {
        (nominal, false, false)
    };

    let (target, multiplier) = map_to_target(true_rate);
    CadenceDecision {
        nominal_fps: fps,
        true_rate,
        target,
        multiplier,
        pulldown_removed,
        fallback,
    }
}

/// Fixed mapping from true rate to (target rate, synthesis multiplier).
///
/// 23.976→60 (x5/2), 30→60 (x2), 25→50 (x2); anything else doubles to the
/// nearest integer target. Not configurable.
pub fn map_to_target(true_rate: FrameRate) -> (FrameRate, Rational64) {
    let fps = true_rate.to_fps_f64();
    if fps > 23.5 && fps < 24.5 {
        (FrameRate::FPS_60, Rational64::new(5, 2))
    } else if fps > 29.5 && fps < 30.5 {
        (FrameRate::FPS_60, Rational64::new(2, 1))
    } else if fps > 24.5 && fps < 25.5 {
        (FrameRate::FPS_50, Rational64::new(2, 1))
    } else {
        let target = (fps * 2.0).round().max(1.0) as u32;
        (FrameRate::new(target, 1), Rational64::new(2, 1))
    }
}

/// Keep the given offsets of every `cycle` frames.
pub fn select_every(frames: &[FrameBuffer], cycle: usize, offsets: &[usize]) -> Vec<FrameBuffer> {
    let mut out = Vec::with_capacity(frames.len() / cycle * offsets.len() + offsets.len());
    for chunk in frames.chunks(cycle) {
        for &offset in offsets {
            if let Some(frame) = chunk.get(offset) {
                out.push(frame.clone());
            }
        }
    }
    out
}

/// Drop at most one duplicate frame per `cycle`-frame window.
///
/// A frame is a duplicate when its luma difference to the predecessor falls
/// below `threshold`; the most similar frame in each window is removed.
/// Returns the input unchanged when the sample is too short to judge.
pub fn remove_duplicates(frames: &[FrameBuffer], cycle: usize, threshold: f32) -> Vec<FrameBuffer> {
    if frames.len() < cycle + 1 {
        return frames.to_vec();
    }

    let mut out = Vec::with_capacity(frames.len());
    out.push(frames[0].clone());

    let mut start = 1;
    while start < frames.len() {
        let end = (start + cycle).min(frames.len());

        let mut drop_at = None;
        let mut best = threshold;
        for i in start..end {
            if let Some(diff) = frames[i].mean_abs_diff(&frames[i - 1]) {
                if diff < best {
                    best = diff;
                    drop_at = Some(i);
                }
            }
        }

        for i in start..end {
            if Some(i) != drop_at {
                out.push(frames[i].clone());
            }
        }
        start = end;
    }
    out
}

fn usable_sample(sample: Option<&[FrameBuffer]>) -> Option<&[FrameBuffer]> {
    sample.filter(|frames| frames.len() >= MIN_SAMPLE_FRAMES)
}
