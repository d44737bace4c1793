//! End-to-end cadence detection over synthetic frame sequences.

use frameflow_core::{FrameBuffer, FrameRate};
use frameflow_pipeline::cadence;
use num_rational::Rational64;

fn gray(luma: u8) -> FrameBuffer {
    FrameBuffer::solid_gray(64, 36, luma)
}

/// A 60 fps container holding telecined 24 fps film: each film frame
/// repeats in the 3-2-3-2 field pattern.
fn telecined_60(film_frames: usize) -> Vec<FrameBuffer> {
    let mut frames = Vec::new();
    for i in 0..film_frames {
        let luma = (i as u8).wrapping_mul(23);
        let repeats = if i % 2 == 0 { 3 } else { 2 };
        for _ in 0..repeats {
            frames.push(gray(luma));
        }
    }
    frames
}

/// A 30 fps stream with one telecine duplicate per 5-frame window.
fn telecined_30(windows: usize) -> Vec<FrameBuffer> {
    let mut frames = Vec::new();
    let mut luma = 0u8;
    for _ in 0..windows {
        frames.push(gray(luma));
        frames.push(gray(luma)); // the duplicate
        for _ in 0..3 {
            luma = luma.wrapping_add(29);
            frames.push(gray(luma));
        }
        luma = luma.wrapping_add(29);
    }
    frames
}

fn distinct_frames(count: usize) -> Vec<FrameBuffer> {
    (0..count).map(|i| gray((i as u8).wrapping_mul(31))).collect()
}

#[test]
fn test_telecined_60_recovers_film_rate() {
    let frames = telecined_60(8); // 20 container frames
    let decision = cadence::detect(FrameRate::FPS_59_94, Some(&frames));

    assert!(decision.pulldown_removed);
    assert!(!decision.fallback);
    assert_eq!(decision.true_rate, FrameRate::FPS_23_976);
    assert_eq!(decision.target, FrameRate::FPS_60);
    assert_eq!(decision.multiplier, Rational64::new(5, 2));
}

#[test]
fn test_telecined_30_recovers_film_rate() {
    let frames = telecined_30(3);
    let decision = cadence::detect(FrameRate::FPS_29_97, Some(&frames));

    assert!(decision.pulldown_removed);
    assert_eq!(decision.true_rate, FrameRate::FPS_23_976);
    assert_eq!(decision.target, FrameRate::FPS_60);
    assert_eq!(decision.multiplier, Rational64::new(5, 2));
}

#[test]
fn test_clean_30_doubles_to_60() {
    let frames = distinct_frames(20);
    let decision = cadence::detect(FrameRate::FPS_29_97, Some(&frames));

    assert!(!decision.pulldown_removed);
    assert_eq!(decision.true_rate, FrameRate::FPS_29_97);
    assert_eq!(decision.target, FrameRate::FPS_60);
    assert_eq!(decision.multiplier, Rational64::new(2, 1));
}

#[test]
fn test_pal_25_maps_to_50() {
    let decision = cadence::detect(FrameRate::FPS_25, None);

    assert!(!decision.pulldown_removed);
    assert!(!decision.fallback);
    assert_eq!(decision.target, FrameRate::FPS_50);
    assert_eq!(decision.multiplier, Rational64::new(2, 1));
}

#[test]
fn test_60_without_sample_uses_fixed_fallback() {
    let decision = cadence::detect(FrameRate::FPS_59_94, None);

    assert!(decision.fallback);
    assert!(decision.pulldown_removed);
    assert_eq!(decision.true_rate, FrameRate::FPS_23_976);
    assert_eq!(decision.target, FrameRate::FPS_60);
}

#[test]
fn test_unusual_rate_doubles() {
    let decision = cadence::detect(FrameRate::new(17, 1), None);

    assert_eq!(decision.true_rate, FrameRate::new(17, 1));
    assert_eq!(decision.target, FrameRate::new(34, 1));
    assert_eq!(decision.multiplier, Rational64::new(2, 1));
}
