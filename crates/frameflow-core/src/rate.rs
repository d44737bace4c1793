//! Frame rate representation.
//!
//! Rates are numerator/denominator pairs so NTSC rates (24000/1001)
//! stay exact through target-rate and multiplier math.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A frame rate as a rational number (e.g. 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// The rate as an exact rational.
    #[inline]
    pub fn as_rational(self) -> Rational64 {
        Rational64::new(self.numerator as i64, self.denominator as i64)
    }

    /// Duration of one frame in seconds.
    #[inline]
    pub fn frame_duration_secs(self) -> f64 {
        self.denominator as f64 / self.numerator as f64
    }

    /// Snap a measured fps value to the nearest well-known broadcast rate,
    /// or build an integer rate when nothing is close.
    ///
    /// Container timing jitters, so metadata rates like 23.98 or 59.9 must
    /// map onto their exact NTSC rationals before cadence math.
    pub fn from_measured_fps(fps: f64) -> Self {
        const KNOWN: [FrameRate; 8] = [
            FrameRate::FPS_23_976,
            FrameRate::FPS_24,
            FrameRate::FPS_25,
            FrameRate::FPS_29_97,
            FrameRate::FPS_30,
            FrameRate::FPS_50,
            FrameRate::FPS_59_94,
            FrameRate::FPS_60,
        ];
        for rate in KNOWN {
            if (fps - rate.to_fps_f64()).abs() < 0.05 {
                return rate;
            }
        }
        Self::new(fps.round().max(1.0) as u32, 1)
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
