//! FrameFlow GPU - hardware capability detection
//!
//! Probes the available accelerators through wgpu, classifies the device
//! into a capability tier, and recommends default pipeline parameters for
//! that tier. The probe is read-only; detection failure degrades to the
//! lowest tier instead of blocking playback.

pub mod detect;
pub mod tier;

pub use detect::{DetectorConfig, HardwareDetector, HardwareProfile};
pub use tier::{classify_tier, recommended_parameters, GpuTier, GpuVendor};
