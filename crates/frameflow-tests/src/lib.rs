//! Integration test crate for FrameFlow.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple frameflow crates to verify they work together.

#[cfg(test)]
mod cadence;

#[cfg(test)]
mod lifecycle;

#[cfg(test)]
mod pipeline;
