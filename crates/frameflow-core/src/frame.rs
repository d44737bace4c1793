//! CPU frame buffers used by cadence analysis.
//!
//! The interpolation graph itself is declarative; the only in-process pixel
//! work is frame-to-frame similarity during cadence detection, so buffers
//! stay deliberately small: one packed plane, Gray8 or RGBA8.

use serde::{Deserialize, Serialize};

/// Pixel format of a [`FrameBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit luma only, 1 byte per pixel. Preferred for similarity math.
    #[default]
    Gray8,
    /// 8-bit RGBA, 4 bytes per pixel.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgba8 => 4,
        }
    }
}

/// A single-plane video frame in CPU memory.
///
/// Rows are stride-aligned to 64 bytes so buffers coming out of a decoder
/// can be wrapped without repacking.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    /// Bytes per row, including padding.
    pub stride: usize,
    pub data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a zero-filled frame buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let min_stride = width as usize * format.bytes_per_pixel();
        let stride = (min_stride + 63) & !63;
        Self {
            format,
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
        }
    }

    /// Create a Gray8 frame filled with a single luma value.
    pub fn solid_gray(width: u32, height: u32, luma: u8) -> Self {
        let mut frame = Self::new(width, height, PixelFormat::Gray8);
        for y in 0..height {
            frame.row_mut(y).fill(luma);
        }
        frame
    }

    /// Pixel row without stride padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.format.bytes_per_pixel();
        &self.data[start..end]
    }

    /// Mutable pixel row without stride padding.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.format.bytes_per_pixel();
        &mut self.data[start..end]
    }

    /// Mean absolute luma difference against another frame, in `[0.0, 1.0]`.
    ///
    /// For RGBA8 frames only the first three channels are compared.
    /// Returns `None` when dimensions or formats differ.
    pub fn mean_abs_diff(&self, other: &Self) -> Option<f32> {
        if self.width != other.width
            || self.height != other.height
            || self.format != other.format
        {
            return None;
        }
        if self.width == 0 || self.height == 0 {
            return Some(0.0);
        }

        let channels = match self.format {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgba8 => 3, // skip alpha
        };
        let bpp = self.format.bytes_per_pixel();

        let mut total: f64 = 0.0;
        for y in 0..self.height {
            let a = self.row(y);
            let b = other.row(y);
            for x in 0..self.width as usize {
                let base = x * bpp;
                for c in 0..channels {
                    total += (a[base + c] as f64 - b[base + c] as f64).abs();
                }
            }
        }

        let samples = self.width as f64 * self.height as f64 * channels as f64;
        Some((total / (samples * 255.0)) as f32)
    }
}
