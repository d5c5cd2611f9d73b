//! Pixel buffer exchanged with the frame orchestrator.
//!
//! [`Image`] is a row-major, interleaved `f32` buffer tagged with a
//! [`ColorSpace`]. The first three channels are RGB; a fourth channel, when
//! present, is carried through untouched.
//!
//! # Invariants
//!
//! Checked by [`Image::validate`] at every domain-conversion boundary:
//!
//! - width, height > 0 and channels is 3 or 4
//! - `data.len() == width * height * channels`
//! - every element is finite
//!
//! # Usage
//!
//! ```rust
//! use cph_core::{ColorSpace, Image};
//!
//! let mut img = Image::new(4, 2, 3, ColorSpace::Bt2020Pq)?;
//! img.set_rgb(1, 1, [0.5, 0.25, 0.1]);
//! assert_eq!(img.rgb(1, 1), [0.5, 0.25, 0.1]);
//! assert!(img.validate().is_ok());
//! # Ok::<(), cph_core::CoreError>(())
//! ```

use crate::{ColorSpace, CoreError, Result};

/// Interleaved float image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
    /// Color space of the stored values.
    pub color_space: ColorSpace,
}

impl Image {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize, channels: usize, color_space: ColorSpace) -> Result<Self> {
        check_dims(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
            color_space,
        })
    }

    /// Wraps an existing buffer, checking its shape (not its content).
    pub fn from_vec(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
        color_space: ColorSpace,
    ) -> Result<Self> {
        check_dims(width, height, channels)?;
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(CoreError::BufferSize { expected, actual: data.len() });
        }
        Ok(Self { width, height, channels, data, color_space })
    }

    /// An image of the same shape and tag, filled with zeros.
    pub fn zeros_like(&self, color_space: ColorSpace) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: vec![0.0; self.data.len()],
            color_space,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `width * height`.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Flat element slice.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable flat element slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the image, returning its buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Element stride of one row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width * self.channels
    }

    /// RGB at `(x, y)`. Panics if out of bounds.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [f32; 3] {
        let i = (y * self.width + x) * self.channels;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Writes RGB at `(x, y)`. Panics if out of bounds.
    #[inline]
    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        let i = (y * self.width + x) * self.channels;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Iterator over per-pixel channel slices.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.channels)
    }

    /// Mutable iterator over per-pixel channel slices.
    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        self.data.chunks_exact_mut(self.channels)
    }

    /// Checks every invariant, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        check_dims(self.width, self.height, self.channels)?;
        let expected = self.width * self.height * self.channels;
        if self.data.len() != expected {
            return Err(CoreError::BufferSize { expected, actual: self.data.len() });
        }
        match self.data.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(CoreError::NonFinite { index }),
            None => Ok(()),
        }
    }

    /// True if [`validate`](Self::validate) passes.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn check_dims(width: usize, height: usize, channels: usize) -> Result<()> {
    if width == 0 || height == 0 || !(3..=4).contains(&channels) {
        return Err(CoreError::InvalidDimensions { width, height, channels });
    }
    Ok(())
}
