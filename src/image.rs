//! Frame buffers exchanged with the host.
//!
//! This module provides:
//!
//! - The [`Image`] type, an owned RGB image in the host's texture byte layout.
//! - [`Resolution`], a width/height pair.
//! - The [`draw`] submodule with primitives to visualize landmarks.

pub mod draw;

use std::fmt;

use image::{ImageBuffer, RgbImage};

pub use draw::Color;

/// Width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An 8-bit sRGB image.
///
/// The internal representation matches the byte layout the host renderer expects for its RGB8
/// textures, so [`Image::data`] can be uploaded without conversion.
#[derive(Clone)]
pub struct Image {
    pub(crate) buf: RgbImage,
}

impl Image {
    /// Creates an image of a specified size.
    ///
    /// The image will start out black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    /// Creates the 0x0 placeholder image handed to the host when no frame is available.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Wraps raw RGB8 pixel data.
    ///
    /// # Panics
    ///
    /// This will panic if `buf`'s size does not match the resolution.
    pub fn from_rgb8(res: Resolution, buf: &[u8]) -> Self {
        let expected_size = res.width() as usize * res.height() as usize * 3;
        assert_eq!(
            expected_size,
            buf.len(),
            "incorrect buffer size {} for {} image (expected {} bytes)",
            buf.len(),
            res,
            expected_size,
        );

        Self {
            buf: ImageBuffer::from_vec(res.width(), res.height(), buf.to_vec())
                .expect("buffer size does not match image resolution"),
        }
    }

    /// Returns the width of this image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the size of this image.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns the raw RGB8 pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        self.buf.as_raw()
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    #[cfg(test)]
    pub(crate) fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf[(x, y)].0)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({})", self.resolution())
    }
}
