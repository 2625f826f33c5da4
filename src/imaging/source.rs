//! Decoded rasters and encoded variants.
//!
//! - [`SourceImage`] is the decoded input: immutable RGBA pixels with known
//!   dimensions, owned by one pipeline run.
//! - [`RasterVariant`] is one resampled-and-encoded square at a given size,
//!   moved into the icon container or the artifact bundle exactly once.

use super::backend::BackendError;
use image::RgbaImage;

/// Decoded pixel raster. Width and height are always at least 1.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Result<Self, BackendError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidDimension(width.min(height)));
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// RGBA value at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// One square raster, PNG-encoded. `size` is both its width and height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterVariant {
    pub size: u32,
    pub bytes: Vec<u8>,
}
