//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the bundle needs:
//! decode, resample, and PNG encode. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests swap in a
//! recording mock so pipeline logic runs without real pixel work.

use super::params::{PngCompression, ResampleFilter};
use super::source::SourceImage;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Invalid dimension: {0}")]
    InvalidDimension(u32),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared across rayon branches.
pub trait ImageBackend: Sync {
    /// Decode PNG bytes into an RGBA raster.
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError>;

    /// Resample to a `size`×`size` square, discarding the source aspect ratio.
    fn resample(
        &self,
        source: &SourceImage,
        size: u32,
        filter: ResampleFilter,
    ) -> Result<RgbaImage, BackendError>;

    /// Serialize a raster as PNG bytes.
    fn encode_png(
        &self,
        image: &RgbaImage,
        compression: PngCompression,
    ) -> Result<Vec<u8>, BackendError>;
}
