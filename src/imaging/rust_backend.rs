//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG) | `image::load_from_memory_with_format` |
//! | Resample | `image::imageops::resize`, exact square, default `Lanczos3` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (adaptive row filter) |

use super::backend::{BackendError, ImageBackend};
use super::params::{PngCompression, ResampleFilter};
use super::source::SourceImage;
use image::codecs::png::{FilterType as PngRowFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        SourceImage::new(decoded.to_rgba8())
    }

    fn resample(
        &self,
        source: &SourceImage,
        size: u32,
        filter: ResampleFilter,
    ) -> Result<RgbaImage, BackendError> {
        if size == 0 {
            return Err(BackendError::InvalidDimension(size));
        }
        // resize (not resize_exact on DynamicImage) keeps us in RGBA8 throughout
        Ok(image::imageops::resize(
            source.as_rgba(),
            size,
            size,
            filter.filter_type(),
        ))
    }

    fn encode_png(
        &self,
        image: &RgbaImage,
        compression: PngCompression,
    ) -> Result<Vec<u8>, BackendError> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut buffer,
            compression.compression_type(),
            PngRowFilter::Adaptive,
        );
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Encode a gradient test raster as PNG bytes.
    fn create_test_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        RustBackend::new()
            .encode_png(&img, PngCompression::Fast)
            .unwrap()
    }

    #[test]
    fn decode_synthetic_png() {
        let bytes = create_test_png(40, 30);
        let source = RustBackend::new().decode(&bytes).unwrap();
        assert_eq!(source.dimensions(), (40, 30));
        assert_eq!(source.pixel(5, 7), Some([5, 7, 128, 255]));
    }

    #[test]
    fn decode_garbage_errors() {
        let result = RustBackend::new().decode(b"definitely not a png");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_truncated_png_errors() {
        let mut bytes = create_test_png(64, 64);
        bytes.truncate(bytes.len() / 2);
        assert!(RustBackend::new().decode(&bytes).is_err());
    }

    #[test]
    fn resample_landscape_to_square() {
        let backend = RustBackend::new();
        let source = backend.decode(&create_test_png(300, 100)).unwrap();
        let out = backend
            .resample(&source, 48, ResampleFilter::Lanczos3)
            .unwrap();
        assert_eq!(out.dimensions(), (48, 48));
    }

    #[test]
    fn resample_upscales_without_error() {
        let backend = RustBackend::new();
        let source = backend.decode(&create_test_png(20, 20)).unwrap();
        let out = backend
            .resample(&source, 192, ResampleFilter::CatmullRom)
            .unwrap();
        assert_eq!(out.dimensions(), (192, 192));
    }

    #[test]
    fn resample_zero_is_invalid() {
        let backend = RustBackend::new();
        let source = backend.decode(&create_test_png(20, 20)).unwrap();
        let result = backend.resample(&source, 0, ResampleFilter::Lanczos3);
        assert!(matches!(result, Err(BackendError::InvalidDimension(0))));
    }

    #[test]
    fn encoded_png_decodes_to_same_dimensions() {
        let backend = RustBackend::new();
        let png = backend
            .encode_png(&RgbaImage::new(33, 17), PngCompression::Best)
            .unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
        let (w, h) = image::load_from_memory(&png).unwrap().to_rgba8().dimensions();
        assert_eq!((w, h), (33, 17));
    }

    #[test]
    fn encoding_is_deterministic() {
        let backend = RustBackend::new();
        let source = backend.decode(&create_test_png(100, 80)).unwrap();
        let a = backend
            .resample(&source, 64, ResampleFilter::Lanczos3)
            .unwrap();
        let b = backend
            .resample(&source, 64, ResampleFilter::Lanczos3)
            .unwrap();
        assert_eq!(
            backend.encode_png(&a, PngCompression::Default).unwrap(),
            backend.encode_png(&b, PngCompression::Default).unwrap()
        );
    }
}
