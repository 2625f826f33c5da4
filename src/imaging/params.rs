//! Parameter types for image operations.
//!
//! These describe *what* to do, not *how*. They are the interface between
//! [`operations`](super::operations) (which decides which variants to make)
//! and the [`backend`](super::backend) (which does the pixel work), so a mock
//! backend can stand in during tests.
//!
//! ## Types
//!
//! - [`ResampleFilter`]: Interpolation kernel for square resampling. Nearest-neighbour
//!   is not representable.
//! - [`PngCompression`]: zlib effort for the PNG encoder.
//! - [`EncodeParams`]: Filter + compression, shared by every variant in a run.

use image::codecs::png::CompressionType;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Smoothing interpolation used when resampling to a square target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    #[default]
    Lanczos3,
    CatmullRom,
    Gaussian,
    Triangle,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Lanczos3 => FilterType::Lanczos3,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Triangle => FilterType::Triangle,
        }
    }
}

/// PNG compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl PngCompression {
    pub fn compression_type(self) -> CompressionType {
        match self {
            Self::Fast => CompressionType::Fast,
            Self::Default => CompressionType::Default,
            Self::Best => CompressionType::Best,
        }
    }
}

/// Settings applied to every resample + encode in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeParams {
    pub filter: ResampleFilter,
    pub compression: PngCompression,
}
