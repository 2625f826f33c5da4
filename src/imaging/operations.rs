//! High-level image operations.
//!
//! These combine the size policy with backend execution: resample a source
//! to one square size and PNG-encode it, optionally for many sizes at once.

use super::backend::{BackendError, ImageBackend};
use super::params::EncodeParams;
use super::source::{RasterVariant, SourceImage};
use crate::error::BundleError;
use crate::pipeline::CancelSignal;
use rayon::prelude::*;

/// Resample `source` to `size`×`size` and encode it as PNG.
///
/// Checks `cancel` before each of the two expensive steps.
pub fn create_variant(
    backend: &impl ImageBackend,
    source: &SourceImage,
    size: u32,
    params: &EncodeParams,
    cancel: &CancelSignal,
) -> Result<RasterVariant, BundleError> {
    if size == 0 {
        return Err(BundleError::InvalidDimension(size));
    }
    cancel.check()?;
    let resampled = backend
        .resample(source, size, params.filter)
        .map_err(|e| backend_error(e, size))?;

    cancel.check()?;
    let bytes = backend
        .encode_png(&resampled, params.compression)
        .map_err(|e| backend_error(e, size))?;

    log::debug!("encoded {size}x{size} variant ({} bytes)", bytes.len());
    Ok(RasterVariant { size, bytes })
}

/// Create one variant per size in parallel. Output order follows `sizes`.
pub fn create_variants(
    backend: &impl ImageBackend,
    source: &SourceImage,
    sizes: &[u32],
    params: &EncodeParams,
    cancel: &CancelSignal,
) -> Result<Vec<RasterVariant>, BundleError> {
    sizes
        .par_iter()
        .map(|&size| create_variant(backend, source, size, params, cancel))
        .collect()
}

fn backend_error(err: BackendError, size: u32) -> BundleError {
    match err {
        BackendError::Decode(reason) => BundleError::Decode(reason),
        BackendError::InvalidDimension(d) => BundleError::InvalidDimension(d),
        BackendError::Encode(reason) => BundleError::Encode { size, reason },
    }
}
