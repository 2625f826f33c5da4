//! Pure size-policy functions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Square sizes packed into `favicon.ico`, largest first.
pub const ICON_CANDIDATE_SIZES: [u32; 6] = [256, 128, 64, 48, 32, 16];

/// Sources narrower or shorter than this are rejected outright.
pub const MIN_SOURCE_DIMENSION: u32 = 16;

/// Largest dimension an icon directory entry can describe.
pub const MAX_ICON_DIMENSION: u32 = 256;

/// Keep the candidates that fit inside the source without upscaling.
///
/// Candidate order is preserved.
///
/// # Examples
/// ```
/// # use simple_favicon::imaging::calculations::{select_icon_sizes, ICON_CANDIDATE_SIZES};
/// assert_eq!(select_icon_sizes((100, 50), &ICON_CANDIDATE_SIZES), vec![48, 32, 16]);
/// ```
pub fn select_icon_sizes(source: (u32, u32), candidates: &[u32]) -> Vec<u32> {
    let (width, height) = source;
    candidates
        .iter()
        .copied()
        .filter(|&s| s <= width && s <= height)
        .collect()
}

/// Whether either source dimension is below [`MIN_SOURCE_DIMENSION`].
pub fn is_below_minimum(source: (u32, u32)) -> bool {
    source.0 < MIN_SOURCE_DIMENSION || source.1 < MIN_SOURCE_DIMENSION
}

/// Encode a dimension in a single directory byte: 256 wraps to 0.
///
/// Callers must pass 1..=256.
pub fn size_byte(size: u32) -> u8 {
    debug_assert!((1..=MAX_ICON_DIMENSION).contains(&size));
    if size == MAX_ICON_DIMENSION {
        0
    } else {
        size as u8
    }
}

/// Inverse of [`size_byte`].
pub fn size_from_byte(byte: u8) -> u32 {
    if byte == 0 {
        MAX_ICON_DIMENSION
    } else {
        byte as u32
    }
}
