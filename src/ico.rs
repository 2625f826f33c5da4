//! Multi-image icon container (`favicon.ico`).
//!
//! ## Layout
//!
//! Little-endian throughout, PNG-compressed entries only:
//!
//! ```text
//! offset  size        field
//! 0       2           reserved = 0
//! 2       2           image type = 1 (icon)
//! 4       2           image count N
//! 6       16 × N      directory entries, largest size first
//! 6+16N   Σ dataSize  PNG payloads, in directory order
//! ```
//!
//! Each directory entry:
//!
//! ```text
//! 0   u8   width   (256 is stored as 0)
//! 1   u8   height  (256 is stored as 0)
//! 2   u8   palette colour count = 0
//! 3   u8   reserved = 0
//! 4   u16  colour planes = 0
//! 6   u16  bits per pixel = 0 (the PNG carries its own depth)
//! 8   u32  payload length
//! 12  u32  payload offset from start of file
//! ```
//!
//! The first payload starts right after the directory and each later one
//! starts where the previous ended, so the whole file is exactly
//! `6 + 16·N + Σ dataSize` bytes. Nothing time- or run-dependent is written:
//! the same variants always produce the same bytes.
//!
//! [`IconDir::parse`] reads a container back into its directory for
//! inspection and round-trip checks.

use crate::error::BundleError;
use crate::imaging::calculations::{
    ICON_CANDIDATE_SIZES, MAX_ICON_DIMENSION, is_below_minimum, select_icon_sizes, size_byte,
    size_from_byte,
};
use crate::imaging::{EncodeParams, ImageBackend, RasterVariant, SourceImage, create_variants};
use crate::pipeline::CancelSignal;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;
use std::io::{self, Cursor, Read, Write};
use thiserror::Error;

pub const HEADER_LEN: u32 = 6;
pub const DIR_ENTRY_LEN: u32 = 16;
pub const ICON_IMAGE_TYPE: u16 = 1;

#[derive(Error, Debug)]
pub enum IcoError {
    #[error("an icon needs at least one image")]
    Empty,
    #[error("too many images for one icon: {0}")]
    TooManyImages(usize),
    #[error("icon entries must be 1-256 pixels, got {0}")]
    InvalidSize(u32),
    #[error("icon data exceeds 4 GiB")]
    TooLarge,
    #[error("file is truncated")]
    Truncated,
    #[error("reserved header field is {0}, expected 0")]
    BadReserved(u16),
    #[error("image type is {0}, expected 1 (icon)")]
    BadType(u16),
    #[error("entry {index} points outside the file")]
    EntryOutOfBounds { index: usize },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One 16-byte row of the icon directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconDirEntry {
    pub width_byte: u8,
    pub height_byte: u8,
    pub palette_count: u8,
    pub reserved: u8,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
    pub data_size: u32,
    pub data_offset: u32,
}

impl IconDirEntry {
    fn for_png(size: u32, data_size: u32, data_offset: u32) -> Self {
        let byte = size_byte(size);
        Self {
            width_byte: byte,
            height_byte: byte,
            palette_count: 0,
            reserved: 0,
            color_planes: 0,
            bits_per_pixel: 0,
            data_size,
            data_offset,
        }
    }

    /// Width in pixels, with the 0 → 256 wraparound undone.
    pub fn width(&self) -> u32 {
        size_from_byte(self.width_byte)
    }

    pub fn height(&self) -> u32 {
        size_from_byte(self.height_byte)
    }

    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u8(self.width_byte)?;
        w.write_u8(self.height_byte)?;
        w.write_u8(self.palette_count)?;
        w.write_u8(self.reserved)?;
        w.write_u16::<LittleEndian>(self.color_planes)?;
        w.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        w.write_u32::<LittleEndian>(self.data_size)?;
        w.write_u32::<LittleEndian>(self.data_offset)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self {
            width_byte: r.read_u8()?,
            height_byte: r.read_u8()?,
            palette_count: r.read_u8()?,
            reserved: r.read_u8()?,
            color_planes: r.read_u16::<LittleEndian>()?,
            bits_per_pixel: r.read_u16::<LittleEndian>()?,
            data_size: r.read_u32::<LittleEndian>()?,
            data_offset: r.read_u32::<LittleEndian>()?,
        })
    }
}

/// Payload offsets: the first right after the directory, then cumulative.
fn data_offsets(data_sizes: &[u32]) -> Result<Vec<u32>, IcoError> {
    let count = u32::try_from(data_sizes.len()).map_err(|_| IcoError::TooLarge)?;
    let mut next = DIR_ENTRY_LEN
        .checked_mul(count)
        .and_then(|dir| dir.checked_add(HEADER_LEN))
        .ok_or(IcoError::TooLarge)?;
    let mut offsets = Vec::with_capacity(data_sizes.len());
    for &size in data_sizes {
        offsets.push(next);
        next = next.checked_add(size).ok_or(IcoError::TooLarge)?;
    }
    Ok(offsets)
}

/// Serialize PNG variants into one icon container, in the given order.
pub fn write_ico(variants: &[RasterVariant]) -> Result<Vec<u8>, IcoError> {
    if variants.is_empty() {
        return Err(IcoError::Empty);
    }
    let count =
        u16::try_from(variants.len()).map_err(|_| IcoError::TooManyImages(variants.len()))?;
    if let Some(bad) = variants
        .iter()
        .find(|v| v.size == 0 || v.size > MAX_ICON_DIMENSION)
    {
        return Err(IcoError::InvalidSize(bad.size));
    }

    let data_sizes = variants
        .iter()
        .map(|v| u32::try_from(v.bytes.len()).map_err(|_| IcoError::TooLarge))
        .collect::<Result<Vec<u32>, _>>()?;
    let offsets = data_offsets(&data_sizes)?;
    let total_len = offsets[offsets.len() - 1] as usize + data_sizes[data_sizes.len() - 1] as usize;

    let mut out = Vec::with_capacity(total_len);
    out.write_u16::<LittleEndian>(0)?;
    out.write_u16::<LittleEndian>(ICON_IMAGE_TYPE)?;
    out.write_u16::<LittleEndian>(count)?;

    for ((variant, &data_size), &offset) in variants.iter().zip(&data_sizes).zip(&offsets) {
        IconDirEntry::for_png(variant.size, data_size, offset).write_to(&mut out)?;
    }
    for variant in variants {
        out.write_all(&variant.bytes)?;
    }

    debug_assert_eq!(out.len(), total_len);
    Ok(out)
}

/// Parsed icon directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconDir {
    pub entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Parse the header and directory, checking each entry lies inside `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, IcoError> {
        let mut cursor = Cursor::new(bytes);
        let reserved = cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| IcoError::Truncated)?;
        if reserved != 0 {
            return Err(IcoError::BadReserved(reserved));
        }
        let image_type = cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| IcoError::Truncated)?;
        if image_type != ICON_IMAGE_TYPE {
            return Err(IcoError::BadType(image_type));
        }
        let count = cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| IcoError::Truncated)?;
        if count == 0 {
            return Err(IcoError::Empty);
        }

        let mut entries = Vec::with_capacity(count as usize);
        for index in 0..count as usize {
            let entry = IconDirEntry::read_from(&mut cursor).map_err(|_| IcoError::Truncated)?;
            let end = entry.data_offset as u64 + entry.data_size as u64;
            if end > bytes.len() as u64 {
                return Err(IcoError::EntryOutOfBounds { index });
            }
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Sizes in directory order.
    pub fn sizes(&self) -> Vec<u32> {
        self.entries.iter().map(IconDirEntry::width).collect()
    }

    /// Payload bytes of entry `index` within the container it was parsed from.
    pub fn image_data<'a>(&self, bytes: &'a [u8], index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = entry.data_offset as usize;
        bytes.get(start..start + entry.data_size as usize)
    }
}

/// Result of [`build_icon`]: the container and the sizes packed into it.
#[derive(Debug, Clone)]
pub struct EncodedIcon {
    pub sizes: Vec<u32>,
    pub bytes: Vec<u8>,
}

/// Size-selection policy for a source raster.
///
/// Rejects sources under 16 pixels on either side before looking at the
/// candidates, then keeps every candidate that fits.
pub fn eligible_sizes(source: (u32, u32)) -> Result<Vec<u32>, BundleError> {
    let (width, height) = source;
    if is_below_minimum(source) {
        return Err(BundleError::ImageTooSmall { width, height });
    }
    let sizes = select_icon_sizes(source, &ICON_CANDIDATE_SIZES);
    if sizes.is_empty() {
        return Err(BundleError::NoEligibleSizes { width, height });
    }
    Ok(sizes)
}

/// Resample, encode and pack every eligible size into one container.
pub fn build_icon(
    backend: &impl ImageBackend,
    source: &SourceImage,
    params: &EncodeParams,
    cancel: &CancelSignal,
) -> Result<EncodedIcon, BundleError> {
    let sizes = eligible_sizes(source.dimensions())?;
    let variants = create_variants(backend, source, &sizes, params, cancel)?;
    let bytes = write_ico(&variants)?;
    log::debug!(
        "packed {} sizes into icon container ({} bytes)",
        sizes.len(),
        bytes.len()
    );
    Ok(EncodedIcon { sizes, bytes })
}
