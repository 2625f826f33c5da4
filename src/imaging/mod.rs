//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Validate** | `infer` magic-byte sniffing (PNG only) |
//! | **Decode** | `image` PNG decoder → RGBA8 |
//! | **Resample** | `image::imageops::resize`, Lanczos3 by default |
//! | **Encode** | `image` PNG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure size policy (candidate list, eligibility, 256 wraparound)
//! - **Parameters**: Filter and compression settings
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Resample + encode one or many square variants

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
mod source;
pub mod validation;

pub use backend::{BackendError, ImageBackend};
pub use operations::{create_variant, create_variants};
pub use params::{EncodeParams, PngCompression, ResampleFilter};
pub use rust_backend::RustBackend;
pub use source::{RasterVariant, SourceImage};
