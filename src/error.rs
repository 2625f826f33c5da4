//! Run-level error taxonomy.
//!
//! Every failure a bundle run can end in is one [`BundleError`] variant. Lower
//! layers keep their own error enums where they wrap foreign errors
//! ([`BackendError`](crate::imaging::BackendError),
//! [`ArchiveError`](crate::archive::ArchiveError),
//! [`DescriptorError`](crate::descriptor::DescriptorError)) and are folded into
//! a category here at the pipeline boundary.
//!
//! The caller presents [`BundleError::category`] plus the `Display` message;
//! nothing is retried.

use crate::archive::ArchiveError;
use crate::descriptor::DescriptorError;
use crate::ico::IcoError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Unsupported file type: {0} (only PNG images are accepted)")]
    InvalidFileType(String),
    #[error("Image is too small: {width}x{height} (at least 16x16 is required)")]
    ImageTooSmall { width: u32, height: u32 },
    #[error("No icon size fits a {width}x{height} image")]
    NoEligibleSizes { width: u32, height: u32 },
    #[error("Invalid target dimension: {0}")]
    InvalidDimension(u32),
    #[error("PNG encoding failed at {size}px: {reason}")]
    Encode { size: u32, reason: String },
    #[error("Icon container encoding failed: {0}")]
    Container(#[from] IcoError),
    #[error("Descriptor fetch failed: {0}")]
    DescriptorFetch(#[from] DescriptorError),
    #[error("Packaging failed: {0}")]
    Packaging(#[from] ArchiveError),
    /// A sibling branch failed first and this one stopped early.
    #[error("Cancelled after another step failed")]
    Cancelled,
}

/// Stable category names for presenting a [`BundleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Decode,
    InvalidFileType,
    ImageTooSmall,
    NoEligibleSizes,
    InvalidDimension,
    Encode,
    DescriptorFetch,
    Packaging,
    Cancelled,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode-error",
            Self::InvalidFileType => "invalid-file-type",
            Self::ImageTooSmall => "image-too-small",
            Self::NoEligibleSizes => "no-eligible-sizes",
            Self::InvalidDimension => "invalid-dimension",
            Self::Encode => "encode-error",
            Self::DescriptorFetch => "descriptor-fetch-error",
            Self::Packaging => "packaging-error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BundleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode(_) => ErrorCategory::Decode,
            Self::InvalidFileType(_) => ErrorCategory::InvalidFileType,
            Self::ImageTooSmall { .. } => ErrorCategory::ImageTooSmall,
            Self::NoEligibleSizes { .. } => ErrorCategory::NoEligibleSizes,
            Self::InvalidDimension(_) => ErrorCategory::InvalidDimension,
            Self::Encode { .. } | Self::Container(_) => ErrorCategory::Encode,
            Self::DescriptorFetch(_) => ErrorCategory::DescriptorFetch,
            Self::Packaging(_) => ErrorCategory::Packaging,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
