//! Input type check at the pipeline boundary.
//!
//! Only PNG input is accepted. The type is sniffed from magic bytes with
//! `infer`; recognised non-PNG content is an [`InvalidFileType`], anything
//! unrecognised is left for the decoder to reject as [`Decode`].
//!
//! [`InvalidFileType`]: crate::BundleError::InvalidFileType
//! [`Decode`]: crate::BundleError::Decode

use crate::error::BundleError;

pub const ACCEPTED_MIME: &str = "image/png";

pub fn validate_input(bytes: &[u8]) -> Result<(), BundleError> {
    if bytes.is_empty() {
        return Err(BundleError::Decode("input is empty".to_string()));
    }
    match infer::get(bytes) {
        Some(kind) if kind.mime_type() == ACCEPTED_MIME => Ok(()),
        Some(kind) => Err(BundleError::InvalidFileType(kind.mime_type().to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F', 0];
    const GIF_MAGIC: &[u8] = b"GIF89a\x01\x00\x01\x00";

    #[test]
    fn png_signature_passes() {
        assert!(validate_input(PNG_MAGIC).is_ok());
    }

    #[test]
    fn jpeg_is_wrong_type() {
        let err = validate_input(JPEG_MAGIC).unwrap_err();
        assert!(matches!(err, BundleError::InvalidFileType(ref m) if m == "image/jpeg"));
    }

    #[test]
    fn gif_is_wrong_type() {
        assert!(matches!(
            validate_input(GIF_MAGIC),
            Err(BundleError::InvalidFileType(_))
        ));
    }

    #[test]
    fn zip_is_wrong_type() {
        let zip_magic = b"PK\x03\x04\x14\x00\x00\x00\x08\x00";
        assert!(matches!(
            validate_input(zip_magic),
            Err(BundleError::InvalidFileType(_))
        ));
    }

    #[test]
    fn unknown_bytes_are_left_to_decoder() {
        assert!(validate_input(b"\x00\x01\x02 not anything").is_ok());
    }

    #[test]
    fn empty_input_is_decode_error() {
        assert!(matches!(validate_input(&[]), Err(BundleError::Decode(_))));
    }
}
