//! Artifact packaging.
//!
//! Collects the four produced files under fixed names, in a fixed order:
//!
//! ```text
//! favicon.ico     multi-size icon container
//! 192.png         standalone 192×192 PNG
//! 512.png         standalone 512×512 PNG
//! manifest.json   descriptor, verbatim
//! ```
//!
//! Archive serialization is handed to an [`ArchiveWriter`].

use crate::archive::ArchiveWriter;
use crate::error::BundleError;

pub const ICON_FILENAME: &str = "favicon.ico";
pub const PNG_192_FILENAME: &str = "192.png";
pub const PNG_512_FILENAME: &str = "512.png";
pub const DESCRIPTOR_FILENAME: &str = "manifest.json";

/// Standalone PNG sizes, produced regardless of source dimensions.
pub const STANDALONE_PNG_SIZES: [u32; 2] = [192, 512];

/// The four buffers a successful run produces.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub icon: Vec<u8>,
    pub png192: Vec<u8>,
    pub png512: Vec<u8>,
    pub descriptor: Vec<u8>,
}

/// Filename → bytes, always exactly the four fixed entries in order.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    entries: [(&'static str, Vec<u8>); 4],
}

pub fn package(artifacts: Artifacts) -> ArtifactBundle {
    let Artifacts {
        icon,
        png192,
        png512,
        descriptor,
    } = artifacts;
    ArtifactBundle {
        entries: [
            (ICON_FILENAME, icon),
            (PNG_192_FILENAME, png192),
            (PNG_512_FILENAME, png512),
            (DESCRIPTOR_FILENAME, descriptor),
        ],
    }
}

impl ArtifactBundle {
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[u8])> {
        self.entries.iter().map(|(n, b)| (*n, b.as_slice()))
    }

    pub fn total_bytes(&self) -> usize {
        self.entries.iter().map(|(_, b)| b.len()).sum()
    }

    /// Serialize through the archive service.
    pub fn to_archive(&self, writer: &dyn ArchiveWriter) -> Result<Vec<u8>, BundleError> {
        let entries: Vec<(&str, &[u8])> = self.iter().collect();
        Ok(writer.write_archive(&entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveError;

    fn sample() -> ArtifactBundle {
        package(Artifacts {
            icon: vec![1],
            png192: vec![2, 2],
            png512: vec![3, 3, 3],
            descriptor: b"{}".to_vec(),
        })
    }

    #[test]
    fn fixed_names_in_fixed_order() {
        assert_eq!(
            sample().names(),
            vec!["favicon.ico", "192.png", "512.png", "manifest.json"]
        );
    }

    #[test]
    fn lookup_by_name() {
        let bundle = sample();
        assert_eq!(bundle.get("512.png"), Some(&[3u8, 3, 3][..]));
        assert_eq!(bundle.get("manifest.json"), Some(&b"{}"[..]));
        assert_eq!(bundle.get("apple-touch-icon.png"), None);
        assert_eq!(bundle.total_bytes(), 8);
    }

    struct BrokenWriter;

    impl ArchiveWriter for BrokenWriter {
        fn write_archive(&self, _entries: &[(&str, &[u8])]) -> Result<Vec<u8>, ArchiveError> {
            Err(ArchiveError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn archive_failure_is_packaging_error() {
        let err = sample().to_archive(&BrokenWriter).unwrap_err();
        assert!(matches!(err, BundleError::Packaging(_)));
    }
}
