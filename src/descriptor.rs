//! Descriptor (`manifest.json`) retrieval.
//!
//! The descriptor is static content copied into the bundle verbatim. Where it
//! comes from is a [`DescriptorSource`]:
//!
//! - [`StaticDescriptor`]: the embedded default web app manifest
//! - [`FileDescriptor`]: a file on disk
//! - `HttpDescriptor`: an HTTP GET, behind the `http` cargo feature
//!
//! Any failure, including a non-success HTTP status, ends the run.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The default manifest shipped with the crate.
pub const DEFAULT_MANIFEST: &[u8] = include_bytes!("../assets/manifest.json");

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
}

/// Where the bundle's `manifest.json` comes from.
pub trait DescriptorSource: Sync {
    fn fetch(&self) -> Result<Vec<u8>, DescriptorError>;

    /// Short human-readable origin, for progress output.
    fn describe(&self) -> String;
}

/// In-memory descriptor, by default the embedded manifest.
pub struct StaticDescriptor {
    bytes: Cow<'static, [u8]>,
}

impl StaticDescriptor {
    pub fn new(bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl Default for StaticDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST)
    }
}

impl DescriptorSource for StaticDescriptor {
    fn fetch(&self) -> Result<Vec<u8>, DescriptorError> {
        Ok(self.bytes.to_vec())
    }

    fn describe(&self) -> String {
        "built-in manifest".to_string()
    }
}

pub struct FileDescriptor {
    path: PathBuf,
}

impl FileDescriptor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DescriptorSource for FileDescriptor {
    fn fetch(&self) -> Result<Vec<u8>, DescriptorError> {
        Ok(std::fs::read(&self.path)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(feature = "http")]
pub use http::HttpDescriptor;

#[cfg(feature = "http")]
mod http {
    use super::{DescriptorError, DescriptorSource};
    use std::time::Duration;

    /// Blocking GET of a descriptor URL.
    pub struct HttpDescriptor {
        url: String,
        timeout: Duration,
    }

    impl HttpDescriptor {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                timeout: Duration::from_secs(30),
            }
        }

        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }
    }

    impl DescriptorSource for HttpDescriptor {
        fn fetch(&self) -> Result<Vec<u8>, DescriptorError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| DescriptorError::Request(e.to_string()))?;
            let response = client
                .get(&self.url)
                .send()
                .map_err(|e| DescriptorError::Request(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(DescriptorError::Status(status.as_u16()));
            }
            let body = response
                .bytes()
                .map_err(|e| DescriptorError::Request(e.to_string()))?;
            Ok(body.to_vec())
        }

        fn describe(&self) -> String {
            self.url.clone()
        }
    }
}
