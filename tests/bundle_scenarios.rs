//! End-to-end bundle runs through the public API with the real image backend.
//!
//! Sources are synthetic gradients encoded to PNG in memory, so no fixture
//! files are needed.

use image::RgbaImage;
use simple_favicon::descriptor::{DescriptorError, DescriptorSource, FileDescriptor};
use simple_favicon::ico::IconDir;
use simple_favicon::imaging::{ImageBackend, PngCompression};
use simple_favicon::{BundleError, ErrorCategory, Pipeline, PipelineEvent, RunState, RustBackend};
use std::io::{Cursor, Read};
use std::sync::mpsc;

fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    RustBackend::new()
        .encode_png(&pixels, PngCompression::Fast)
        .unwrap()
}

fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let decoded = RustBackend::new().decode(bytes).unwrap();
    decoded.dimensions()
}

fn zip_entries(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            (file.name().to_string(), contents)
        })
        .collect()
}

struct UnreachableDescriptor;

impl DescriptorSource for UnreachableDescriptor {
    fn fetch(&self) -> Result<Vec<u8>, DescriptorError> {
        Err(DescriptorError::Status(404))
    }

    fn describe(&self) -> String {
        "https://example.invalid/manifest.json".to_string()
    }
}

// =========================================================================
// Successful runs
// =========================================================================

#[test]
fn large_square_source_fills_every_size() {
    let output = Pipeline::new(RustBackend::new())
        .run(&gradient_png(512, 512))
        .unwrap();

    let entries = zip_entries(&output.archive);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec!["favicon.ico", "192.png", "512.png", "manifest.json"]
    );

    let icon = &entries[0].1;
    let dir = IconDir::parse(icon).unwrap();
    assert_eq!(dir.sizes(), vec![256, 128, 64, 48, 32, 16]);
    assert_eq!(dir.entries[0].width_byte, 0);
    assert_eq!(dir.entries[0].height_byte, 0);
    for (i, &size) in dir.sizes().iter().enumerate() {
        let payload = dir.image_data(icon, i).unwrap();
        assert_eq!(png_dimensions(payload), (size, size));
    }

    assert_eq!(png_dimensions(&entries[1].1), (192, 192));
    assert_eq!(png_dimensions(&entries[2].1), (512, 512));
    assert_eq!(entries[3].1, simple_favicon::descriptor::DEFAULT_MANIFEST);
}

#[test]
fn small_source_gets_only_the_smallest_icon() {
    let output = Pipeline::new(RustBackend::new())
        .run(&gradient_png(20, 20))
        .unwrap();

    let icon = output.bundle.get("favicon.ico").unwrap();
    assert_eq!(&icon[4..6], &[1, 0]);
    let dir = IconDir::parse(icon).unwrap();
    assert_eq!(dir.sizes(), vec![16]);
    assert_eq!(dir.entries[0].data_offset, 22);

    // Standalone PNGs are upscaled regardless of source size
    let png512 = output.bundle.get("512.png").unwrap();
    assert_eq!(png_dimensions(png512), (512, 512));
}

#[test]
fn non_square_source_is_stretched_to_square() {
    let output = Pipeline::new(RustBackend::new())
        .run(&gradient_png(300, 40))
        .unwrap();

    assert_eq!(output.source_dimensions, (300, 40));
    assert_eq!(output.icon_sizes, vec![32, 16]);
    let png192 = output.bundle.get("192.png").unwrap();
    assert_eq!(png_dimensions(png192), (192, 192));
}

#[test]
fn directory_offsets_are_contiguous() {
    let output = Pipeline::new(RustBackend::new())
        .run(&gradient_png(128, 128))
        .unwrap();
    let icon = output.bundle.get("favicon.ico").unwrap();
    let dir = IconDir::parse(icon).unwrap();

    let mut expected = 6 + 16 * dir.entries.len() as u32;
    for entry in &dir.entries {
        assert_eq!(entry.data_offset, expected);
        expected += entry.data_size;
    }
    assert_eq!(expected as usize, icon.len());
}

#[test]
fn same_input_gives_identical_archive() {
    let png = gradient_png(64, 64);
    let pipeline = Pipeline::new(RustBackend::new());
    let first = pipeline.run(&png).unwrap();
    let second = pipeline.run(&png).unwrap();
    assert_eq!(first.archive, second.archive);
}

#[test]
fn file_descriptor_is_bundled_verbatim() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("manifest.json");
    let manifest = br##"{"name":"Site","theme_color":"#000000"}"##;
    std::fs::write(&path, manifest).unwrap();

    let output = Pipeline::new(RustBackend::new())
        .with_descriptor(Box::new(FileDescriptor::new(&path)))
        .run(&gradient_png(32, 32))
        .unwrap();
    assert_eq!(output.bundle.get("manifest.json").unwrap(), &manifest[..]);
}

#[test]
fn progress_events_end_in_success() {
    let (tx, rx) = mpsc::channel();
    let pipeline = Pipeline::new(RustBackend::new()).with_events(tx);
    pipeline.run(&gradient_png(48, 48)).unwrap();
    drop(pipeline);

    let events: Vec<PipelineEvent> = rx.iter().collect();
    assert!(events.contains(&PipelineEvent::SourceDecoded {
        width: 48,
        height: 48
    }));
    assert!(events.iter().any(|e| matches!(
        e,
        PipelineEvent::IconPacked { sizes, .. } if sizes == &vec![48, 32, 16]
    )));
    assert!(events.iter().any(|e| matches!(e, PipelineEvent::Packaged { entries: 4, .. })));
    assert_eq!(
        events.last(),
        Some(&PipelineEvent::StateChanged {
            from: RunState::Running,
            to: RunState::Succeeded
        })
    );
}

// =========================================================================
// Failed runs
// =========================================================================

#[test]
fn source_below_minimum_is_too_small() {
    let err = Pipeline::new(RustBackend::new())
        .run(&gradient_png(15, 15))
        .unwrap_err();
    assert!(matches!(
        err,
        BundleError::ImageTooSmall {
            width: 15,
            height: 15
        }
    ));
    assert_eq!(err.category(), ErrorCategory::ImageTooSmall);
}

#[test]
fn one_short_side_is_enough_to_be_too_small() {
    let err = Pipeline::new(RustBackend::new())
        .run(&gradient_png(400, 10))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ImageTooSmall);
}

#[test]
fn descriptor_failure_produces_no_archive() {
    let (tx, rx) = mpsc::channel();
    let pipeline = Pipeline::new(RustBackend::new())
        .with_descriptor(Box::new(UnreachableDescriptor))
        .with_events(tx);
    let err = pipeline.run(&gradient_png(512, 512)).unwrap_err();
    drop(pipeline);

    assert!(matches!(
        err,
        BundleError::DescriptorFetch(DescriptorError::Status(404))
    ));
    let events: Vec<PipelineEvent> = rx.iter().collect();
    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Packaged { .. })));
    assert_eq!(
        events.last(),
        Some(&PipelineEvent::StateChanged {
            from: RunState::Running,
            to: RunState::Failed(ErrorCategory::DescriptorFetch)
        })
    );
}

#[test]
fn jpeg_input_is_wrong_file_type() {
    let jpeg = [
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
    ];
    let err = Pipeline::new(RustBackend::new()).run(&jpeg).unwrap_err();
    assert!(matches!(err, BundleError::InvalidFileType(ref mime) if mime == "image/jpeg"));
}

#[test]
fn corrupt_png_is_decode_error() {
    let mut png = gradient_png(64, 64);
    png.truncate(40);
    let err = Pipeline::new(RustBackend::new()).run(&png).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Decode);
}

#[test]
fn empty_input_is_decode_error() {
    let err = Pipeline::new(RustBackend::new()).run(&[]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Decode);
}
