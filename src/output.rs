//! CLI output formatting.
//!
//! Every function returns lines instead of printing, so the formatting is
//! unit-testable; `main.rs` does the printing.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Source: 512x512
//! favicon.ico: 256, 128, 64, 48, 32, 16 (18.2 KB)
//! 192.png: 4.1 KB
//! 512.png: 21.7 KB
//! manifest.json: built-in manifest (0.3 KB)
//! Archive: 4 files, 43.0 KB
//! ```
//!
//! ## Inspect
//!
//! ```text
//! favicon.ico: 6 images
//!     256x256  offset 102  size 17099
//!     128x128  offset 17201  size 5103
//! ```

use crate::ico::IconDir;
use crate::pipeline::PipelineEvent;

fn kilobytes(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn join_sizes(sizes: &[u32]) -> String {
    sizes
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a single pipeline progress event. State changes are logged, not shown.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::StateChanged { .. } => Vec::new(),
        PipelineEvent::SourceDecoded { width, height } => {
            vec![format!("Source: {}x{}", width, height)]
        }
        PipelineEvent::IconPacked { sizes, bytes } => vec![format!(
            "favicon.ico: {} ({})",
            join_sizes(sizes),
            kilobytes(*bytes)
        )],
        PipelineEvent::PngEncoded { size, bytes } => {
            vec![format!("{}.png: {}", size, kilobytes(*bytes))]
        }
        PipelineEvent::DescriptorFetched { origin, bytes } => {
            vec![format!("manifest.json: {} ({})", origin, kilobytes(*bytes))]
        }
        PipelineEvent::Packaged { entries, bytes } => {
            vec![format!("Archive: {} files, {}", entries, kilobytes(*bytes))]
        }
    }
}

/// Format the directory of a parsed icon container.
pub fn format_icon_dir(name: &str, dir: &IconDir) -> Vec<String> {
    let mut lines = vec![format!("{}: {} images", name, dir.entries.len())];
    for entry in &dir.entries {
        lines.push(format!(
            "    {}x{}  offset {}  size {}",
            entry.width(),
            entry.height(),
            entry.data_offset,
            entry.data_size
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RunState;

    #[test]
    fn kilobytes_one_decimal() {
        assert_eq!(kilobytes(2048), "2.0 KB");
        assert_eq!(kilobytes(0), "0.0 KB");
    }

    #[test]
    fn state_changes_are_silent() {
        let event = PipelineEvent::StateChanged {
            from: RunState::Idle,
            to: RunState::Running,
        };
        assert!(format_pipeline_event(&event).is_empty());
    }

    #[test]
    fn icon_event_lists_sizes() {
        let event = PipelineEvent::IconPacked {
            sizes: vec![32, 16],
            bytes: 1024,
        };
        assert_eq!(
            format_pipeline_event(&event),
            vec!["favicon.ico: 32, 16 (1.0 KB)"]
        );
    }

    #[test]
    fn png_and_archive_events() {
        assert_eq!(
            format_pipeline_event(&PipelineEvent::PngEncoded {
                size: 192,
                bytes: 512
            }),
            vec!["192.png: 0.5 KB"]
        );
        assert_eq!(
            format_pipeline_event(&PipelineEvent::Packaged {
                entries: 4,
                bytes: 10240
            }),
            vec!["Archive: 4 files, 10.0 KB"]
        );
    }

    #[test]
    fn icon_dir_lines() {
        let variants = vec![
            crate::imaging::RasterVariant {
                size: 256,
                bytes: vec![0; 10],
            },
            crate::imaging::RasterVariant {
                size: 16,
                bytes: vec![0; 4],
            },
        ];
        let ico = crate::ico::write_ico(&variants).unwrap();
        let dir = IconDir::parse(&ico).unwrap();
        assert_eq!(
            format_icon_dir("favicon.ico", &dir),
            vec![
                "favicon.ico: 2 images",
                "    256x256  offset 38  size 10",
                "    16x16  offset 48  size 4",
            ]
        );
    }
}
