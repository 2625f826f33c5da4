//! Bundle pipeline: PNG in, archive out.
//!
//! ## Run states
//!
//! ```text
//! Idle ──validate + decode──▶ Running ──all steps + packaging──▶ Succeeded
//!   │                            │
//!   └────────────────────────────┴──────── first error ─────────▶ Failed
//! ```
//!
//! Every call to [`Pipeline::run`] is a fresh run starting at `Idle`; both
//! terminal states are final and nothing is resumed or retried.
//!
//! ## Fan-out
//!
//! Once the source is decoded and its size checked, four independent steps
//! run on the rayon pool:
//!
//! | Step | Output |
//! |---|---|
//! | [`Step::Icon`] | `favicon.ico`, its own sizes also built in parallel |
//! | [`Step::Png192`] | `192.png` |
//! | [`Step::Png512`] | `512.png` |
//! | [`Step::Descriptor`] | `manifest.json` |
//!
//! The first step to fail records itself in the shared [`CancelSignal`];
//! siblings see the signal before their next resample, encode or fetch and
//! stop with [`BundleError::Cancelled`]. The run then fails with the recorded
//! step's error. Only when all four succeed is the bundle packaged and the
//! archive handed back, so a caller never sees partial output.

use crate::archive::{ArchiveWriter, ZipArchiveWriter};
use crate::descriptor::{DescriptorSource, StaticDescriptor};
use crate::error::{BundleError, ErrorCategory};
use crate::ico::{self, EncodedIcon};
use crate::imaging::validation::validate_input;
use crate::imaging::{BackendError, EncodeParams, ImageBackend, RasterVariant, create_variant};
use crate::package::{ArtifactBundle, Artifacts, STANDALONE_PNG_SIZES, package};
use std::fmt;
use std::sync::OnceLock;
use std::sync::mpsc::Sender;

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Succeeded,
    Failed(ErrorCategory),
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    pub fn can_transition_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Failed(_))
                | (Self::Running, Self::Succeeded)
                | (Self::Running, Self::Failed(_))
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Running => f.write_str("running"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed(category) => write!(f, "failed ({category})"),
        }
    }
}

/// The four concurrent production steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Icon,
    Png192,
    Png512,
    Descriptor,
}

impl Step {
    pub fn label(self) -> &'static str {
        match self {
            Self::Icon => "favicon.ico",
            Self::Png192 => "192.png",
            Self::Png512 => "512.png",
            Self::Descriptor => "manifest.json",
        }
    }
}

/// Shared fail-fast flag. The first step to raise it is remembered.
#[derive(Debug, Default)]
pub struct CancelSignal {
    first_failure: OnceLock<Step>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self) -> bool {
        self.first_failure.get().is_some()
    }

    /// `Err(Cancelled)` once any step has failed.
    pub fn check(&self) -> Result<(), BundleError> {
        if self.is_raised() {
            Err(BundleError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Record `step` as failed. Returns true if it was the first.
    pub fn raise(&self, step: Step) -> bool {
        self.first_failure.set(step).is_ok()
    }

    pub fn first_failure(&self) -> Option<Step> {
        self.first_failure.get().copied()
    }
}

/// Progress notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StateChanged { from: RunState, to: RunState },
    SourceDecoded { width: u32, height: u32 },
    IconPacked { sizes: Vec<u32>, bytes: usize },
    PngEncoded { size: u32, bytes: usize },
    DescriptorFetched { origin: String, bytes: usize },
    Packaged { entries: usize, bytes: usize },
}

/// Everything a successful run exposes.
#[derive(Debug, Clone)]
pub struct BundleOutput {
    pub archive: Vec<u8>,
    pub bundle: ArtifactBundle,
    pub icon_sizes: Vec<u32>,
    pub source_dimensions: (u32, u32),
}

/// State of the run in progress, plus the optional progress channel.
struct PipelineRun {
    state: RunState,
    events: Option<Sender<PipelineEvent>>,
}

impl PipelineRun {
    fn new(events: Option<Sender<PipelineEvent>>) -> Self {
        Self {
            state: RunState::Idle,
            events,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        log::info!("run {} -> {}", self.state, next);
        let from = std::mem::replace(&mut self.state, next);
        self.emit(PipelineEvent::StateChanged { from, to: next });
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is watching
            let _ = tx.send(event);
        }
    }
}

/// Orchestrates decode → resample → encode → package.
pub struct Pipeline<B: ImageBackend> {
    backend: B,
    descriptor: Box<dyn DescriptorSource>,
    archiver: Box<dyn ArchiveWriter>,
    params: EncodeParams,
    events: Option<Sender<PipelineEvent>>,
}

impl<B: ImageBackend> Pipeline<B> {
    /// Pipeline with the embedded manifest and a deflated zip archive.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            descriptor: Box::new(StaticDescriptor::default()),
            archiver: Box::new(ZipArchiveWriter::new()),
            params: EncodeParams::default(),
            events: None,
        }
    }

    pub fn with_descriptor(mut self, descriptor: Box<dyn DescriptorSource>) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn with_archiver(mut self, archiver: Box<dyn ArchiveWriter>) -> Self {
        self.archiver = archiver;
        self
    }

    pub fn with_params(mut self, params: EncodeParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_events(mut self, events: Sender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Run once over `input` (PNG bytes).
    pub fn run(&self, input: &[u8]) -> Result<BundleOutput, BundleError> {
        let mut run = PipelineRun::new(self.events.clone());
        match self.execute(&mut run, input) {
            Ok(output) => {
                run.advance(RunState::Succeeded);
                Ok(output)
            }
            Err(err) => {
                log::warn!("bundle run failed: {err}");
                run.advance(RunState::Failed(err.category()));
                Err(err)
            }
        }
    }

    fn execute(&self, run: &mut PipelineRun, input: &[u8]) -> Result<BundleOutput, BundleError> {
        validate_input(input)?;
        let source = self.backend.decode(input).map_err(decode_error)?;
        let (width, height) = source.dimensions();
        run.emit(PipelineEvent::SourceDecoded { width, height });

        run.advance(RunState::Running);
        // Reject undersized sources before any branch starts resampling
        ico::eligible_sizes((width, height))?;

        let backend = &self.backend;
        let params = &self.params;
        let descriptor = self.descriptor.as_ref();
        let cancel = CancelSignal::new();
        let source = &source;
        let cancel_ref = &cancel;

        let standalone = |step: Step, size: u32| {
            guarded(cancel_ref, step, || {
                create_variant(backend, source, size, params, cancel_ref)
            })
        };
        let ((icon, png192), (png512, manifest)) = rayon::join(
            || {
                rayon::join(
                    || {
                        guarded(cancel_ref, Step::Icon, || {
                            ico::build_icon(backend, source, params, cancel_ref)
                        })
                    },
                    || standalone(Step::Png192, STANDALONE_PNG_SIZES[0]),
                )
            },
            || {
                rayon::join(
                    || standalone(Step::Png512, STANDALONE_PNG_SIZES[1]),
                    || {
                        guarded(cancel_ref, Step::Descriptor, || {
                            cancel_ref.check()?;
                            Ok(descriptor.fetch()?)
                        })
                    },
                )
            },
        );

        if let Some(step) = cancel.first_failure() {
            let err = match step {
                Step::Icon => icon.err(),
                Step::Png192 => png192.err(),
                Step::Png512 => png512.err(),
                Step::Descriptor => manifest.err(),
            };
            return Err(err.unwrap_or(BundleError::Cancelled));
        }
        let EncodedIcon {
            sizes: icon_sizes,
            bytes: icon,
        } = icon?;
        let RasterVariant { bytes: png192, .. } = png192?;
        let RasterVariant { bytes: png512, .. } = png512?;
        let manifest = manifest?;

        run.emit(PipelineEvent::IconPacked {
            sizes: icon_sizes.clone(),
            bytes: icon.len(),
        });
        run.emit(PipelineEvent::PngEncoded {
            size: STANDALONE_PNG_SIZES[0],
            bytes: png192.len(),
        });
        run.emit(PipelineEvent::PngEncoded {
            size: STANDALONE_PNG_SIZES[1],
            bytes: png512.len(),
        });
        run.emit(PipelineEvent::DescriptorFetched {
            origin: self.descriptor.describe(),
            bytes: manifest.len(),
        });

        let bundle = package(Artifacts {
            icon,
            png192,
            png512,
            descriptor: manifest,
        });
        let archive = bundle.to_archive(self.archiver.as_ref())?;
        run.emit(PipelineEvent::Packaged {
            entries: bundle.names().len(),
            bytes: archive.len(),
        });

        Ok(BundleOutput {
            archive,
            bundle,
            icon_sizes,
            source_dimensions: (width, height),
        })
    }
}

/// Run `f` as `step`, raising the signal if it fails for a real reason.
fn guarded<T>(
    cancel: &CancelSignal,
    step: Step,
    f: impl FnOnce() -> Result<T, BundleError>,
) -> Result<T, BundleError> {
    let result = f();
    if let Err(err) = &result {
        if !err.is_cancelled() && cancel.raise(step) {
            log::debug!("{} failed first: {err}", step.label());
        }
    }
    result
}

fn decode_error(err: BackendError) -> BundleError {
    match err {
        BackendError::Decode(reason) => BundleError::Decode(reason),
        other => BundleError::Decode(other.to_string()),
    }
}
