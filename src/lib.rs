//! # Simple Favicon
//!
//! Turns one PNG into a favicon bundle: a multi-size `favicon.ico`, standalone
//! `192.png` and `512.png`, and a `manifest.json`, zipped into one archive.
//!
//! # Architecture
//!
//! ```text
//! PNG bytes ─▶ validate ─▶ decode ─┬─▶ icon container (256…16) ─┐
//!                                  ├─▶ 192.png                  ├─▶ package ─▶ zip
//!                                  ├─▶ 512.png                  │
//!                                  └─▶ manifest.json ───────────┘
//! ```
//!
//! The four branches share nothing writable and run concurrently on rayon;
//! the first failure stops the run. See [`pipeline`] for the run states.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Orchestrator: run states, fan-out, first-failure-wins |
//! | [`ico`] | Icon container encoder and directory parser |
//! | [`imaging`] | Decode, square resample, PNG encode behind [`imaging::ImageBackend`] |
//! | [`package`] | Fixed-name artifact bundle |
//! | [`archive`] | Archive service trait + deterministic zip writer |
//! | [`descriptor`] | Where `manifest.json` comes from |
//! | [`config`] | Optional TOML config |
//! | [`error`] | Run-level error categories |
//! | [`output`] | CLI output formatting |
//!
//! # Example
//!
//! ```no_run
//! use simple_favicon::{Pipeline, RustBackend};
//!
//! let png = std::fs::read("logo.png")?;
//! let output = Pipeline::new(RustBackend::new()).run(&png)?;
//! std::fs::write("favicon-bundle.zip", &output.archive)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design Decisions
//!
//! ## Square Output, Any Input Shape
//!
//! Every variant is resampled straight to `size`×`size`. Non-square sources
//! are stretched rather than cropped or padded; the source aspect ratio is not
//! carried into the bundle.
//!
//! ## Fixed Sizes and Names
//!
//! The icon candidate list and the four archive entry names are constants.
//! Only encoding effort, filter choice, worker count and the descriptor source
//! are configurable.
//!
//! ## Byte-Identical Output
//!
//! Nothing time- or thread-dependent reaches the output: variants are
//! collected in candidate order regardless of which finished first, and zip
//! entries carry a fixed timestamp. The same PNG always yields the same
//! archive.

pub mod archive;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ico;
pub mod imaging;
pub mod output;
pub mod package;
pub mod pipeline;

pub use error::{BundleError, ErrorCategory};
pub use imaging::RustBackend;
pub use pipeline::{BundleOutput, Pipeline, PipelineEvent, RunState};
