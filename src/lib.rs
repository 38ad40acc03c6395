//! # texcell - Containerized LaTeX Build Orchestrator
//!
//! texcell compiles LaTeX documents inside a Docker container so the host
//! needs nothing beyond a container runtime. It scans a project root for
//! folders holding a `.tex` source, runs `latexmk` in an isolated container
//! for each one, and can watch the filesystem to rebuild on save.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build the toolchain image once
//! cli init
//!
//! # Compile every document folder under the current directory
//! cli build all
//!
//! # Rebuild a single folder whenever its source changes
//! cli watch thesis
//! ```
//!
//! ## Module Organization
//!
//! - [`build`] - Per-folder compilation, batch loops, watching, cleanup
//! - [`config`] - Project configuration (`texcell.toml`)
//! - [`discover`] - Buildable-folder discovery and target resolution
//! - [`docker`] - Container runtime integration and image bootstrap

/// Compilation engine: single-folder build, batch loop, watch, clean.
pub mod build;

/// Project configuration (`texcell.toml`) and built-in defaults.
pub mod config;

/// Buildable-folder discovery and path-argument resolution.
pub mod discover;

/// Container runtime integration (`docker build` / `docker run`).
pub mod docker;

/// Domain error conditions shared across commands.
pub mod error;

/// Terminal UI utilities (summary tables).
pub mod ui;
