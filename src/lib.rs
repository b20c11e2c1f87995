//! # nmk - A No-Frills Incremental Build Driver
//!
//! nmk builds small C, C++ and Objective-C projects without a build file.
//! It walks the source tree, asks the compiler which headers each
//! translation unit pulls in, recompiles only the object files whose
//! inputs changed, and links the result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build whatever lives under src/
//! nmk
//!
//! # Build and run
//! nmk --run
//! ```
//!
//! ## Module Organization
//!
//! - [`index`] - Source tree discovery
//! - [`deps`] - Header dependency resolution via the compiler
//! - [`stale`] - Timestamp-based rebuild decisions
//! - [`build`] - Build orchestration, clean, run
//! - [`toolchain`] - Compiler subprocess invocation
//! - [`config`] - Options and the optional `nmk.toml` manifest

/// Build orchestration: compile stale units, link, clean, run.
pub mod build;

/// Build options and `nmk.toml` manifest parsing.
pub mod config;

/// Resolved per-invocation build context (directories, compiler, modules).
pub mod context;

/// Header dependency resolution and Makefile-rule parsing.
pub mod deps;

/// Recursive source discovery with module filtering.
pub mod index;

/// Staleness decisions over file timestamps.
pub mod stale;

/// External compiler invocation (scan, compile, link).
pub mod toolchain;
