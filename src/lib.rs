//! # extsync - Pinned External Repositories
//!
//! extsync keeps a set of external source repositories checked out at exact,
//! pinned revisions, and can configure, build and install one of them with
//! CMake.
//!
//! ## Manifest
//!
//! `Externals/Revisions`, one repository per line:
//!
//! ```text
//! glfw    https://github.com/glfw/glfw.git        7b6aead9fb88b3623e3b3725ebb42670cbe4c579
//! assimp  https://github.com/assimp/assimp.git    v5.3.1
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Clone or update every external to its pinned revision
//! extsync sync
//!
//! # Then build the designated external in Debug and Release
//! extsync build assimp
//! ```
//!
//! ## Module Organization
//!
//! - [`manifest`] - Manifest parsing
//! - [`deps`] - Working copy synchronization and pruning
//! - [`build`] - CMake configure/build/install driver
//! - [`process`] - Fail-fast external command execution
//! - [`config`] - Configuration parsing (`extsync.toml`)

/// CMake build driver for one synchronized external.
pub mod build;

/// CLI command handlers extracted from main.
pub mod commands;

/// Configuration file parsing (`extsync.toml`).
pub mod config;

/// Working copy synchronization and pruning.
pub mod deps;

/// Manifest (`Revisions`) parsing.
pub mod manifest;

/// Fail-fast external command execution.
pub mod process;

/// Read-only working copy status.
pub mod status;

/// Terminal UI utilities (tables, spinners).
pub mod ui;
