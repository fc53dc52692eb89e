//! # gtkmmcargo - a minimal build driver for gtkmm projects
//!
//! One JSON config describes one executable: the project root, a scratch
//! directory for object files, the sources to compile, and extra flags.
//! Every listed source is compiled on its own worker, the objects are linked
//! once, and the elapsed time is reported.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a template config, pre-filled with the sources found here
//! gtkmmcargo --config template --scan
//!
//! # Build with ./gtkmmcargo.cfg
//! gtkmmcargo
//! ```
//!
//! ## Module Organization
//!
//! - [`build`] - Compilation, linking, and the build orchestrator
//! - [`config`] - The build specification and its config file
//! - [`flags`] - Global flags discovered through `pkg-config`
//! - [`toolchain`] - How the compiler and linker are invoked

/// Parallel compilation, linking, and build orchestration.
pub mod build;

/// Build specification (`gtkmmcargo.cfg`).
pub mod config;

/// Global compile/link flags from `pkg-config`.
pub mod flags;

/// Project scanning for template configs.
pub mod import;

/// External compiler/linker invocation.
pub mod toolchain;
