//! External tool invocation
//!
//! The compiler and the linker are both driven through the [`Tool`] trait.
//! [`SystemTool`] spawns a real process; tests plug in their own
//! implementation to observe argument lists and call order.

pub mod types;

pub use types::{Tool, ToolOutput};

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Compiler used when `CXX` is not set
pub const DEFAULT_COMPILER: &str = "g++";

/// A tool backed by a program on disk or on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemTool {
    program: PathBuf,
    name: String,
}

impl SystemTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program.to_string_lossy().to_string();
        Self { program, name }
    }

    /// The C++ compiler named by `CXX`, or `g++`.
    pub fn from_env() -> Self {
        match std::env::var("CXX") {
            Ok(cxx) if !cxx.trim().is_empty() => Self::new(cxx.trim()),
            _ => Self::new(DEFAULT_COMPILER),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Tool for SystemTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, args: &[String]) -> io::Result<ToolOutput> {
        tracing::debug!(tool = %self.name, "{} {}", self.name, args.join(" "));
        let output = Command::new(&self.program).args(args).output()?;
        Ok(ToolOutput::from(output))
    }
}
