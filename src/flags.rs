//! Global compiler and linker flags discovered from `pkg-config`.
//!
//! Discovery happens once, when the process starts, and produces an
//! immutable [`GlobalFlags`] value that is handed to the builder. A failed
//! query is logged and leaves the corresponding list empty.

use colored::*;
use std::io;
use std::process::Command;
use thiserror::Error;

/// Packages queried for compile flags
pub const COMPILE_PACKAGES: &[&str] = &["gtkmm-3.0", "glib-2.0"];

/// Packages queried for link flags
pub const LINK_PACKAGES: &[&str] = &["gtkmm-3.0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Compile,
    Link,
}

impl FlagKind {
    fn pkg_config_arg(self) -> &'static str {
        match self {
            FlagKind::Compile => "--cflags",
            FlagKind::Link => "--libs",
        }
    }
}

#[derive(Debug, Error)]
pub enum FlagError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Query {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Source of the environment-provided flag lists.
pub trait FlagProvider {
    fn fetch_flags(&self, kind: FlagKind) -> Result<Vec<String>, FlagError>;
}

/// Queries `pkg-config` for the gtkmm package set.
#[derive(Debug, Clone)]
pub struct PkgConfig {
    program: String,
    compile_packages: Vec<String>,
    link_packages: Vec<String>,
}

impl Default for PkgConfig {
    fn default() -> Self {
        Self {
            program: "pkg-config".to_string(),
            compile_packages: COMPILE_PACKAGES.iter().map(|s| s.to_string()).collect(),
            link_packages: LINK_PACKAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PkgConfig {
    /// Same package set, different `pkg-config` executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn query_args(&self, kind: FlagKind) -> Vec<String> {
        let packages = match kind {
            FlagKind::Compile => &self.compile_packages,
            FlagKind::Link => &self.link_packages,
        };
        let mut args = packages.clone();
        args.push(kind.pkg_config_arg().to_string());
        args
    }
}

impl FlagProvider for PkgConfig {
    fn fetch_flags(&self, kind: FlagKind) -> Result<Vec<String>, FlagError> {
        let output = Command::new(&self.program)
            .args(self.query_args(kind))
            .output()
            .map_err(|source| FlagError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FlagError::Query {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(split_flags(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Fixed flag lists, for tests and for callers that already know their flags.
#[derive(Debug, Clone, Default)]
pub struct StaticFlags {
    pub compile: Vec<String>,
    pub link: Vec<String>,
}

impl FlagProvider for StaticFlags {
    fn fetch_flags(&self, kind: FlagKind) -> Result<Vec<String>, FlagError> {
        Ok(match kind {
            FlagKind::Compile => self.compile.clone(),
            FlagKind::Link => self.link.clone(),
        })
    }
}

/// Splits tool output into flag tokens.
///
/// The output is trimmed and then split on single spaces. Quoted tokens
/// containing spaces are NOT preserved, and a doubled space yields an empty
/// token; the tokens are passed to the compiler positionally as-is.
pub fn split_flags(output: &str) -> Vec<String> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(' ').map(str::to_string).collect()
}

/// Compile and link flags shared by every compilation and the link step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    compile: Vec<String>,
    link: Vec<String>,
}

impl GlobalFlags {
    pub fn new(compile: Vec<String>, link: Vec<String>) -> Self {
        Self { compile, link }
    }

    /// Query `provider` once per kind. Failures are logged and yield an empty list.
    pub fn discover(provider: &dyn FlagProvider) -> Self {
        Self {
            compile: fetch_or_empty(provider, FlagKind::Compile),
            link: fetch_or_empty(provider, FlagKind::Link),
        }
    }

    pub fn compile(&self) -> &[String] {
        &self.compile
    }

    pub fn link(&self) -> &[String] {
        &self.link
    }

    /// Prints both lists, one flag per line.
    pub fn print(&self) {
        display("gtkmm compiler flags", &self.compile);
        display("gtkmm linker flags", &self.link);
    }
}

fn fetch_or_empty(provider: &dyn FlagProvider, kind: FlagKind) -> Vec<String> {
    match provider.fetch_flags(kind) {
        Ok(flags) => flags,
        Err(e) => {
            tracing::warn!(?kind, "flag discovery failed: {}", e);
            Vec::new()
        }
    }
}

fn display(name: &str, values: &[String]) {
    println!("{}:", name.bold());
    if values.is_empty() {
        println!("\t{}", "(none)".dimmed());
    }
    for flag in values {
        println!("\t{}", flag);
    }
    println!();
}
