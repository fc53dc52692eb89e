use crate::toolchain::Tool;
use colored::*;
use std::path::{Path, PathBuf};

/// Result of the single link step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Linker arguments: objects, external objects, `-o <output>`, global flags, custom flags.
pub fn link_args(
    objects: &[PathBuf],
    external_objects: &[PathBuf],
    custom_flags: &[String],
    global_flags: &[String],
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = objects
        .iter()
        .chain(external_objects)
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    args.push("-o".to_string());
    args.push(output.to_string_lossy().to_string());
    args.extend(global_flags.iter().cloned());
    args.extend(custom_flags.iter().cloned());
    args
}

/// Links `objects` and `external_objects` into `output`.
///
/// Anything written to stderr counts as a failure, as does a nonzero exit.
pub fn link(
    tool: &dyn Tool,
    objects: &[PathBuf],
    external_objects: &[PathBuf],
    custom_flags: &[String],
    global_flags: &[String],
    output: &Path,
) -> LinkOutcome {
    let args = link_args(
        objects,
        external_objects,
        custom_flags,
        global_flags,
        output,
    );

    let out = match tool.run(&args) {
        Ok(out) => out,
        Err(e) => {
            println!("{} Failed to execute {}: {}", "x".red(), tool.name(), e);
            return LinkOutcome {
                success: false,
                stdout: String::new(),
                stderr: e.to_string(),
            };
        }
    };

    if !out.stdout.is_empty() {
        println!("{}", out.stdout);
    }
    if !out.stderr.is_empty() {
        println!("{}", out.stderr);
    }

    LinkOutcome {
        success: out.is_clean(),
        stdout: out.stdout,
        stderr: out.stderr,
    }
}
