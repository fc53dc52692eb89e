use std::io;
use std::process::Output;

/// Captured result of one external tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Whether the process exited with a zero status
    pub status_ok: bool,

    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,

    /// Standard output, trimmed of surrounding whitespace
    pub stdout: String,

    /// Standard error, trimmed of surrounding whitespace
    pub stderr: String,
}

impl ToolOutput {
    /// Output of a process that exited cleanly and printed nothing.
    pub fn clean() -> Self {
        Self {
            status_ok: true,
            code: Some(0),
            ..Default::default()
        }
    }

    /// True only when the exit status is zero AND nothing was written to stderr.
    ///
    /// Compiler warnings land on stderr, so a warning counts as a failure.
    pub fn is_clean(&self) -> bool {
        self.status_ok && self.stderr.is_empty()
    }
}

impl From<Output> for ToolOutput {
    fn from(output: Output) -> Self {
        Self {
            status_ok: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// An external program the build drives: the compiler or the linker.
///
/// Implementations must be shareable across compilation workers.
pub trait Tool: Send + Sync {
    /// Program name, used in log records
    fn name(&self) -> &str;

    /// Run the tool with `args` and wait for it to finish.
    fn run(&self, args: &[String]) -> io::Result<ToolOutput>;
}
