use super::compile::{CompileReport, FileStatus, SkipReason, compile};
use super::feedback::FeedbackAnalyzer;
use super::link::link;
use crate::config::BuildSpec;
use crate::flags::GlobalFlags;
use crate::toolchain::{SystemTool, Tool};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Link,
}

/// Outcome of one [`Builder::build`] call.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub success: bool,
    pub elapsed_seconds: f64,
    pub stdout: String,
    pub stderr: String,
    pub failed_stage: Option<Stage>,
    pub report: CompileReport,
}

/// Drives one build: compile every file, then link once.
pub struct Builder {
    spec: BuildSpec,
    flags: GlobalFlags,
    compiler: Arc<dyn Tool>,
    linker: Arc<dyn Tool>,
    progress: bool,
}

impl Builder {
    /// Uses the system compiler (see [`SystemTool::from_env`]) for both stages.
    pub fn new(spec: BuildSpec, flags: GlobalFlags) -> Self {
        let tool: Arc<dyn Tool> = Arc::new(SystemTool::from_env());
        Self {
            spec,
            flags,
            compiler: tool.clone(),
            linker: tool,
            progress: true,
        }
    }

    pub fn with_compiler(mut self, compiler: Arc<dyn Tool>) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_linker(mut self, linker: Arc<dyn Tool>) -> Self {
        self.linker = linker;
        self
    }

    /// Show or hide the compile progress bar.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn spec(&self) -> &BuildSpec {
        &self.spec
    }

    pub fn build(&self) -> BuildResult {
        let start = Instant::now();

        let work_dir = match self.spec.ensure_working_directory() {
            Ok(dir) => dir,
            Err(e) => {
                println!("{} {}", "x".red(), e);
                println!("Compilation failure");
                return BuildResult {
                    elapsed_seconds: start.elapsed().as_secs_f64(),
                    stderr: e.to_string(),
                    failed_stage: Some(Stage::Compile),
                    ..Default::default()
                };
            }
        };

        let pb = self.progress_bar();
        let report = compile(
            &self.spec,
            &work_dir,
            self.flags.compile(),
            self.compiler.as_ref(),
            &pb,
        );
        pb.finish_and_clear();

        if !report.succeeded() {
            print_unbuilt(&report);
            println!("{} Compilation failure", "x".red());
            let (stdout, stderr) = report.diagnostics();
            print_hint(&stderr);
            return BuildResult {
                elapsed_seconds: start.elapsed().as_secs_f64(),
                stdout,
                stderr,
                failed_stage: Some(Stage::Compile),
                report,
                ..Default::default()
            };
        }

        let bin_path = self.spec.executable_path();
        println!("   {} Linking {}...", "🔗".cyan(), bin_path.display());
        let linked = link(
            self.linker.as_ref(),
            &report.objects(),
            &self.spec.external_objects,
            &self.spec.custom_link_flags,
            self.flags.link(),
            &bin_path,
        );

        let elapsed_seconds = start.elapsed().as_secs_f64();
        if !linked.success {
            println!("{} Linking failure", "x".red());
            print_hint(&linked.stderr);
            return BuildResult {
                success: false,
                elapsed_seconds,
                stdout: linked.stdout,
                stderr: linked.stderr,
                failed_stage: Some(Stage::Link),
                report,
            };
        }

        println!("{} OK. Duration: {:.3} sec.", "✓".green(), elapsed_seconds);
        BuildResult {
            success: true,
            elapsed_seconds,
            stdout: linked.stdout,
            stderr: linked.stderr,
            failed_stage: None,
            report,
        }
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Compiling...");
        pb
    }
}

/// Lists entries that produced no object, so a skip is told apart from a failure.
fn print_unbuilt(report: &CompileReport) {
    for outcome in report.outcomes() {
        match &outcome.status {
            FileStatus::Compiled { .. } => {}
            FileStatus::Skipped(SkipReason::EmptyName) => {
                println!("{} '{}' skipped: no file name", "!".yellow(), outcome.source);
            }
            FileStatus::Skipped(SkipReason::Ineligible { extension }) => {
                println!(
                    "{} '{}' skipped: extension '{}' is not compiled",
                    "!".yellow(),
                    outcome.source,
                    extension
                );
            }
            FileStatus::Missing { path } => {
                println!("{} '{}' not found at {}", "x".red(), outcome.source, path.display());
            }
            FileStatus::Failed { .. } => {
                println!("{} '{}' failed to compile", "x".red(), outcome.source);
            }
        }
    }
}

fn print_hint(output: &str) {
    if let Some(hint) = FeedbackAnalyzer::analyze(output) {
        println!("\n{} {}", "💡".yellow(), hint);
    }
}
