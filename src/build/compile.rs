use super::utils::{is_source_extension, name_components, path_components};
use crate::config::BuildSpec;
use crate::toolchain::Tool;
use colored::*;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Why a listed entry was never handed to the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry has no file name (empty, or ends in a separator)
    EmptyName,
    /// The extension is not one of the compiled ones
    Ineligible { extension: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Compiled {
        object: PathBuf,
    },
    Skipped(SkipReason),
    /// The resolved source path is not a regular file
    Missing {
        path: PathBuf,
    },
    /// The compiler could not run, exited nonzero, or wrote to stderr
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

/// Result for one entry of `source_files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub source: String,
    pub status: FileStatus,
}

/// Per-file results of a compilation stage, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    outcomes: Vec<FileOutcome>,
}

impl CompileReport {
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Object files produced by this stage.
    pub fn objects(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                FileStatus::Compiled { object } => Some(object.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn compiled_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Compiled { .. }))
            .count()
    }

    /// Every listed entry produced an object.
    ///
    /// Skipped entries still count against the total, so one ineligible or
    /// missing file fails the stage.
    pub fn succeeded(&self) -> bool {
        self.compiled_count() == self.outcomes.len()
    }

    /// Captured compiler stdout and stderr of the failed files, joined.
    pub fn diagnostics(&self) -> (String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        for outcome in &self.outcomes {
            if let FileStatus::Failed {
                stdout: out,
                stderr: err,
                ..
            } = &outcome.status
            {
                if !out.is_empty() {
                    stdout.push(out.as_str());
                }
                if !err.is_empty() {
                    stderr.push(err.as_str());
                }
            }
        }
        (stdout.join("\n"), stderr.join("\n"))
    }
}

#[derive(Debug)]
struct CompileJob {
    src: PathBuf,
    dst: PathBuf,
}

#[derive(Debug)]
enum Planned {
    Job(CompileJob),
    Skip(SkipReason),
}

fn plan(entry: &str, project_dir: &Path, work_dir: &Path) -> Planned {
    let (_, name) = path_components(entry);
    if name.is_empty() {
        return Planned::Skip(SkipReason::EmptyName);
    }

    let (base, ext) = name_components(name);
    if !is_source_extension(ext) {
        return Planned::Skip(SkipReason::Ineligible {
            extension: ext.to_string(),
        });
    }

    Planned::Job(CompileJob {
        src: project_dir.join(entry),
        dst: work_dir.join(format!("{}.o", base)),
    })
}

/// Compiler arguments: `-c <src> -o <dst>`, custom flags, then global flags.
pub fn compile_args(
    src: &Path,
    dst: &Path,
    custom_flags: &[String],
    global_flags: &[String],
) -> Vec<String> {
    let mut args = vec![
        "-c".to_string(),
        src.to_string_lossy().to_string(),
        "-o".to_string(),
        dst.to_string_lossy().to_string(),
    ];
    args.extend(custom_flags.iter().cloned());
    args.extend(global_flags.iter().cloned());
    args
}

/// Compiles every eligible entry of `spec.source_files` into `work_dir`.
///
/// Each eligible entry gets its own worker thread. All workers run to
/// completion; a failing file never cancels the others.
pub fn compile(
    spec: &BuildSpec,
    work_dir: &Path,
    global_flags: &[String],
    tool: &dyn Tool,
    pb: &ProgressBar,
) -> CompileReport {
    let planned: Vec<(&str, Planned)> = spec
        .source_files
        .iter()
        .map(|entry| {
            let p = plan(entry, &spec.project_directory, work_dir);
            (entry.as_str(), p)
        })
        .collect();

    let workers = planned
        .iter()
        .filter(|(_, p)| matches!(p, Planned::Job(_)))
        .count();
    pb.set_length(workers as u64);

    let run = || {
        planned
            .par_iter()
            .map(|(entry, p)| {
                let status = match p {
                    Planned::Skip(reason) => FileStatus::Skipped(reason.clone()),
                    Planned::Job(job) => {
                        let status =
                            compile_file(job, &spec.custom_compile_flags, global_flags, tool, pb);
                        pb.inc(1);
                        status
                    }
                };
                FileOutcome {
                    source: entry.to_string(),
                    status,
                }
            })
            .collect::<Vec<_>>()
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("compile-{}", i))
        .build();

    let outcomes = match pool {
        Ok(pool) => pool.install(run),
        Err(e) => {
            tracing::warn!("cannot start compile workers, using the global pool: {}", e);
            run()
        }
    };

    CompileReport { outcomes }
}

/// Prints a diagnostic line without tearing the bar; a hidden bar prints straight to stdout.
fn print_above(pb: &ProgressBar, line: impl AsRef<str>) {
    pb.suspend(|| println!("{}", line.as_ref()));
}

fn compile_file(
    job: &CompileJob,
    custom_flags: &[String],
    global_flags: &[String],
    tool: &dyn Tool,
    pb: &ProgressBar,
) -> FileStatus {
    if !job.src.is_file() {
        print_above(
            pb,
            format!("{} File not exists ({})", "x".red(), job.src.display()),
        );
        return FileStatus::Missing {
            path: job.src.clone(),
        };
    }

    if let Some(name) = job.src.file_name() {
        pb.set_message(format!("Compiling {}", name.to_string_lossy()));
    }

    let args = compile_args(&job.src, &job.dst, custom_flags, global_flags);
    let output = match tool.run(&args) {
        Ok(output) => output,
        Err(e) => {
            print_above(
                pb,
                format!(
                    "{} Failed to execute {} for {}: {}",
                    "x".red(),
                    tool.name(),
                    job.src.display(),
                    e
                ),
            );
            return FileStatus::Failed {
                code: None,
                stdout: String::new(),
                stderr: e.to_string(),
            };
        }
    };

    if !output.stdout.is_empty() {
        print_above(pb, &output.stdout);
    }

    if !output.stderr.is_empty() {
        print_above(
            pb,
            format!("{} {}:\n{}", "x".red(), job.src.display(), output.stderr),
        );
    } else if !output.status_ok {
        print_above(
            pb,
            format!(
                "{} {} exited with {:?} for {}",
                "x".red(),
                tool.name(),
                output.code,
                job.src.display()
            ),
        );
    }

    if output.is_clean() {
        FileStatus::Compiled {
            object: job.dst.clone(),
        }
    } else {
        FileStatus::Failed {
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}
