use crate::build::{is_source_extension, name_components};
use crate::config::BuildSpec;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Builds a template specification for the project rooted at `path`.
///
/// Every compilable file below `path` (hidden directories excluded, so the
/// scratch directory is never picked up) is listed relative to the root.
pub fn scan_project(path: &Path) -> Result<BuildSpec> {
    println!("{} Scanning {}...", "⚡".yellow(), path.display());

    let mut sources = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let (_, ext) = name_components(&name);
        if !is_source_extension(ext) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(path)
            .with_context(|| format!("{} is outside {}", entry.path().display(), path.display()))?;
        sources.push(rel.to_string_lossy().to_string());
    }

    if sources.is_empty() {
        println!("{} No C/C++ source files found.", "!".yellow());
    }

    let executable_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "app".to_string());

    Ok(BuildSpec {
        project_directory: path.to_path_buf(),
        executable_name,
        source_files: sources,
        ..BuildSpec::new()
    })
}
