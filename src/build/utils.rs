use std::path::MAIN_SEPARATOR;

/// Extensions compiled to object files
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Splits `path` on its last separator into `(directory, name)`.
///
/// A trailing separator yields an empty name; no separator yields an empty directory.
pub fn path_components(path: &str) -> (&str, &str) {
    match path.rfind(MAIN_SEPARATOR) {
        Some(idx) if idx < path.len() - 1 => (&path[..idx], &path[idx + 1..]),
        Some(_) => (path, ""),
        None => ("", path),
    }
}

/// Splits a file name on its last `.` into `(base, extension)`.
///
/// A name without a dot, or ending in one, has an empty extension.
pub fn name_components(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx < name.len() - 1 => (&name[..idx], &name[idx + 1..]),
        _ => (name, ""),
    }
}

pub fn is_source_extension(ext: &str) -> bool {
    SOURCE_EXTENSIONS.contains(&ext)
}
