use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up when none is given on the command line
pub const DEFAULT_CONFIG_FILE_NAME: &str = "gtkmmcargo.cfg";

/// Scratch directory (under the project) used when none is configured
pub const DEFAULT_WORKING_DIRECTORY: &str = ".gtkmmcargo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is empty")]
    Empty { path: PathBuf },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot create working directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot serialize build specification: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything needed to build one executable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BuildSpec {
    pub project_directory: PathBuf,
    pub working_directory: PathBuf,
    pub executable_name: String,
    /// Paths relative to `project_directory`
    pub source_files: Vec<String>,
    pub custom_compile_flags: Vec<String>,
    pub custom_link_flags: Vec<String>,
    /// Prebuilt objects linked in after the compiled ones
    #[serde(rename = "external_object_files")]
    pub external_objects: Vec<PathBuf>,
}

impl BuildSpec {
    /// An empty specification with the default C++ flags filled in.
    pub fn new() -> Self {
        Self {
            custom_compile_flags: vec!["-Wall".into(), "-std=c++17".into(), "-O3".into()],
            ..Default::default()
        }
    }

    /// Loads and resolves a specification, reporting any failure once.
    ///
    /// `None` means there is nothing to build.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        match Self::try_load(path.as_ref()) {
            Ok(spec) => Some(spec),
            Err(e) => {
                tracing::debug!(error = ?e, "no build specification");
                println!("{} {}", "x".red(), e);
                None
            }
        }
    }

    /// Reads `path`, resolves the working directory, and creates it.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if data.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
            });
        }

        let mut spec: BuildSpec =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        spec.working_directory = spec.resolved_working_directory();
        spec.ensure_working_directory()?;
        Ok(spec)
    }

    /// Writes the specification as pretty JSON, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let mut data = to_pretty_json(self).map_err(ConfigError::Serialize)?;
        data.push(b'\n');
        fs::write(path, data).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where object files go.
    ///
    /// Empty → `<project>/.gtkmmcargo`; absolute → as-is; relative → under the project.
    pub fn resolved_working_directory(&self) -> PathBuf {
        if self.working_directory.as_os_str().is_empty() {
            self.project_directory.join(DEFAULT_WORKING_DIRECTORY)
        } else if self.working_directory.is_absolute() {
            self.working_directory.clone()
        } else {
            self.project_directory.join(&self.working_directory)
        }
    }

    /// Creates the resolved working directory if it does not exist yet.
    pub fn ensure_working_directory(&self) -> Result<PathBuf, ConfigError> {
        let dir = self.resolved_working_directory();
        fs::create_dir_all(&dir).map_err(|source| ConfigError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Final executable location.
    pub fn executable_path(&self) -> PathBuf {
        self.project_directory.join(&self.executable_name)
    }
}

fn to_pretty_json(spec: &BuildSpec) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"   ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    spec.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_has_default_flags() {
        let spec = BuildSpec::new();
        assert_eq!(spec.custom_compile_flags, vec!["-Wall", "-std=c++17", "-O3"]);
        assert!(spec.source_files.is_empty());
        assert!(spec.custom_link_flags.is_empty());
        assert!(spec.external_objects.is_empty());
        assert!(spec.executable_name.is_empty());
    }

    #[test]
    fn test_resolve_empty_working_directory() {
        let spec = BuildSpec {
            project_directory: PathBuf::from("/home/user/app"),
            ..BuildSpec::new()
        };
        assert_eq!(
            spec.resolved_working_directory(),
            PathBuf::from("/home/user/app/.gtkmmcargo")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_absolute_working_directory() {
        let spec = BuildSpec {
            project_directory: PathBuf::from("/home/user/app"),
            working_directory: PathBuf::from("/tmp/objs"),
            ..BuildSpec::new()
        };
        assert_eq!(spec.resolved_working_directory(), PathBuf::from("/tmp/objs"));
    }

    #[test]
    fn test_resolve_relative_working_directory() {
        let spec = BuildSpec {
            project_directory: PathBuf::from("/home/user/app"),
            working_directory: PathBuf::from("build/obj"),
            ..BuildSpec::new()
        };
        assert_eq!(
            spec.resolved_working_directory(),
            PathBuf::from("/home/user/app/build/obj")
        );
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(BuildSpec::load(tmp.path().join("nope.cfg")).is_none());
    }

    #[test]
    fn test_load_empty_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE_NAME);
        fs::write(&path, "  \n").unwrap();
        assert!(matches!(
            BuildSpec::try_load(&path),
            Err(ConfigError::Empty { .. })
        ));
        assert!(BuildSpec::load(&path).is_none());
    }

    #[test]
    fn test_load_malformed_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE_NAME);
        fs::write(&path, "{ \"source_files\": [ ").unwrap();
        assert!(matches!(
            BuildSpec::try_load(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(BuildSpec::load(&path).is_none());
    }

    #[test]
    fn test_load_creates_default_working_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE_NAME);
        let json = serde_json::json!({
            "project_directory": tmp.path(),
            "executable_name": "app",
            "source_files": ["main.cc"],
        });
        fs::write(&path, json.to_string()).unwrap();

        let spec = BuildSpec::load(&path).unwrap();
        let expected = tmp.path().join(DEFAULT_WORKING_DIRECTORY);
        assert_eq!(spec.working_directory, expected);
        assert!(expected.is_dir());
        // Missing keys fall back to empty values
        assert!(spec.custom_compile_flags.is_empty());
        assert_eq!(spec.source_files, vec!["main.cc"]);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE_NAME);
        let spec = BuildSpec {
            project_directory: tmp.path().to_path_buf(),
            working_directory: tmp.path().join("objs"),
            executable_name: "testapp".into(),
            source_files: vec!["main.cc".into(), "src/window.cpp".into()],
            custom_link_flags: vec!["-lm".into()],
            external_objects: vec![tmp.path().join("vendor/extra.o")],
            ..BuildSpec::new()
        };

        spec.save(&path).unwrap();
        let loaded = BuildSpec::load(&path).unwrap();
        assert_eq!(loaded, spec);
    }

    #[test]
    fn test_save_uses_documented_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE_NAME);
        BuildSpec::new().save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        for key in [
            "project_directory",
            "working_directory",
            "executable_name",
            "source_files",
            "custom_compile_flags",
            "custom_link_flags",
            "external_object_files",
        ] {
            assert!(text.contains(&format!("\"{key}\"")), "missing key {key}");
        }
        assert!(text.contains("\n   \"project_directory\""));
    }

    #[test]
    fn test_executable_path() {
        let spec = BuildSpec {
            project_directory: PathBuf::from("/p"),
            executable_name: "app".into(),
            ..BuildSpec::new()
        };
        assert_eq!(spec.executable_path(), PathBuf::from("/p/app"));
    }
}
