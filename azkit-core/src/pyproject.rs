//! Reader for Python `pyproject.toml` manifests.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use toml::{Table, Value};
use tracing::{error, info};

/// Everything from the first version operator or space onwards is not part
/// of a requirement's name, e.g. `aiohttp>=3.11.18`.
static NAME_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>= ]").expect("Invalid regex pattern"));

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default)]
pub struct PyprojectParser {
    data: Option<Table>,
}

impl PyprojectParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_default(&mut self) -> Result<&Table, ManifestError> {
        self.parse("pyproject.toml")
    }

    /// Parse `path`, replacing any previously parsed manifest.
    pub fn parse(&mut self, path: impl AsRef<Path>) -> Result<&Table, ManifestError> {
        let path = path.as_ref();
        self.data = None;
        let content = std::fs::read_to_string(path).map_err(|source| {
            error!(error = %source, path = %path.display(), "Failed to read manifest");
            ManifestError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let table = toml::from_str::<Table>(&content).map_err(|source| {
            error!(error = %source, path = %path.display(), "Failed to parse manifest");
            ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!(path = %path.display(), "Parsed manifest");
        Ok(&*self.data.insert(table))
    }

    pub fn data(&self) -> Option<&Table> {
        self.data.as_ref()
    }

    fn project(&self) -> Option<&Table> {
        self.data.as_ref()?.get("project")?.as_table()
    }

    fn project_str(&self, key: &str) -> Option<&str> {
        self.project()?.get(key)?.as_str()
    }

    pub fn name(&self) -> Option<&str> {
        self.project_str("name")
    }

    pub fn version(&self) -> Option<&str> {
        self.project_str("version")
    }

    pub fn description(&self) -> Option<&str> {
        self.project_str("description")
    }

    /// Raw requirement strings from `[project].dependencies`.
    pub fn dependencies(&self) -> Vec<String> {
        self.project()
            .and_then(|p| p.get("dependencies"))
            .and_then(Value::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sorted, de-duplicated package names of the dependencies.
    pub fn dependency_names(&self) -> Vec<String> {
        self.dependencies()
            .iter()
            .map(|dep| requirement_name(dep))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn requirement_name(requirement: &str) -> String {
    NAME_TERMINATOR
        .split(requirement)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
