//! Optional YAML config: which file names count as spec documents

use std::fs;
use std::path::{Component, Path};

use serde::Deserialize;

use crate::constants::{CONFIG_CANDIDATES, DEFAULT_SPEC_NAMES, USER_CONFIG_DIR, USER_CONFIG_FILE};
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Config {
    /// File names or glob patterns used by spec discovery
    #[serde(default)]
    pub spec_files: Vec<String>,
}

impl Config {
    /// Load the first config candidate found in `root`, falling back to the
    /// per-user config. No config at all is not an error.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let local = CONFIG_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file());

        let user = dirs::config_dir()
            .map(|dir| dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
            .filter(|path| path.is_file());

        match local.or(user) {
            Some(path) => Self::from_file(&path),
            None => Ok(Config::default()),
        }
    }

    /// Parse a specific config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), patterns = config.spec_files.len(), "Loaded config");
        Ok(config)
    }

    /// Patterns handed to spec discovery.
    ///
    /// An empty list means the built-in names. Entries are path-cleaned;
    /// a blank entry is rejected rather than silently matching nothing.
    pub fn spec_patterns(&self) -> Result<Vec<String>, ConfigError> {
        if self.spec_files.is_empty() {
            return Ok(DEFAULT_SPEC_NAMES.iter().map(|s| s.to_string()).collect());
        }

        self.spec_files
            .iter()
            .map(|entry| {
                if entry.trim().is_empty() {
                    Err(ConfigError::EmptySpecFileEntry)
                } else {
                    Ok(clean_pattern(entry))
                }
            })
            .collect()
    }
}

/// Lexically normalize a pattern: drop `.` segments, collapse repeated
/// separators and resolve `..` where a parent segment exists.
fn clean_pattern(pattern: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;

    for component in Path::new(pattern).components() {
        match component {
            Component::RootDir => absolute = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
