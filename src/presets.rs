use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::PRESET_FILE_NAME;
use crate::error::PresetError;
use crate::request::FormValues;
use crate::spec::{preset_key, Endpoint, ParameterLocation};

/// One recorded set of values for an endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredParams {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub path: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(rename = "recordedAt", default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl StoredParams {
    /// Snapshot what was just sent: every path value, the query values
    /// that went out (non-empty), and the body when the operation takes one
    pub fn capture(endpoint: &Endpoint, values: &FormValues) -> Self {
        let path = endpoint
            .parameters_in(ParameterLocation::Path)
            .map(|p| (p.name.clone(), values.path.get(&p.name).cloned().unwrap_or_default()))
            .collect();

        let query = endpoint
            .parameters_in(ParameterLocation::Query)
            .filter_map(|p| {
                values
                    .query
                    .get(&p.name)
                    .filter(|v| !v.is_empty())
                    .map(|v| (p.name.clone(), v.clone()))
            })
            .collect();

        let body = if endpoint.operation.has_body() {
            values.body.clone()
        } else {
            String::new()
        };

        StoredParams {
            path,
            query,
            body,
            recorded_at: Some(Utc::now()),
        }
    }

    /// Seed for the parameter form; recording starts off
    pub fn to_form_values(&self) -> FormValues {
        FormValues {
            path: self.path.clone(),
            query: self.query.clone(),
            body: self.body.clone(),
            recording: false,
        }
    }

    /// Picker title: local record time
    pub fn title(&self) -> String {
        match self.recorded_at {
            Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "Saved preset".to_string(),
        }
    }

    /// Picker description, e.g. `Path id=42  Query q=x  Body 12 chars`
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.path.is_empty() {
            parts.push(format!("Path {}", join_pairs(&self.path)));
        }
        if !self.query.is_empty() {
            parts.push(format!("Query {}", join_pairs(&self.query)));
        }
        if self.body.trim().is_empty() {
            parts.push("Body empty".to_string());
        } else {
            parts.push(format!("Body {} chars", self.body.chars().count()));
        }
        parts.join("  ")
    }
}

fn join_pairs(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Previously entered parameter sets, keyed by `"METHOD /path/{template}"`
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    data: BTreeMap<String, Vec<StoredParams>>,
}

impl PresetStore {
    /// Load the preset file under `dir`. A missing or empty file is an
    /// empty store; unparsable content is an error.
    pub fn load(dir: &Path) -> Result<Self, PresetError> {
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        let path = dir.join(PRESET_FILE_NAME);

        let data = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| PresetError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PresetError::Io { path, source }),
        };

        Ok(PresetStore { path, data })
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Stored presets for an endpoint, oldest first
    pub fn presets_for(&self, method: &str, path: &str) -> Vec<StoredParams> {
        self.data
            .get(&preset_key(method, path))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_presets(&self, method: &str, path: &str) -> bool {
        self.data
            .get(&preset_key(method, path))
            .is_some_and(|items| !items.is_empty())
    }

    /// Append a preset and rewrite the whole file
    pub fn append_preset(&mut self, method: &str, path: &str, preset: &StoredParams) -> Result<(), PresetError> {
        self.data
            .entry(preset_key(method, path))
            .or_default()
            .push(preset.clone());
        self.persist()
    }

    fn persist(&self) -> Result<(), PresetError> {
        let payload = serde_json::to_string_pretty(&self.data).map_err(PresetError::Encode)?;
        fs::write(&self.path, payload).map_err(|source| PresetError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "Presets saved");
        Ok(())
    }
}
