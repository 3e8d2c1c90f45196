//! Spec loading: read, decode, resolve, validate

use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::spec::models::{RawDocument, SpecDocument};
use crate::spec::resolver::resolve;

/// Decode a YAML spec from text and expand its local references
pub fn parse_spec(content: &str) -> Result<SpecDocument, LoadError> {
    let raw: RawDocument = if content.trim().is_empty() {
        RawDocument::default()
    } else {
        serde_yaml::from_str(content)?
    };

    let doc = resolve(raw)?;
    if doc.base_url.trim().is_empty() {
        return Err(LoadError::MissingBaseUrl);
    }

    Ok(doc)
}

/// Load the spec at `path`
pub fn load_spec(path: &Path) -> Result<SpecDocument, LoadError> {
    let content = fs::read_to_string(path)?;
    let doc = parse_spec(&content)?;

    tracing::info!(
        path = %path.display(),
        base_url = %doc.base_url,
        paths = doc.paths.len(),
        "Loaded spec"
    );
    Ok(doc)
}
