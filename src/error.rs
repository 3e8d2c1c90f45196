//! Error types for every fatal stage of a session

use std::path::PathBuf;
use thiserror::Error;

/// Config file problems
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config.spec_files contains an empty entry")]
    EmptySpecFileEntry,
}

/// Where in an operation a reference appeared
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefSite {
    Parameter,
    RequestBody,
}

impl std::fmt::Display for RefSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefSite::Parameter => f.write_str("parameter"),
            RefSite::RequestBody => f.write_str("requestBody"),
        }
    }
}

/// Why a single `$ref` could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveErrorKind {
    #[error("invalid $ref format for {site}: {reference} (expected #/components/<kind>/<name>)")]
    InvalidReferenceFormat { site: RefSite, reference: String },

    #[error("unsupported $ref kind for {site}: {kind}")]
    UnsupportedReferenceKind { site: RefSite, kind: String },

    #[error("unresolved {site} ref: {reference}")]
    UnresolvedReference { site: RefSite, reference: String },
}

/// A resolution failure, annotated with the operation it came from
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("resolve {method} {path}: {kind}")]
pub struct ResolveError {
    pub method: String,
    pub path: String,
    pub kind: ResolveErrorKind,
}

/// Reading, decoding or resolving a spec document
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read spec: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to decode spec: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("spec has no base_url")]
    MissingBaseUrl,
}

/// Preset file problems
#[derive(Error, Debug)]
pub enum PresetError {
    #[error("preset file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preset file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode presets: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Turning collected values into a request target
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Fatal session failures; each variant names the stage that failed
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no spec file found under {}", .root.display())]
    NoSpecFound { root: PathBuf },

    #[error("spec discovery: {0}")]
    Discovery(#[from] walkdir::Error),

    #[error("loading {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("presets: {0}")]
    Presets(#[from] PresetError),

    #[error("request assembly: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("sending request: {0:#}")]
    Transport(anyhow::Error),

    #[error("terminal: {0:#}")]
    Prompt(anyhow::Error),

    #[error("rendering result: {0:#}")]
    Render(anyhow::Error),
}
