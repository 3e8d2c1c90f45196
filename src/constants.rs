//! Application constants
//!
//! Centralized location for built-in file names and defaults.

/// Spec file names searched for when no config overrides them
pub const DEFAULT_SPEC_NAMES: &[&str] = &["api_spec.yml", "spec.yml", "openapi.yml", "openapi.yaml"];

/// Config files looked up in the session root, first match wins
pub const CONFIG_CANDIDATES: &[&str] = &[".opcall.yml", ".opcall.yaml", "opcall.yml", "opcall.yaml"];

/// Directory and file name of the per-user config fallback
pub const USER_CONFIG_DIR: &str = "opcall";
pub const USER_CONFIG_FILE: &str = "config.yml";

/// Preset file kept in the session root
pub const PRESET_FILE_NAME: &str = ".opcall_params";

/// Default log file (the terminal belongs to the UI)
pub const DEFAULT_LOG_FILE: &str = "opcall.log";

/// Application name
pub const APP_NAME: &str = "opcall";
