//! # opcall
//!
//! Explore an OpenAPI-style spec from the terminal and fire one request.
//!
//! ## Flow
//! - Discover spec files under a root directory (names or glob patterns)
//! - Load the chosen spec, expanding local `$ref` parameters and bodies
//! - Pick an endpoint, optionally seeded from a saved preset
//! - Fill in path, query and body values, then send and show the result
//!
//! ## Architecture
//! An explicit state machine (`session::Session::step`) drives the flow.
//! Operator interaction, HTTP and output sit behind the `Prompter`,
//! `Transport` and `Renderer` traits so the whole session runs in tests
//! without a terminal or network.

pub mod config;
pub mod constants;
pub mod error;
pub mod presets;
pub mod render;
pub mod request;
pub mod session;
pub mod spec;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use error::{AssemblyError, ConfigError, LoadError, PresetError, ResolveError, SessionError};
pub use presets::{PresetStore, StoredParams};
pub use request::{assemble, Assembly, FormValues, HttpTransport, InputResult, Transport, ValueProvider};
pub use session::{Prompter, Renderer, Session, SessionEnd, SessionOptions, SessionState};
pub use spec::{discover, load_spec, resolve, Endpoint, SpecDocument};
