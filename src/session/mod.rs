//! Interactive session - one explicit state per step, driven by `Session::step`

pub mod controller;
pub mod prompter;
pub mod state;

pub use controller::{Session, SessionOptions};
pub use prompter::{EndpointChoice, FormOutcome, PresetChoice, Prompter, Renderer};
pub use state::{SessionEnd, SessionState};
