//! Session states - pure data, one variant per workflow step

use std::path::PathBuf;

use crate::request::{Exchange, FormValues, InputResult};
use crate::spec::Endpoint;

/// How a session ended without error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// Request sent and result displayed
    Completed,
    /// Operator backed out at an interactive step
    Canceled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    DiscoveringSpec,
    SelectingSpec,
    LoadingSpec(PathBuf),
    SelectingEndpoint,
    SelectingPreset(Endpoint),
    CollectingParams {
        endpoint: Endpoint,
        seed: FormValues,
    },
    Sending {
        endpoint: Endpoint,
        input: InputResult,
        values: FormValues,
    },
    Displaying(Exchange),
    Finished(SessionEnd),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::DiscoveringSpec => "DiscoveringSpec",
            SessionState::SelectingSpec => "SelectingSpec",
            SessionState::LoadingSpec(_) => "LoadingSpec",
            SessionState::SelectingEndpoint => "SelectingEndpoint",
            SessionState::SelectingPreset(_) => "SelectingPreset",
            SessionState::CollectingParams { .. } => "CollectingParams",
            SessionState::Sending { .. } => "Sending",
            SessionState::Displaying(_) => "Displaying",
            SessionState::Finished(_) => "Finished",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Finished(_))
    }
}
