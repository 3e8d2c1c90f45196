//! Operator-facing collaborators of a session

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::presets::StoredParams;
use crate::request::{Exchange, FormValues, PrefilledProvider};
use crate::spec::Endpoint;

/// Decision taken in the endpoint list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndpointChoice {
    Selected(usize),
    /// Go back to spec selection
    SwitchSpec,
    /// Nothing selected, end the session
    Quit,
}

/// Decision taken in the preset list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresetChoice {
    /// Open the form with empty fields
    Fresh,
    Preset(usize),
    Back,
    Cancel,
    /// End the session
    Quit,
}

/// Result of the parameter form
#[derive(Clone, Debug, PartialEq)]
pub enum FormOutcome {
    Submitted(FormValues),
    /// Abandon this attempt and pick another endpoint
    Canceled,
    /// Abandon this attempt and end the session
    Quit,
}

impl FormOutcome {
    pub fn is_quit(&self) -> bool {
        matches!(self, FormOutcome::Quit)
    }

    pub fn into_provider(self) -> PrefilledProvider {
        match self {
            FormOutcome::Submitted(values) => PrefilledProvider::new(values),
            FormOutcome::Canceled | FormOutcome::Quit => PrefilledProvider::canceled(),
        }
    }
}

/// Blocking interactive steps. Each call returns the operator's decision.
pub trait Prompter {
    /// `None` means the operator backed out
    fn select_spec(&mut self, candidates: &[PathBuf]) -> Result<Option<PathBuf>>;

    fn select_endpoint(&mut self, spec_path: &Path, endpoints: &[Endpoint]) -> Result<EndpointChoice>;

    fn select_preset(&mut self, endpoint: &Endpoint, presets: &[StoredParams]) -> Result<PresetChoice>;

    /// `seed` pre-fills the form (empty unless a preset was chosen)
    fn collect_params(&mut self, endpoint: &Endpoint, seed: &FormValues) -> Result<FormOutcome>;
}

/// Shows the finished exchange
pub trait Renderer {
    fn render(&mut self, exchange: &Exchange) -> Result<()>;
}
