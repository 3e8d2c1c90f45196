//! Request assembly: path substitution, query string, raw body

use std::collections::BTreeMap;
use std::io::Cursor;

use url::Url;

use crate::error::AssemblyError;
use crate::spec::{Endpoint, Parameter, ParameterLocation};

/// Source of values for one assembly: a form, a preset replay, a script
pub trait ValueProvider {
    fn path_value(&mut self, param: &Parameter) -> String;
    fn query_value(&mut self, param: &Parameter) -> String;
    fn body(&mut self) -> String;
    /// Checked at every phase boundary
    fn is_canceled(&self) -> bool;
}

/// Values produced by a parameter-collection step
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormValues {
    pub path: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: String,
    /// Save these values as a preset after a successful send
    pub recording: bool,
}

/// Replays a fixed set of values
#[derive(Clone, Debug, Default)]
pub struct PrefilledProvider {
    values: FormValues,
    canceled: bool,
}

impl PrefilledProvider {
    pub fn new(values: FormValues) -> Self {
        PrefilledProvider {
            values,
            canceled: false,
        }
    }

    /// Provider for an abandoned collection step
    pub fn canceled() -> Self {
        PrefilledProvider {
            values: FormValues::default(),
            canceled: true,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn into_values(self) -> FormValues {
        self.values
    }
}

impl ValueProvider for PrefilledProvider {
    fn path_value(&mut self, param: &Parameter) -> String {
        self.values.path.get(&param.name).cloned().unwrap_or_default()
    }

    fn query_value(&mut self, param: &Parameter) -> String {
        self.values.query.get(&param.name).cloned().unwrap_or_default()
    }

    fn body(&mut self) -> String {
        self.values.body.clone()
    }

    fn is_canceled(&self) -> bool {
        self.canceled
    }
}

/// A concrete request target
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputResult {
    /// Fully substituted, query-encoded URL
    pub url: String,
    pub raw_body: String,
}

impl InputResult {
    /// Fresh reader over the body bytes
    pub fn body_reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.raw_body.as_bytes())
    }

    pub fn body_bytes(&self) -> Vec<u8> {
        self.raw_body.as_bytes().to_vec()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Assembly {
    Ready(InputResult),
    Canceled,
}

impl Assembly {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Assembly::Canceled)
    }
}

/// Build the request target for `endpoint` from `provider`'s values.
///
/// Only the first `{name}` occurrence of each path placeholder is replaced.
/// Blank query values are left out. The body is requested only when the
/// operation declares one.
pub fn assemble(
    base_url: &str,
    endpoint: &Endpoint,
    provider: &mut impl ValueProvider,
) -> Result<Assembly, AssemblyError> {
    if provider.is_canceled() {
        return Ok(Assembly::Canceled);
    }

    // Path phase
    let mut path = endpoint.path.clone();
    for param in endpoint.parameters_in(ParameterLocation::Path) {
        let value = provider.path_value(param);
        path = path.replacen(&format!("{{{}}}", param.name), &value, 1);
    }
    if provider.is_canceled() {
        return Ok(Assembly::Canceled);
    }

    let raw_url = format!("{}{}", base_url, path);
    let mut url = Url::parse(&raw_url).map_err(|source| AssemblyError::InvalidUrl {
        url: raw_url.clone(),
        source,
    })?;

    // Query phase
    let mut query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for param in endpoint.parameters_in(ParameterLocation::Query) {
        let value = provider.query_value(param);
        if !value.is_empty() {
            query.retain(|(key, _)| *key != param.name);
            query.push((param.name.clone(), value));
        }
    }
    // stable: repeated keys keep their relative order
    query.sort_by(|a, b| a.0.cmp(&b.0));
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&query);
    }
    if provider.is_canceled() {
        return Ok(Assembly::Canceled);
    }

    // Body phase
    let raw_body = if endpoint.operation.has_body() {
        provider.body()
    } else {
        String::new()
    };
    if provider.is_canceled() {
        return Ok(Assembly::Canceled);
    }

    Ok(Assembly::Ready(InputResult {
        url: url.to_string(),
        raw_body,
    }))
}
