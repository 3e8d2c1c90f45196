//! Data models for spec documents, before and after reference resolution

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameter location in request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", default)]
    pub schema_type: String,
}

/// A fully resolved parameter
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: ParameterSchema,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation, schema_type: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            location,
            required: false,
            schema: ParameterSchema {
                schema_type: schema_type.into(),
            },
        }
    }

    pub fn schema_type(&self) -> &str {
        &self.schema.schema_type
    }

    /// Form label, e.g. `id (integer)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.schema_type())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaTypeObject {
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub schema: serde_json::Value,
}

/// Request body; the session only cares that it exists
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: BTreeMap<String, MediaTypeObject>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    #[serde(default)]
    pub description: String,
}

/// One `(path, method)` entry of a resolved document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseDescriptor>,
}

impl Operation {
    pub fn has_body(&self) -> bool {
        self.request_body.is_some()
    }
}

/// A spec document with every local reference expanded
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpecDocument {
    pub base_url: String,
    pub paths: BTreeMap<String, BTreeMap<String, Operation>>,
}

impl SpecDocument {
    /// Every `(path, method)` pair, sorted by method and then by path
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let mut endpoints: Vec<Endpoint> = self
            .paths
            .iter()
            .flat_map(|(path, methods)| {
                methods
                    .iter()
                    .map(move |(method, op)| Endpoint::new(method.clone(), path.clone(), op.clone()))
            })
            .collect();

        endpoints.sort_by(|a, b| a.method.cmp(&b.method).then_with(|| a.path.cmp(&b.path)));
        endpoints
    }
}

/// The operator's choice for one session step
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    /// HTTP method as written in the document
    pub method: String,
    /// Path template (e.g., "/users/{id}")
    pub path: String,
    pub operation: Operation,
}

impl Endpoint {
    pub fn new(method: impl Into<String>, path: impl Into<String>, operation: Operation) -> Self {
        Endpoint {
            method: method.into(),
            path: path.into(),
            operation,
        }
    }

    pub fn method_upper(&self) -> String {
        self.method.to_uppercase()
    }

    /// Preset key: uppercase method plus the path template
    pub fn key(&self) -> String {
        preset_key(&self.method, &self.path)
    }

    /// List title, e.g. `GET /users/{id}`
    pub fn title(&self) -> String {
        format!("{} {}", self.method_upper(), self.path)
    }

    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
        self.operation
            .parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}

pub fn preset_key(method: &str, path: &str) -> String {
    format!("{} {}", method.to_uppercase(), path)
}

// ============================================================================
// Raw shapes, as decoded from YAML before `$ref` expansion
// ============================================================================

/// Parameter entry that may be a `$ref`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawParameter {
    #[serde(rename = "$ref", default)]
    pub reference: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: ParameterSchema,
}

impl RawParameter {
    pub fn inline(&self) -> Parameter {
        Parameter {
            name: self.name.clone(),
            location: self.location.clone(),
            required: self.required,
            schema: self.schema.clone(),
        }
    }
}

impl From<Parameter> for RawParameter {
    fn from(p: Parameter) -> Self {
        RawParameter {
            reference: String::new(),
            name: p.name,
            location: p.location,
            required: p.required,
            schema: p.schema,
        }
    }
}

/// Request body entry that may be a `$ref`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawRequestBody {
    #[serde(rename = "$ref", default)]
    pub reference: String,
    #[serde(default)]
    pub content: BTreeMap<String, MediaTypeObject>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawOperation {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    #[serde(rename = "requestBody", default)]
    pub request_body: Option<RawRequestBody>,
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseDescriptor>,
}

/// Shared definitions that `$ref` entries point into
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,
    #[serde(rename = "requestBodies", default)]
    pub request_bodies: BTreeMap<String, RequestBody>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub paths: BTreeMap<String, BTreeMap<String, RawOperation>>,
    #[serde(default)]
    pub components: Components,
}
