//! Local `$ref` expansion
//!
//! Only `#/components/parameters/<name>` and
//! `#/components/requestBodies/<name>` are understood, one level deep.
//! A referenced component is taken as-is even if it carries its own `$ref`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{RefSite, ResolveError, ResolveErrorKind};
use crate::spec::models::{
    Components, Operation, Parameter, RawDocument, RawOperation, RawParameter, RawRequestBody,
    RequestBody, SpecDocument,
};

const PARAMETERS_KIND: &str = "parameters";
const REQUEST_BODIES_KIND: &str = "requestBodies";

fn local_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#/components/([^/]+)/(.+)$").expect("local ref pattern is valid")
    })
}

/// Split a local reference into `(kind, name)`
fn parse_local_ref(reference: &str, site: RefSite) -> Result<(String, String), ResolveErrorKind> {
    let caps = local_ref_pattern()
        .captures(reference.trim())
        .ok_or_else(|| ResolveErrorKind::InvalidReferenceFormat {
            site,
            reference: reference.to_string(),
        })?;

    Ok((caps[1].to_string(), caps[2].to_string()))
}

fn has_ref(reference: &str) -> bool {
    !reference.trim().is_empty()
}

/// Expand every local reference in `raw`.
///
/// The components registry is consumed; the first failure aborts the
/// whole document.
pub fn resolve(raw: RawDocument) -> Result<SpecDocument, ResolveError> {
    let RawDocument {
        base_url,
        paths,
        components,
    } = raw;

    let mut resolved = BTreeMap::new();
    for (path, methods) in paths {
        let mut out = BTreeMap::new();
        for (method, op) in methods {
            let operation = resolve_operation(op, &components).map_err(|kind| ResolveError {
                method: method.to_uppercase(),
                path: path.clone(),
                kind,
            })?;
            out.insert(method, operation);
        }
        resolved.insert(path, out);
    }

    Ok(SpecDocument {
        base_url,
        paths: resolved,
    })
}

fn resolve_operation(op: RawOperation, components: &Components) -> Result<Operation, ResolveErrorKind> {
    let parameters = op
        .parameters
        .iter()
        .map(|p| resolve_parameter(p, components))
        .collect::<Result<Vec<_>, _>>()?;

    let request_body = op
        .request_body
        .map(|body| resolve_request_body(body, components))
        .transpose()?;

    Ok(Operation {
        summary: op.summary,
        parameters,
        request_body,
        responses: op.responses,
    })
}

fn resolve_parameter(
    param: &RawParameter,
    components: &Components,
) -> Result<Parameter, ResolveErrorKind> {
    if !has_ref(&param.reference) {
        return Ok(param.inline());
    }

    let site = RefSite::Parameter;
    let (kind, name) = parse_local_ref(&param.reference, site)?;
    if kind != PARAMETERS_KIND {
        return Err(ResolveErrorKind::UnsupportedReferenceKind { site, kind });
    }

    components
        .parameters
        .get(&name)
        .cloned()
        .ok_or_else(|| ResolveErrorKind::UnresolvedReference {
            site,
            reference: param.reference.clone(),
        })
}

fn resolve_request_body(
    body: RawRequestBody,
    components: &Components,
) -> Result<RequestBody, ResolveErrorKind> {
    if !has_ref(&body.reference) {
        return Ok(RequestBody {
            content: body.content,
        });
    }

    let site = RefSite::RequestBody;
    let (kind, name) = parse_local_ref(&body.reference, site)?;
    if kind != REQUEST_BODIES_KIND {
        return Err(ResolveErrorKind::UnsupportedReferenceKind { site, kind });
    }

    components
        .request_bodies
        .get(&name)
        .cloned()
        .ok_or(ResolveErrorKind::UnresolvedReference {
            site,
            reference: body.reference,
        })
}
