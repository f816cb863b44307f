//! Desired-state documents
//!
//! Documents are YAML (JSON is accepted as a subset). A single-kind document
//! maps resource names to definitions; a combined document for `sync` has
//! one section per kind.

use anyhow::{Context, Result, bail};
use reconcile::{ResourceMapping, mapping_from_value};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;

use crate::config::expand_path;
use crate::resource::Kind;

/// Read the document text from an inline argument or a file
///
/// Neither given means no document.
pub fn read_source(inline: Option<&str>, file: Option<&str>) -> Result<Option<String>> {
    match (inline, file) {
        (Some(_), Some(_)) => bail!("Pass either --desired or --file, not both"),
        (Some(text), None) => Ok(Some(text.to_string())),
        (None, Some(file)) => {
            let path = expand_path(file)?;
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            Ok(Some(text))
        }
        (None, None) => Ok(None),
    }
}

/// Parse document text into a structured value
///
/// Absent or blank text is `null`, same as an empty YAML document.
pub fn parse_value(text: Option<&str>) -> Result<Value> {
    match text {
        Some(text) if !text.trim().is_empty() => {
            serde_yaml::from_str(text).context("Desired state is not valid YAML")
        }
        _ => Ok(Value::Null),
    }
}

/// Parse a single-kind document
///
/// Absent, empty or `null` documents are an empty mapping, not an error.
pub fn parse_mapping(text: Option<&str>) -> Result<ResourceMapping> {
    let value = parse_value(text)?;
    to_mapping(value, "desired state")
}

fn to_mapping(value: Value, what: &str) -> Result<ResourceMapping> {
    let found = type_name(&value);
    match mapping_from_value(value) {
        Some(mapping) => Ok(mapping),
        None => bail!("The {what} must be a mapping of resource names, found {found}"),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Split a combined document into per-kind mappings
///
/// ```yaml
/// auth_methods:
///   people: {type: userpass}
/// policies:
///   ops: 'path "ops/*" { capabilities = ["read"] }'
/// userpasses:
///   alice: {auth_method: people, password: changeme}
/// ```
///
/// Missing sections are empty. Unknown sections are rejected so a typo does
/// not silently turn into "delete everything of that kind".
pub fn split_sections(text: Option<&str>) -> Result<BTreeMap<Kind, ResourceMapping>> {
    let value = parse_value(text)?;
    let mut sections = to_mapping(value, "combined document")?;

    let mut result = BTreeMap::new();
    for kind in Kind::ALL {
        let section = sections.remove(kind.document_key()).unwrap_or(Value::Null);
        let mapping = to_mapping(section, &format!("'{}' section", kind.document_key()))?;
        result.insert(kind, mapping);
    }

    if let Some(unknown) = sections.keys().next() {
        let known: Vec<_> = Kind::ALL.iter().map(Kind::document_key).collect();
        bail!(
            "Unknown section '{}' in combined document (expected one of: {})",
            unknown,
            known.join(", ")
        );
    }

    Ok(result)
}
