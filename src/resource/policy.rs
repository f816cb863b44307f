//! ACL policy resources
//!
//! Policies are compared as whole rule texts, so the mapping holds
//! `name -> rules` strings rather than attribute maps.

use reconcile::{Action, ApplyError, KindAdapter, ResourceMapping, Strategy};
use serde_json::{Value, json};
use vaultapi::VaultClient;

use super::{Kind, ManagedKind, list_names};

/// Collection path for policies; also the prefix for apply calls
pub const PREFIX: &str = "/v1/sys/policy/";

const LIST_PATH: &str = "/v1/sys/policy";

/// Stock rules of the built-in `default` policy
const DEFAULT_POLICY: &str = include_str!("baseline/default_policy.hcl");

/// ACL policies under `sys/policy`
#[derive(Debug, Clone, Copy, Default)]
pub struct Policies;

/// Turn literal `\n` sequences into newlines
///
/// Rule texts are often passed inline on a single command-line line.
pub fn unescape_newlines(rules: &str) -> String {
    rules.replace("\\n", "\n")
}

impl KindAdapter for Policies {
    fn path_prefix(&self) -> &str {
        PREFIX
    }

    fn payload(&self, action: Action, name: &str, rules: &Value) -> Result<Option<Value>, ApplyError> {
        match action {
            Action::Delete => Ok(None),
            Action::Create | Action::Update => match rules {
                Value::String(text) => Ok(Some(json!({ "policy": text }))),
                _ => Err(ApplyError::invalid(name, "policy rules must be a string")),
            },
        }
    }
}

impl ManagedKind for Policies {
    fn kind(&self) -> Kind {
        Kind::Policies
    }

    fn strategy(&self) -> Strategy {
        Strategy::FullEquality
    }

    fn baseline(&self) -> ResourceMapping {
        ResourceMapping::from([
            ("default".to_string(), Value::String(DEFAULT_POLICY.to_string())),
            ("root".to_string(), Value::String(String::new())),
        ])
    }

    fn prepare_desired(&self, document: ResourceMapping) -> Result<ResourceMapping, ApplyError> {
        document
            .into_iter()
            .map(|(name, rules)| match rules {
                Value::String(text) => Ok((name, Value::String(unescape_newlines(&text)))),
                _ => Err(ApplyError::invalid(&name, "policy rules must be a string")),
            })
            .collect()
    }

    fn fetch_live(&self, client: &VaultClient) -> vaultapi::Result<ResourceMapping> {
        let names = client.list(LIST_PATH, "data.keys", &[])?.into_value();

        let mut result = ResourceMapping::new();
        for name in list_names(&names) {
            let rules = client
                .get(&format!("{PREFIX}{name}"), "data.rules")?
                .into_value();
            result.insert(name, rules);
        }

        Ok(result)
    }
}
