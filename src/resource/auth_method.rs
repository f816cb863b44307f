//! Auth method (auth backend mount) resources

use reconcile::{Action, ApplyError, KindAdapter, ResourceMapping, Strategy};
use serde_json::{Value, json};
use vaultapi::VaultClient;

use super::{Kind, ManagedKind};

/// Collection path for mounts; also the prefix for apply calls
pub const PREFIX: &str = "/v1/sys/auth/";

const LIST_PATH: &str = "/v1/sys/auth";

/// Fields assigned by the server that never appear in a desired document
const SERVER_FIELDS: [&str; 3] = ["uuid", "accessor", "external_entropy_access"];

/// Auth backends mounted under `sys/auth`
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMethods;

impl AuthMethods {
    /// Read mounted backends, optionally only those of `backend_type`.
    ///
    /// Keys are mount paths without the trailing `/` (`userpass/` becomes
    /// `userpass`), and server-assigned fields are stripped.
    pub fn fetch_of_type(
        client: &VaultClient,
        backend_type: Option<&str>,
    ) -> vaultapi::Result<ResourceMapping> {
        let mounts = client.get(LIST_PATH, "data")?.into_value();
        let mut result = ResourceMapping::new();

        let Some(mounts) = mounts.as_object() else {
            return Ok(result);
        };

        for (path, attrs) in mounts {
            let Some(attrs) = attrs.as_object() else {
                continue;
            };
            if let Some(wanted) = backend_type
                && attrs.get("type").and_then(Value::as_str) != Some(wanted)
            {
                continue;
            }

            let mut attrs = attrs.clone();
            for field in SERVER_FIELDS {
                attrs.remove(field);
            }
            result.insert(mount_name(path), Value::Object(attrs));
        }

        Ok(result)
    }
}

/// Mount path as used in documents: no trailing separator
fn mount_name(path: &str) -> String {
    path.trim_end_matches('/').to_string()
}

impl KindAdapter for AuthMethods {
    fn path_prefix(&self) -> &str {
        PREFIX
    }

    fn route(&self, action: Action, name: &str, _attrs: &Value) -> Result<String, ApplyError> {
        // Mount settings are changed through the tune endpoint
        Ok(match action {
            Action::Update => format!("{name}/tune"),
            Action::Create | Action::Delete => name.to_string(),
        })
    }

    fn payload(&self, action: Action, name: &str, attrs: &Value) -> Result<Option<Value>, ApplyError> {
        match action {
            Action::Delete => Ok(None),
            Action::Create | Action::Update if attrs.is_object() => Ok(Some(attrs.clone())),
            Action::Create | Action::Update => {
                Err(ApplyError::invalid(name, "auth method must be a mapping of settings"))
            }
        }
    }
}

impl ManagedKind for AuthMethods {
    fn kind(&self) -> Kind {
        Kind::AuthMethods
    }

    fn strategy(&self) -> Strategy {
        Strategy::PartialFields
    }

    fn baseline(&self) -> ResourceMapping {
        ResourceMapping::from([(
            "token".to_string(),
            json!({
                "config": {
                    "default_lease_ttl": 0,
                    "force_no_cache": false,
                    "max_lease_ttl": 0,
                    "token_type": "default-service"
                },
                "description": "token based credentials",
                "local": false,
                "options": null,
                "seal_wrap": false,
                "type": "token"
            }),
        )])
    }

    fn prepare_desired(&self, document: ResourceMapping) -> Result<ResourceMapping, ApplyError> {
        let mut prepared = ResourceMapping::new();
        for (path, attrs) in document {
            let name = mount_name(&path);
            if prepared.insert(name.clone(), attrs).is_some() {
                return Err(ApplyError::invalid(
                    &name,
                    "mount is defined twice (with and without a trailing '/')",
                ));
            }
        }
        Ok(prepared)
    }

    fn fetch_live(&self, client: &VaultClient) -> vaultapi::Result<ResourceMapping> {
        Self::fetch_of_type(client, None)
    }
}
