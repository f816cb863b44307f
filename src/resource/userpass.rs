//! Userpass account resources
//!
//! Accounts live inside a userpass backend, so every definition carries an
//! auxiliary `auth_method` field naming that backend. The field routes the
//! call and is never sent to the server.

use reconcile::{Action, ApplyError, KindAdapter, ResourceMapping, Strategy};
use serde_json::Value;
use vaultapi::VaultClient;

use super::auth_method::AuthMethods;
use super::{Kind, ManagedKind, list_names};

/// Prefix for per-backend account paths
pub const PREFIX: &str = "/v1/auth/";

/// Auxiliary field naming the backend an account belongs to
pub const ROUTING_FIELD: &str = "auth_method";

const BACKEND_TYPE: &str = "userpass";

/// Accounts in every userpass backend
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAccounts;

impl UserAccounts {
    fn backend_of<'a>(name: &str, attrs: &'a Value) -> Result<&'a str, ApplyError> {
        attrs
            .get(ROUTING_FIELD)
            .and_then(Value::as_str)
            .map(|backend| backend.trim_end_matches('/'))
            .filter(|backend| !backend.is_empty())
            .ok_or_else(|| ApplyError::missing_field(name, ROUTING_FIELD))
    }
}

impl KindAdapter for UserAccounts {
    fn path_prefix(&self) -> &str {
        PREFIX
    }

    fn route(&self, _action: Action, name: &str, attrs: &Value) -> Result<String, ApplyError> {
        let backend = Self::backend_of(name, attrs)?;
        Ok(format!("{backend}/users/{name}"))
    }

    fn payload(&self, action: Action, name: &str, attrs: &Value) -> Result<Option<Value>, ApplyError> {
        if action == Action::Delete {
            return Ok(None);
        }

        let mut body = attrs
            .as_object()
            .cloned()
            .ok_or_else(|| ApplyError::invalid(name, "account must be a mapping of settings"))?;
        body.remove(ROUTING_FIELD);
        Ok(Some(Value::Object(body)))
    }
}

impl ManagedKind for UserAccounts {
    fn kind(&self) -> Kind {
        Kind::UserAccounts
    }

    fn strategy(&self) -> Strategy {
        Strategy::PartialFields
    }

    /// Trim a trailing `/` from `auth_method` so it compares equal to the
    /// backend name injected into live state
    fn prepare_desired(&self, document: ResourceMapping) -> Result<ResourceMapping, ApplyError> {
        Ok(document
            .into_iter()
            .map(|(name, mut attrs)| {
                if let Some(Value::String(backend)) = attrs.get_mut(ROUTING_FIELD) {
                    let trimmed = backend.trim_end_matches('/').len();
                    backend.truncate(trimmed);
                }
                (name, attrs)
            })
            .collect())
    }

    fn fetch_live(&self, client: &VaultClient) -> vaultapi::Result<ResourceMapping> {
        let backends = AuthMethods::fetch_of_type(client, Some(BACKEND_TYPE))?;

        let mut result = ResourceMapping::new();
        for backend in backends.keys() {
            let users_path = format!("{PREFIX}{backend}/users");

            // An empty backend answers 404 {"errors":[]}
            let names = client.list(&users_path, "data.keys", &[404])?.into_value();

            for user in list_names(&names) {
                let mut attrs = client
                    .get(&format!("{users_path}/{user}"), "data")?
                    .into_value();
                if let Value::Object(map) = &mut attrs {
                    map.insert(ROUTING_FIELD.to_string(), Value::String(backend.clone()));
                }

                if result.insert(user.clone(), attrs).is_some() {
                    log::warn!("Account '{user}' exists in several userpass backends; keeping the one in '{backend}'");
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::testing::{client, url};
    use reconcile::{Diff, mapping_from_value, plan};
    use serde_json::json;
    use vaultapi::{HttpResponse, Method, MockTransport};

    fn mock_with_backends() -> MockTransport {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            url("/v1/sys/auth"),
            HttpResponse::json(&json!({
                "data": {
                    "token/": {"type": "token", "accessor": "a1", "uuid": "u1"},
                    "people/": {"type": "userpass", "accessor": "a2", "uuid": "u2"},
                    "robots/": {"type": "userpass", "accessor": "a3", "uuid": "u3"}
                }
            })),
        );
        mock.respond(
            Method::List,
            url("/v1/auth/people/users"),
            HttpResponse::json(&json!({"data": {"keys": ["alice"]}})),
        );
        mock.respond(
            Method::Get,
            url("/v1/auth/people/users/alice"),
            HttpResponse::json(&json!({
                "data": {"token_policies": ["ops"], "token_ttl": 0}
            })),
        );
        // robots/ has no accounts: unscripted LIST answers 404
        mock
    }

    #[test]
    fn test_fetch_live_injects_backend() {
        let mock = mock_with_backends();
        let live = UserAccounts.fetch_live(&client(&mock)).unwrap();

        assert_eq!(
            live,
            mapping_from_value(json!({
                "alice": {"token_policies": ["ops"], "token_ttl": 0, "auth_method": "people"}
            }))
            .unwrap()
        );
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn test_fetch_live_only_lists_userpass_backends() {
        let mock = mock_with_backends();
        UserAccounts.fetch_live(&client(&mock)).unwrap();

        let listed: Vec<_> = mock
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::List)
            .map(|r| r.url)
            .collect();
        assert_eq!(
            listed,
            vec![url("/v1/auth/people/users"), url("/v1/auth/robots/users")]
        );
    }

    #[test]
    fn test_fetch_live_other_list_errors_fail() {
        let mock = mock_with_backends();
        mock.respond(
            Method::List,
            url("/v1/auth/robots/users"),
            HttpResponse::new(403, r#"{"errors":["permission denied"]}"#),
        );

        let err = UserAccounts.fetch_live(&client(&mock)).unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_no_baseline() {
        assert!(UserAccounts.baseline().is_empty());
        let desired = UserAccounts.desired_state(ResourceMapping::new()).unwrap();
        assert!(desired.is_empty());
    }

    #[test]
    fn test_plan_routes_and_strips_backend() {
        let diff = Diff {
            add: mapping_from_value(json!({
                "alice": {"auth_method": "people", "password": "pw", "token_policies": ["ops"]}
            }))
            .unwrap(),
            modify: mapping_from_value(json!({
                "carol": {"auth_method": "people/", "token_ttl": 60}
            }))
            .unwrap(),
            remove: mapping_from_value(json!({
                "bob": {"auth_method": "robots", "token_ttl": 0}
            }))
            .unwrap(),
        };

        let calls = plan(&diff, &UserAccounts).unwrap();
        assert_eq!(calls[0].path, "/v1/auth/people/users/alice");
        assert_eq!(
            calls[0].payload,
            Some(json!({"password": "pw", "token_policies": ["ops"]}))
        );
        assert_eq!(calls[1].path, "/v1/auth/people/users/carol");
        assert_eq!(calls[1].payload, Some(json!({"token_ttl": 60})));
        assert_eq!(calls[2].path, "/v1/auth/robots/users/bob");
        assert_eq!(calls[2].payload, None);

        for call in &calls {
            if let Some(body) = &call.payload {
                assert!(body.get(ROUTING_FIELD).is_none());
            }
        }
        // Diff itself keeps the routing field
        assert_eq!(diff.add["alice"][ROUTING_FIELD], "people");
    }

    #[test]
    fn test_prepare_desired_trims_backend() {
        let desired = UserAccounts
            .desired_state(
                mapping_from_value(json!({
                    "alice": {"auth_method": "people/", "token_ttl": 60},
                    "bob": {"auth_method": "robots", "token_ttl": 0}
                }))
                .unwrap(),
            )
            .unwrap();

        assert_eq!(desired["alice"][ROUTING_FIELD], "people");
        assert_eq!(desired["bob"][ROUTING_FIELD], "robots");
    }

    #[test]
    fn test_plan_missing_backend() {
        let diff = Diff {
            add: mapping_from_value(json!({"dave": {"password": "pw"}})).unwrap(),
            ..Diff::default()
        };
        assert_eq!(
            plan(&diff, &UserAccounts).unwrap_err(),
            ApplyError::missing_field("dave", ROUTING_FIELD)
        );
    }
}
