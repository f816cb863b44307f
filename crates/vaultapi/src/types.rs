//! Core types for Vault API calls.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Header carrying the client token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";

/// Header selecting an enterprise namespace.
pub const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// HTTP methods used against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    /// Vault's LIST verb, sent as `GET ...?list=true`.
    List,
    Post,
    Delete,
}

impl Method {
    /// Canonical verb name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::List => "LIST",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for a [`crate::VaultClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server address without trailing slash, e.g. `https://vault:8200`.
    pub base_url: String,
    /// Client token.
    pub token: String,
    /// Optional enterprise namespace.
    pub namespace: Option<String>,
}

impl ClientConfig {
    /// Create a config, validating and normalizing the address.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let token = token.into().trim().to_string();

        if base_url.is_empty() {
            return Err(Error::Config("server address is empty".to_string()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "server address must start with http:// or https://, got '{base_url}'"
            )));
        }
        if token.is_empty() {
            return Err(Error::Config("token is empty".to_string()));
        }

        Ok(Self {
            base_url,
            token,
            namespace: None,
        })
    }

    /// Set the namespace header value.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.trim().is_empty());
        self
    }

    /// Default headers sent with every call: token, plus namespace if set.
    #[must_use]
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(TOKEN_HEADER.to_string(), self.token.clone())];
        if let Some(ns) = &self.namespace {
            headers.push((NAMESPACE_HEADER.to_string(), ns.clone()));
        }
        headers
    }
}

// Token stays out of debug output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// A fully built HTTP request handed to a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL, without the `list=true` query for LIST.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON body, only meaningful for POST.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 204 with no body.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(204, "")
    }

    /// A 200 with a JSON body.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        Self::new(200, value.to_string())
    }
}

/// Successful result of [`crate::VaultClient::call`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The server answered with an empty body.
    Empty,
    /// Parsed body, narrowed by the response path.
    Data(Value),
}

impl Reply {
    /// Check if the reply carried no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Consume the reply, mapping an empty body to `Value::Null`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Data(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_trims_address() {
        let config = ClientConfig::new("https://vault.local:8200///", " s.abc ").unwrap();
        assert_eq!(config.base_url, "https://vault.local:8200");
        assert_eq!(config.token, "s.abc");
        assert_eq!(config.namespace, None);
    }

    #[test]
    fn test_client_config_rejects_bad_input() {
        assert!(ClientConfig::new("", "t").is_err());
        assert!(ClientConfig::new("vault.local:8200", "t").is_err());
        assert!(ClientConfig::new("http://vault.local", "  ").is_err());
    }

    #[test]
    fn test_default_headers() {
        let config = ClientConfig::new("http://127.0.0.1:8200", "root")
            .unwrap()
            .with_namespace(Some("team-a".to_string()));
        let headers = config.default_headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0], (TOKEN_HEADER.to_string(), "root".to_string()));
        assert_eq!(headers[1], (NAMESPACE_HEADER.to_string(), "team-a".to_string()));

        let blank = config.with_namespace(Some(String::new()));
        assert_eq!(blank.default_headers().len(), 1);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("http://127.0.0.1:8200", "super-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_reply_into_value() {
        assert_eq!(Reply::Empty.into_value(), Value::Null);
        assert!(Reply::Empty.is_empty());
        let reply = Reply::Data(serde_json::json!({"a": 1}));
        assert!(!reply.is_empty());
        assert_eq!(reply.into_value()["a"], 1);
    }

    #[test]
    fn test_request_header_lookup() {
        let request = HttpRequest {
            method: Method::Get,
            url: "http://x/v1/sys/auth".to_string(),
            headers: vec![(TOKEN_HEADER.to_string(), "t".to_string())],
            body: None,
        };
        assert_eq!(request.header("x-vault-token"), Some("t"));
        assert_eq!(request.header("Authorization"), None);
    }
}
