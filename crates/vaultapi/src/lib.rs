//! # vaultapi
//!
//! Minimal blocking client for the Vault HTTP API.
//!
//! The client does one thing: send a request, classify the status, parse the
//! JSON body and hand back the part named by a dotted response path. It has no
//! retries and no knowledge of particular resources.
//!
//! ## Example
//!
//! ```no_run
//! use vaultapi::{ClientConfig, VaultClient};
//!
//! let config = ClientConfig::new("http://127.0.0.1:8200", "root").unwrap();
//! let client = VaultClient::new(config);
//!
//! // `data.keys` of the LIST response, e.g. ["default", "root"]
//! let names = client.list("/v1/sys/policy", "data.keys", &[]).unwrap();
//! println!("{}", names.into_value());
//! ```
//!
//! ## Response paths
//!
//! A response path is walked key by key; when a key is missing the walk stops
//! and the partial result is returned instead of an error. See [`get_path`].

#![warn(clippy::all)]

pub mod error;
pub mod path;
pub mod transport;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use path::get_path;
pub use transport::http::UreqTransport;
pub use transport::{MockTransport, Transport};
pub use types::{ClientConfig, HttpRequest, HttpResponse, Method, Reply};

use serde_json::Value;

/// Per-call options for [`VaultClient::call`].
#[derive(Debug, Clone, Copy)]
pub struct CallOptions<'a> {
    /// Dotted path into the parsed body. `.` returns the whole body.
    pub response_path: &'a str,
    /// Statuses of 400 and above that are accepted as success.
    pub allowed_status: &'a [u16],
    /// Replaces the default token/namespace headers when set.
    pub headers: Option<&'a [(String, String)]>,
}

impl Default for CallOptions<'_> {
    fn default() -> Self {
        Self {
            response_path: ".",
            allowed_status: &[],
            headers: None,
        }
    }
}

impl<'a> CallOptions<'a> {
    /// Options selecting `response_path`.
    pub fn at(response_path: &'a str) -> Self {
        Self {
            response_path,
            ..Self::default()
        }
    }

    /// Accept these statuses in addition to 2xx/3xx.
    #[must_use]
    pub fn allow(mut self, allowed_status: &'a [u16]) -> Self {
        self.allowed_status = allowed_status;
        self
    }

    /// Send exactly these headers.
    #[must_use]
    pub fn with_headers(mut self, headers: &'a [(String, String)]) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// Client for the Vault HTTP API.
///
/// Holds its configuration explicitly; there is no process-wide state.
pub struct VaultClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
}

impl VaultClient {
    /// Create a client using real HTTP.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Create a client with a custom transport (for testing).
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
        }
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Issue one request.
    ///
    /// Statuses of 400 and above fail with [`Error::Remote`] unless listed in
    /// `opts.allowed_status`. An empty body yields [`Reply::Empty`]; otherwise
    /// the body is parsed and narrowed with [`get_path`].
    pub fn call(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        opts: CallOptions<'_>,
    ) -> Result<Reply> {
        let headers = match opts.headers {
            Some(explicit) => explicit.to_vec(),
            None => self.config.default_headers(),
        };

        let request = HttpRequest {
            method,
            url: self.url(path),
            headers,
            body: payload.cloned(),
        };

        log::debug!("{} {}", method, path);
        let response = self.transport.send(&request)?;
        log::trace!("{} {} -> {}", method, path, response.status);

        if response.status >= 400 && !opts.allowed_status.contains(&response.status) {
            return Err(Error::Remote {
                method,
                path: path.to_string(),
                status: response.status,
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Reply::Empty);
        }

        let parsed: Value =
            serde_json::from_str(&response.body).map_err(|e| Error::MalformedResponse {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(Reply::Data(get_path(&parsed, opts.response_path).clone()))
    }

    /// GET `path` and return the value at `response_path`.
    pub fn get(&self, path: &str, response_path: &str) -> Result<Reply> {
        self.call(Method::Get, path, None, CallOptions::at(response_path))
    }

    /// LIST `path`, tolerating the given extra statuses.
    pub fn list(&self, path: &str, response_path: &str, allowed_status: &[u16]) -> Result<Reply> {
        self.call(
            Method::List,
            path,
            None,
            CallOptions::at(response_path).allow(allowed_status),
        )
    }

    /// POST a JSON payload to `path`.
    pub fn post(&self, path: &str, payload: Option<&Value>) -> Result<Reply> {
        self.call(Method::Post, path, payload, CallOptions::default())
    }

    /// DELETE `path`.
    pub fn delete(&self, path: &str) -> Result<Reply> {
        self.call(Method::Delete, path, None, CallOptions::default())
    }
}
