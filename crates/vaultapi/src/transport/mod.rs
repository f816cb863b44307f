//! Transport trait and implementations for sending HTTP requests.
//!
//! This module provides the [`Transport`] trait and implementations for
//! different ways of reaching the server. The primary implementation is
//! [`http::UreqTransport`] which performs real blocking HTTP calls.
//!
//! # Testing
//!
//! Use [`MockTransport`] for testing without network access:
//!
//! ```
//! use vaultapi::transport::{MockTransport, Transport};
//! use vaultapi::{HttpRequest, HttpResponse, Method};
//!
//! let mock = MockTransport::new();
//! mock.respond(Method::Get, "http://vault/v1/sys/auth", HttpResponse::new(200, "{}"));
//!
//! let response = mock
//!     .send(&HttpRequest {
//!         method: Method::Get,
//!         url: "http://vault/v1/sys/auth".to_string(),
//!         headers: vec![],
//!         body: None,
//!     })
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;

use crate::error::Result;
use crate::types::{HttpRequest, HttpResponse, Method};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Transport trait for issuing one HTTP request.
///
/// Implementations return every status code as a response; deciding which
/// statuses count as failures is the client's job.
pub trait Transport: Send + Sync {
    /// Send the request and wait for the full response.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if no response was received.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Mock transport for testing without network access.
///
/// Responses are scripted per `(method, url)`. Unscripted reads answer
/// `404 {"errors":[]}` and unscripted writes answer `204`, which is what the
/// server does for an empty collection and a successful write.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<(Method, String), HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Create a new empty mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for a method and absolute URL.
    pub fn respond(&self, method: Method, url: impl Into<String>, response: HttpResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, url.into()), response);
    }

    /// All requests sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests that would change server state (POST and DELETE).
    #[must_use]
    pub fn writes(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| matches!(r.method, Method::Post | Method::Delete))
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let scripted = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(request.method, request.url.clone()))
            .cloned();

        Ok(scripted.unwrap_or_else(|| match request.method {
            Method::Get | Method::List => HttpResponse::new(404, r#"{"errors":[]}"#),
            Method::Post | Method::Delete => HttpResponse::no_content(),
        }))
    }
}
