//! Blocking HTTP transport backed by `ureq`.

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{HttpRequest, HttpResponse, Method};
use ureq::RequestBuilder;

/// Real HTTP transport.
///
/// The agent is configured so that 4xx/5xx statuses come back as ordinary
/// responses. Connection pooling, TLS and timeouts are ureq's defaults.
pub struct UreqTransport {
    /// HTTP agent for requests.
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a new transport.
    #[must_use]
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }

    /// URL actually requested; LIST becomes a GET with `list=true`.
    fn wire_url(request: &HttpRequest) -> String {
        match request.method {
            Method::List if request.url.contains('?') => format!("{}&list=true", request.url),
            Method::List => format!("{}?list=true", request.url),
            _ => request.url.clone(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = Self::wire_url(request);

        let mut response = match request.method {
            Method::Get | Method::List => with_headers(self.agent.get(&url), request).call()?,
            Method::Delete => with_headers(self.agent.delete(&url), request).call()?,
            Method::Post => {
                let builder = with_headers(self.agent.post(&url), request);
                match &request.body {
                    Some(body) => builder.send_json(body)?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let bytes = response.body_mut().read_to_vec()?;
        let body = decode_body(&request.url, bytes)?;

        Ok(HttpResponse { status, body })
    }
}

/// Response bodies must be UTF-8; anything else is a malformed response.
fn decode_body(url: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::MalformedResponse {
        path: url.to_string(),
        message: format!("response body is not UTF-8: {e}"),
    })
}
