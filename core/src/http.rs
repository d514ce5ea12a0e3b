//! HTTP transport seam for the CCP client.
//!
//! # Design
//! Requests and responses are plain data. `NetcupClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses the `HttpResponse`
//! it gets back. `UreqTransport` is the blocking production implementation;
//! tests substitute their own `Transport` to observe or fake the round-trip.
//!
//! The CCP API signals failure inside the JSON envelope, so HTTP status codes
//! are not treated as errors here. Whatever body the server sends is returned
//! for envelope decoding.

use std::time::Duration;

use crate::error::ApiError;

/// An HTTP POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one HTTP round-trip.
///
/// Implementations must block until the full response body has been read.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Build a transport whose whole-call timeout is `timeout`.
    ///
    /// `None` leaves ureq's default (no global timeout).
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| ApiError::TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::TransportError(format!("failed to read response body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let transport = UreqTransport::with_timeout(Some(Duration::from_secs(2)));
        let request = HttpRequest {
            url: "http://127.0.0.1:1/".to_string(),
            headers: Vec::new(),
            body: "{}".to_string(),
        };
        let err = transport.execute(request).unwrap_err();
        assert!(matches!(err, ApiError::TransportError(_)));
    }
}
