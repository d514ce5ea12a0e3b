//! Blocking client for the netcup CCP DNS API.
//!
//! # Overview
//! The CCP API is a single HTTPS endpoint speaking a JSON envelope protocol:
//! every request is `{"action": ..., "param": {...}}` and every response
//! wraps an action-specific `responsedata` in a common status envelope.
//! `NetcupClient` logs in, keeps the session id, and reads or updates DNS
//! records of a zone.
//!
//! # Design
//! - All operations go through one dispatch path that injects the customer
//!   number, API key and session id into the request parameters.
//! - Session state is an explicit `Session` enum; non-login actions fail
//!   with `ApiError::NotAuthenticated` before any I/O.
//! - The network round-trip sits behind the `Transport` trait. `UreqTransport`
//!   is the default; tests plug in their own.
//! - Logging goes through the `log` facade. Credentials and session ids are
//!   never logged.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod log_sanitizer;
pub mod types;

pub use client::{parse_response, NetcupClient};
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::{ApiError, Result};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Record, ResponseEnvelope, Session};
