//! Error types for the netcup CCP client.
//!
//! # Design
//! Every failure is terminal for the call that produced it; nothing here is
//! marked retryable. `Rejected` covers well-formed envelopes whose status code
//! is not 2000 and keeps the server's long message for diagnostics. Transport
//! and decoding failures carry the underlying cause as text so the enum stays
//! free of foreign error types.

use thiserror::Error;

/// Errors returned by `NetcupClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A non-login action was attempted without a session.
    #[error("no session ID, make sure to login first")]
    NotAuthenticated,

    /// The request payload could not be serialized to a JSON object.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The HTTP round-trip failed (connect, TLS, timeout, body read).
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The response envelope or its payload could not be deserialized.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The server answered with a status code other than 2000.
    #[error("request \"{action}\" failed: {message}")]
    Rejected {
        action: String,
        status_code: i64,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ApiError>;
