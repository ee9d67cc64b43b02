//! Error types for jroh
//!
//! Three layers cooperate here:
//!
//! - **`Error`**: the application-level taxonomy used throughout the crates.
//!   Most variants map onto a reserved JSON-RPC 2.0 code; a few (transport,
//!   registration) exist only on the local side and never reach the wire.
//! - **`ErrorObject`**: the wire-format `{code, message, data}` object that
//!   appears in the `error` member of a response.
//! - **`ServiceError`**: the error indicator returned by user service
//!   methods. A pre-structured `ErrorObject` is forwarded to the client
//!   unchanged; anything else is wrapped with the user-service code so the
//!   caller sees the error's text.
//!
//! # Reserved codes
//!
//! The codes from -32768 to -32000 are reserved by the JSON-RPC 2.0
//! specification. Implementation-defined user-service errors live outside
//! that range, starting at 1000. Unknown codes carried by an `ErrorObject`
//! pass through translation untouched, so services may pick their own.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Numeric error codes used on the wire.
pub mod codes {
    /// Invalid JSON was received by the server.
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON sent is not a valid request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Generic server error (start of the reserved server range).
    pub const SERVER_ERROR: i64 = -32000;
    /// First implementation-defined user-service code.
    pub const SERVICE_ERROR: i64 = 1000;
}

/// Result type for jroh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type for jroh operations
///
/// Variants up to `Service` correspond to the wire taxonomy and convert
/// into an [`ErrorObject`] via [`Error::to_error_object`]. The remaining
/// variants describe local failures (transport, registration) that callers
/// observe directly and that are never serialized.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    /// Pre-structured wire error, forwarded without translation.
    ///
    /// This is how user-supplied codes and the `data` member survive a
    /// round trip through the dispatcher unchanged.
    #[error("{0}")]
    Rpc(#[from] ErrorObject),

    /// The request body could not be decoded as JSON (-32700).
    #[error("parse error: {0}")]
    Parse(String),

    /// The envelope decoded but is not a valid request object (-32600).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No such service or method; carries the offending name (-32601).
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// The params member did not decode into the argument type (-32602).
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Unexpected failure inside the runtime (-32603).
    #[error("internal error: {0}")]
    Internal(String),

    /// A user service method failed with a plain message (code 1000).
    #[error("{0}")]
    Service(String),

    /// Converting a value to or from JSON failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A receiver could not be registered. Local only.
    #[error("registration error: {0}")]
    Registration(String),

    /// The HTTP round trip failed before a response envelope was read.
    /// Local only.
    #[error("http transport error: {0}")]
    Http(String),

    /// Low-level socket failure (bind, accept). Local only.
    #[error("io error: {0}")]
    Io(String),

    /// The peer or the sending side went away. Local only.
    #[error("connection closed")]
    ConnectionClosed,
}

impl Error {
    /// Translate into the wire error object.
    ///
    /// Uses the fixed code mapping for the taxonomy variants and passes
    /// `Rpc` through verbatim. Local-only variants fall back to the
    /// internal code; they only show up here if a bug routed them to the
    /// response path.
    pub fn to_error_object(&self) -> ErrorObject {
        match self {
            Error::Rpc(obj) => obj.clone(),
            Error::Parse(detail) => ErrorObject::parse_error(detail.clone()),
            Error::InvalidRequest(msg) => ErrorObject::invalid_request(msg.clone()),
            Error::MethodNotFound(name) => ErrorObject::method_not_found(name.clone()),
            Error::InvalidParams(detail) => ErrorObject::invalid_params(detail.clone()),
            Error::Internal(detail) => ErrorObject::internal_error(detail.clone()),
            Error::Service(msg) => ErrorObject::service_error(msg.clone()),
            Error::Serialization(detail) => ErrorObject::internal_error(detail.clone()),
            other => ErrorObject::internal_error(other.to_string()),
        }
    }
}

/// JSON-RPC 2.0 error object as it appears on the wire
///
/// Contains a numeric `code`, a concise `message`, and an optional `data`
/// member with additional context. The `data` member is omitted from the
/// encoded object when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code indicating the error type
    pub code: i64,
    /// Human-readable description, kept to a single sentence
    pub message: String,
    /// Additional information about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ErrorObject {
    /// Create a new error object with a code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach a `data` member.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Parse error (-32700). The decode failure text goes into `data`.
    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(
            codes::PARSE_ERROR,
            "An error occurred on the server while parsing the request.",
        )
        .with_data(serde_json::Value::String(detail.into()))
    }

    /// Invalid request (-32600).
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REQUEST, msg)
    }

    /// Method not found (-32601); the offending name goes into `data`.
    pub fn method_not_found(name: impl Into<String>) -> Self {
        Self::new(
            codes::METHOD_NOT_FOUND,
            "The method does not exist / is not available.",
        )
        .with_data(serde_json::Value::String(name.into()))
    }

    /// Invalid params (-32602). The decode failure text goes into `data`.
    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, "Invalid method parameter(s).")
            .with_data(serde_json::Value::String(detail.into()))
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, "Internal RPC error.")
            .with_data(serde_json::Value::String(detail.into()))
    }

    /// Generic server error (-32000).
    pub fn server_error(msg: impl Into<String>) -> Self {
        Self::new(codes::SERVER_ERROR, msg)
    }

    /// User-service error (1000): a service method failed with `msg`.
    pub fn service_error(msg: impl Into<String>) -> Self {
        Self::new(codes::SERVICE_ERROR, msg)
    }
}

impl std::fmt::Display for ErrorObject {
    /// Formats as "[code] message" for logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorObject {}

/// Error indicator returned by user service methods
///
/// Service methods have the shape
/// `fn name(&self, args: A, reply: &mut R) -> Result<(), ServiceError>`.
/// Returning `Err("divide by zero".into())` reports a user-service error
/// with that text; returning `Err(ServiceError::Rpc(obj))` puts `obj` on
/// the wire unchanged, codes and all.
#[derive(Debug, ThisError)]
pub enum ServiceError {
    /// Structured error to forward verbatim.
    #[error("{0}")]
    Rpc(ErrorObject),
    /// Plain failure text, reported with the user-service code.
    #[error("{0}")]
    Message(String),
}

impl From<String> for ServiceError {
    fn from(msg: String) -> Self {
        ServiceError::Message(msg)
    }
}

impl From<&str> for ServiceError {
    fn from(msg: &str) -> Self {
        ServiceError::Message(msg.to_string())
    }
}

impl From<ErrorObject> for ServiceError {
    fn from(obj: ErrorObject) -> Self {
        ServiceError::Rpc(obj)
    }
}

impl From<ServiceError> for Error {
    /// Apply the user-error wrapping policy: structured errors propagate
    /// verbatim, everything else becomes a user-service error carrying the
    /// original text.
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Rpc(obj) => Error::Rpc(obj),
            ServiceError::Message(msg) => Error::Service(msg),
        }
    }
}
