//! Core JSON-RPC 2.0 types and codec for jroh
//!
//! This crate provides the foundation shared by `jroh-server` and
//! `jroh-client`:
//!
//! - **Types**: the decoded request and the response envelope
//! - **Codec**: JSON-RPC 2.0 framing (request parsing, response writing)
//! - **Error handling**: the error taxonomy and the wire error object
//!
//! # Id preservation
//!
//! The transport id of a request must be echoed back byte-for-byte. The
//! codec therefore never decodes the id into a typed value: it is carried
//! as a raw JSON blob (`serde_json::value::RawValue`) and copied verbatim
//! into the response. The same applies to `params`, which stay encoded
//! until the dispatcher knows the argument type to decode them into.
//!
//! # Example
//!
//! ```rust
//! use jroh_core::codec;
//!
//! let body = br#"{"jsonrpc":"2.0","method":"Arith.Add","params":{"A":1,"B":2},"id":7}"#;
//! let request = codec::read_request(body).unwrap();
//! assert_eq!(request.service_name(), "Arith");
//! assert_eq!(request.method_name(), "Add");
//! assert_eq!(request.id().get(), "7");
//! ```

pub mod codec;
pub mod error;
pub mod types;

pub use error::{codes, Error, ErrorObject, Result, ServiceError};
pub use types::{Request, Response};

/// JSON-RPC protocol version constant
pub const PROTOCOL_VERSION: &str = "2.0";
