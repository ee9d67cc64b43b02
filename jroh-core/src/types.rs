//! JSON-RPC 2.0 request and response types
//!
//! A [`Request`] is the decoded form of one inbound call: the service and
//! method names split out of the `"Service.Method"` string, the raw
//! `params` blob, and the raw transport id. Both blobs stay encoded as
//! [`RawValue`]s. The id is copied into the response verbatim, so string,
//! numeric, and `null` ids echo without normalization (`1` never becomes
//! `1.0`, `"1"` never loses its quotes). The params decode lazily, once the
//! dispatcher has looked up the argument type for the target method.
//!
//! [`Response`] is the decoded envelope on the client side. Exactly one of
//! `result` and `error` is present.

use crate::codec;
use crate::error::{ErrorObject, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

/// One inbound RPC invocation, decoded from a single JSON-RPC envelope
#[derive(Debug)]
pub struct Request {
    pub(crate) service: String,
    pub(crate) method: String,
    pub(crate) params: Option<Box<RawValue>>,
    pub(crate) id: Box<RawValue>,
}

impl Request {
    /// The service part of the dotted method string (everything before the
    /// last `'.'`).
    pub fn service_name(&self) -> &str {
        &self.service
    }

    /// The method part of the dotted method string (everything after the
    /// last `'.'`).
    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// The raw transport id, to be echoed byte-exact.
    pub fn id(&self) -> &RawValue {
        &self.id
    }

    /// The raw params blob, if the request carried one.
    pub fn params(&self) -> Option<&RawValue> {
        self.params.as_deref()
    }

    /// Decode the raw params into a fresh argument value.
    ///
    /// Absent or `null` params yield `T::default()`, the zero value of the
    /// argument type. A decode failure maps to invalid params.
    pub fn decode_params<T: DeserializeOwned + Default>(&self) -> Result<T> {
        codec::decode_params(self.params())
    }

    /// Tear the request apart for queueing: `(service, method, params, id)`.
    pub fn into_parts(self) -> (String, String, Option<Box<RawValue>>, Box<RawValue>) {
        (self.service, self.method, self.params, self.id)
    }
}

/// Decoded response envelope, as read by the client
///
/// `result` and `error` are mutually exclusive. The `result` blob stays
/// encoded so the caller can decode it into its own reply type; the `error`
/// member decodes into a fresh [`ErrorObject`].
#[derive(Debug, Deserialize)]
pub struct Response {
    /// Protocol version, expected to be "2.0"
    pub jsonrpc: String,
    /// Raw result blob, present on success
    #[serde(default)]
    pub result: Option<Box<RawValue>>,
    /// Structured error, present on failure
    #[serde(default)]
    pub error: Option<ErrorObject>,
    /// Echoed transport id
    #[serde(default)]
    pub id: Option<Box<RawValue>>,
}
