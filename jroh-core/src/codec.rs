//! JSON-RPC 2.0 framing: request parsing and response writing
//!
//! The read side validates the envelope shape required here:
//!
//! ```text
//! { "jsonrpc": "2.0",
//!   "method":  "<Service>.<Method>",
//!   "params":  <any>,          // may be absent
//!   "id":      <json value> }  // string, number, or null
//! ```
//!
//! The method string splits at its *last* `'.'`, which permits dotted
//! service names (`"A.B.C"` is service `"A.B"`, method `"C"`). Requests
//! without an `id` member are notifications and are rejected as invalid;
//! an explicit `"id": null` is a valid id.
//!
//! The write side emits exactly one of `result`/`error` and copies the id
//! blob back unchanged.

use crate::error::{Error, ErrorObject, Result};
use crate::types::Request;
use crate::PROTOCOL_VERSION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

/// Raw envelope as it comes off the wire. All members optional so shape
/// problems surface as invalid-request, not parse errors.
#[derive(Deserialize)]
struct RequestEnvelope {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Box<RawValue>>,
    #[serde(default)]
    id: Option<Box<RawValue>>,
}

#[derive(Serialize)]
struct ResponseEnvelope<'a> {
    jsonrpc: &'static str,
    id: Option<&'a RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorObject>,
}

/// A request that failed parsing or validation.
///
/// Carries the id when the envelope decoded far enough to reveal one, so
/// the error response can still echo it.
#[derive(Debug)]
pub struct ReadError {
    pub error: Error,
    pub id: Option<Box<RawValue>>,
}

impl ReadError {
    fn new(error: Error, id: Option<Box<RawValue>>) -> Self {
        Self { error, id }
    }
}

/// Parse a single JSON-RPC 2.0 request from an HTTP body.
///
/// Validation order follows the envelope: JSON decode (parse error), then
/// version (invalid request), then method presence and the service/method
/// split, then id presence. `params` and `id` are retained as raw blobs.
pub fn read_request(body: &[u8]) -> std::result::Result<Request, ReadError> {
    let envelope: RequestEnvelope = serde_json::from_slice(body)
        .map_err(|e| ReadError::new(Error::Parse(e.to_string()), None))?;

    let id = envelope.id;

    if envelope.jsonrpc.as_deref() != Some(PROTOCOL_VERSION) {
        return Err(ReadError::new(
            Error::InvalidRequest("unsupported protocol version".into()),
            id,
        ));
    }

    let method = match envelope.method {
        Some(m) => m,
        None => {
            return Err(ReadError::new(
                Error::InvalidRequest("missing method member".into()),
                id,
            ))
        }
    };

    let id = match id {
        Some(id) => id,
        None => {
            return Err(ReadError::new(
                Error::InvalidRequest("request has no id; notifications are not supported".into()),
                None,
            ))
        }
    };

    let (service, name) = match split_method(&method) {
        Some(parts) => parts,
        None => {
            return Err(ReadError::new(
                Error::Rpc(
                    ErrorObject::invalid_request("service/method request ill-formed")
                        .with_data(Value::String(method.clone())),
                ),
                Some(id),
            ))
        }
    };

    Ok(Request {
        service: service.to_string(),
        method: name.to_string(),
        params: envelope.params,
        id,
    })
}

/// Split a dotted method string at its last `'.'`.
///
/// Returns `None` when the string contains no dot at all.
pub fn split_method(method: &str) -> Option<(&str, &str)> {
    let dot = method.rfind('.')?;
    Some((&method[..dot], &method[dot + 1..]))
}

/// Encode a response envelope.
///
/// `id` is written back byte-exact; `None` (id never learned) encodes as
/// `null`. A success outcome fills `result`, a failure outcome fills
/// `error` through the fixed code mapping; the other member is omitted.
pub fn write_response(id: Option<&RawValue>, outcome: &Result<Value>) -> Result<Vec<u8>> {
    let envelope = match outcome {
        Ok(value) => ResponseEnvelope {
            jsonrpc: PROTOCOL_VERSION,
            id,
            result: Some(value),
            error: None,
        },
        Err(err) => ResponseEnvelope {
            jsonrpc: PROTOCOL_VERSION,
            id,
            result: None,
            error: Some(err.to_error_object()),
        },
    };

    serde_json::to_vec(&envelope).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a raw params blob into a fresh argument value.
///
/// The argument is materialized as its zero value first, which is what the
/// caller receives when params are absent or literal `null`.
pub fn decode_params<T: DeserializeOwned + Default>(params: Option<&RawValue>) -> Result<T> {
    match params {
        Some(raw) if raw.get() != "null" => {
            serde_json::from_str(raw.get()).map_err(|e| Error::InvalidParams(e.to_string()))
        }
        _ => Ok(T::default()),
    }
}
