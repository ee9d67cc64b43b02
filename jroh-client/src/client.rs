//! Async JSON-RPC client over HTTP
//!
//! The client never performs I/O on the caller's task. `call` serializes
//! the arguments, allocates a completion handle, and enqueues the call;
//! a single sender task drains the queue, assigns monotonically increasing
//! request ids, performs the HTTP round trip, and publishes each outcome
//! on its handle.
//!
//! # Why one sender task?
//!
//! Funneling every call through one task serializes id allocation with
//! send ordering (submission to the transport is FIFO per client),
//! simplifies connection reuse, and keeps the call path free of locks
//! beyond queue submission. Completion order is not FIFO: the server is
//! free to finish requests in any order.
//!
//! # Example
//!
//! ```rust,no_run
//! use jroh_client::Client;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> jroh_core::Result<()> {
//!     let client = Client::new("http://127.0.0.1:5000/rpc")?;
//!
//!     // Fan out: the handles resolve independently.
//!     let a = client.call::<_, i64>("Calculator.Add", &json!({"A": 2, "B": 3})).await;
//!     let b = client.call::<_, i64>("Calculator.Add", &json!({"A": 4, "B": 5})).await;
//!
//!     println!("{} {}", a.recv().await?, b.recv().await?);
//!     Ok(())
//! }
//! ```

use crate::call::{CallOutcome, CallRequest, PendingCall};
use jroh_core::{Error, Response, Result, PROTOCOL_VERSION};
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use url::Url;

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// State shared between the client front and its sender task.
struct Shared {
    /// Target endpoint, path included
    url: Url,
    /// Reused HTTP connection pool
    http: reqwest::Client,
    /// Monotonically increasing request id counter; ids start at 1 and
    /// are never reused within a process
    seq: Mutex<u64>,
}

/// Asynchronous JSON-RPC 2.0 client over HTTP
///
/// Cheap to use from many tasks through `&self`. Dropping the client (or
/// calling [`close`](Client::close)) stops the sender task after it drains
/// the calls already accepted; their handles still resolve.
pub struct Client {
    shared: Arc<Shared>,
    queue: mpsc::Sender<CallRequest>,
}

impl Client {
    /// Create a client for the given endpoint URL and spawn its sender
    /// task. Must be called from within a tokio runtime.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref()).map_err(|e| Error::Http(format!("invalid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Http(format!(
                "invalid scheme for HTTP transport: {}",
                url.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        let shared = Arc::new(Shared {
            url,
            http,
            seq: Mutex::new(0),
        });

        // Capacity 1: callers queue up behind the sender rather than
        // buffering an unbounded backlog.
        let (queue, outbound) = mpsc::channel(1);
        tokio::spawn(sender_loop(Arc::clone(&shared), outbound));

        Ok(Self { shared, queue })
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        self.shared.url.as_str()
    }

    /// Start a call to `"Service.Method"` and return its handle.
    ///
    /// Apart from queue submission this does not block: the HTTP round
    /// trip happens on the sender task. The handle always resolves exactly
    /// once, including when argument serialization fails or the client is
    /// already closed.
    pub async fn call<A, R>(&self, service_method: &str, args: &A) -> PendingCall<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (done, completion) = oneshot::channel();
        let pending = PendingCall::new(completion);

        let params = match serde_json::to_value(args) {
            Ok(params) => params,
            Err(err) => {
                let _ = done.send(Err(Error::Serialization(err.to_string())));
                return pending;
            }
        };

        let request = CallRequest {
            method: service_method.to_string(),
            params,
            done,
        };

        if let Err(mpsc::error::SendError(request)) = self.queue.send(request).await {
            let _ = request.done.send(Err(Error::ConnectionClosed));
        }

        pending
    }

    /// Release the underlying transport.
    ///
    /// The sender task finishes the calls it already accepted before
    /// exiting, so in-flight handles still resolve.
    pub fn close(self) {
        drop(self.queue);
    }
}

/// The single sender task: drain the queue, assign ids, round-trip,
/// publish.
async fn sender_loop(shared: Arc<Shared>, mut outbound: mpsc::Receiver<CallRequest>) {
    while let Some(call) = outbound.recv().await {
        let id = {
            let mut seq = shared.seq.lock();
            *seq += 1;
            *seq
        };

        tracing::debug!(id, method = %call.method, "sending request");
        let outcome = round_trip(&shared, id, &call.method, &call.params).await;
        if let Err(ref err) = outcome {
            tracing::debug!(id, error = %err, "call failed");
        }

        // Exactly one publish per handle. The caller may have dropped the
        // handle already; that is its business.
        let _ = call.done.send(outcome);
    }

    tracing::debug!("outbound queue closed, sender task exiting");
}

#[derive(Serialize)]
struct CallEnvelope<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
    id: u64,
}

/// POST one request and decode the response envelope.
async fn round_trip(shared: &Shared, id: u64, method: &str, params: &Value) -> CallOutcome {
    let envelope = CallEnvelope {
        jsonrpc: PROTOCOL_VERSION,
        method,
        params,
        id,
    };
    let body = serde_json::to_vec(&envelope).map_err(|e| Error::Serialization(e.to_string()))?;

    let response = shared
        .http
        .post(shared.url.clone())
        .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
        .body(body)
        .send()
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(Error::Http(format!(
            "server answered {status}: {}",
            String::from_utf8_lossy(&bytes).trim()
        )));
    }

    let envelope: Response =
        serde_json::from_slice(&bytes).map_err(|e| Error::Parse(e.to_string()))?;

    // An error member decodes into a fresh error object and becomes the
    // handle's terminal error; the reply destination stays untouched.
    if let Some(err) = envelope.error {
        return Err(Error::Rpc(err));
    }

    match envelope.result {
        Some(raw) => Ok(raw),
        None => Err(Error::Parse(
            "response carries neither result nor error".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_http_schemes() {
        assert!(Client::new("ws://127.0.0.1:1/rpc").is_err());
        assert!(Client::new("not a url").is_err());
        assert!(Client::new("http://127.0.0.1:1/rpc").is_ok());
    }

    #[tokio::test]
    async fn unreachable_server_resolves_the_handle_with_an_http_error() {
        // Nothing listens on the discard port, so the round trip fails at
        // connect time; the handle must still resolve.
        let client = Client::new("http://127.0.0.1:9/rpc").unwrap();
        let pending = client
            .call::<_, i64>("Arith.Add", &serde_json::json!({"A": 1, "B": 2}))
            .await;
        assert!(matches!(pending.recv().await, Err(Error::Http(_))));
    }
}
