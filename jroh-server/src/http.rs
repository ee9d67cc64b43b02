//! HTTP front-end: strictly a transport
//!
//! One handler bound to a configurable path. For each POST it parses a
//! single JSON-RPC request, hands it to the worker pool (blocking while
//! every worker is busy), waits on the request's completion channel, and
//! writes the response. No dispatch happens here.
//!
//! Protocol-level failures (bad envelope, wrong version, ill-formed
//! method) answer HTTP 200 with a structured JSON-RPC error body so
//! generic clients always get something they can decode; plain HTTP status
//! codes are reserved for transport-level problems (wrong method, wrong
//! path, unreadable body).

use crate::worker::QueuedRequest;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Response, StatusCode};
use jroh_core::{codec, Error, Result};
use serde_json::value::RawValue;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Per-server state shared by every connection task.
pub(crate) struct HttpState {
    pub queue: mpsc::Sender<QueuedRequest>,
    pub rpc_path: String,
}

/// Entry point for `service_fn`. Never fails at the hyper level; every
/// outcome becomes an HTTP response.
pub(crate) async fn handle(
    state: Arc<HttpState>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    Ok(route(state, req).await)
}

async fn route(state: Arc<HttpState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    if req.uri().path() != state.rpc_path {
        return plain(StatusCode::NOT_FOUND, "no RPC endpoint at this path\n".into());
    }

    if req.method() != Method::POST {
        return plain(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("POST method required, received {}\n", req.method()),
        );
    }

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            return plain(
                StatusCode::BAD_REQUEST,
                format!("failed to read request body: {err}\n"),
            )
        }
    };

    let request = match codec::read_request(&body) {
        Ok(request) => request,
        Err(read_err) => {
            tracing::debug!(error = %read_err.error, "rejecting malformed request");
            return rpc_response(read_err.id.as_deref(), &Err(read_err.error));
        }
    };

    tracing::debug!(
        service = request.service_name(),
        method = request.method_name(),
        "request read"
    );

    let (service, method, params, id) = request.into_parts();
    let (done, completion) = oneshot::channel();

    let queued = QueuedRequest {
        service,
        method,
        params,
        done,
    };

    // Blocks while all workers are busy; this is the backpressure point.
    if state.queue.send(queued).await.is_err() {
        return rpc_response(
            Some(&id),
            &Err(Error::Internal("request queue is closed".into())),
        );
    }

    let outcome = match completion.await {
        Ok(outcome) => outcome,
        Err(_) => Err(Error::Internal(
            "request was dropped before completion".into(),
        )),
    };

    rpc_response(Some(&id), &outcome)
}

/// Encode and wrap one JSON-RPC response body.
fn rpc_response(id: Option<&RawValue>, outcome: &Result<Value>) -> Response<Full<Bytes>> {
    match codec::write_response(id, outcome) {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            // Prevents MIME-sniffing a response away from the declared
            // content type.
            .header("x-content-type-options", "nosniff")
            .body(Full::new(Bytes::from(body)))
            .unwrap(),
        Err(err) => {
            // No partial JSON is ever written; the request dies here.
            tracing::error!(error = %err, "failed to encode response");
            plain(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to encode response\n".into(),
            )
        }
    }
}

fn plain(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("x-content-type-options", "nosniff")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}
