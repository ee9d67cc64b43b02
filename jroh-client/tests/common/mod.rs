//! Common test utilities for jroh-client integration tests
//!
//! Two kinds of peers: a real jroh server with the usual Arith fixture,
//! and a lightweight mock HTTP server that captures every request body so
//! tests can assert what actually went over the wire.

#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use jroh_core::ServiceError;
use jroh_macros::service;
use jroh_server::Server;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[derive(Debug, Default, Deserialize)]
pub struct Args {
    #[serde(rename = "A")]
    pub a: i64,
    #[serde(rename = "B")]
    pub b: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "C")]
    pub c: i64,
}

pub struct Arith;

#[service]
impl Arith {
    pub fn add(&self, args: Args, reply: &mut Reply) -> Result<(), ServiceError> {
        reply.c = args.a + args.b;
        Ok(())
    }

    pub fn div(&self, args: Args, reply: &mut Reply) -> Result<(), ServiceError> {
        if args.b == 0 {
            return Err("divide by zero".into());
        }
        reply.c = args.a / args.b;
        Ok(())
    }
}

/// Takes long enough that a call is reliably in flight when the client
/// closes.
pub struct Slow;

#[service]
impl Slow {
    pub fn nap(&self, _args: Value, reply: &mut bool) -> Result<(), ServiceError> {
        std::thread::sleep(Duration::from_millis(100));
        *reply = true;
        Ok(())
    }
}

/// Boot a real server with the Arith and Slow services; returns the RPC
/// endpoint URL.
pub async fn start_arith_server() -> String {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = Server::builder().bind(addr).build().await.unwrap();
    server.register(Arc::new(Arith)).unwrap();
    server.register(Arc::new(Slow)).unwrap();

    let local = server.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run().await;
    });

    format!("http://{local}/rpc")
}

/// What the mock captured about one request: body text plus the
/// content-type header it arrived with.
pub struct CapturedRequest {
    pub body: String,
    pub content_type: String,
}

/// Mock HTTP peer for transport-level assertions
///
/// Accepts any POST, records it, and answers with a minimal success
/// envelope echoing the request id.
pub struct MockHttpServer {
    pub addr: SocketAddr,
    pub requests: mpsc::UnboundedReceiver<CapturedRequest>,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let tx = tx.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let tx = tx.clone();
                        async move {
                            let content_type = req
                                .headers()
                                .get("content-type")
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or_default()
                                .to_string();
                            let bytes =
                                req.into_body().collect().await.unwrap().to_bytes();
                            let body = String::from_utf8(bytes.to_vec()).unwrap();

                            let value: Value = serde_json::from_str(&body).unwrap();
                            let id = value["id"].clone();
                            let _ = tx.send(CapturedRequest { body, content_type });

                            let reply = serde_json::json!({
                                "jsonrpc": "2.0",
                                "id": id,
                                "result": true,
                            })
                            .to_string();

                            Ok::<_, Infallible>(
                                Response::builder()
                                    .header(
                                        "content-type",
                                        "application/json; charset=utf-8",
                                    )
                                    .body(Full::new(Bytes::from(reply)))
                                    .unwrap(),
                            )
                        }
                    });

                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, requests: rx }
    }

    pub fn url(&self) -> String {
        format!("http://{}/rpc", self.addr)
    }
}
