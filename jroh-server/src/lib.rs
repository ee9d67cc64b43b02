//! JSON-RPC 2.0 server over HTTP
//!
//! This crate provides a JSON-RPC 2.0 server that exposes the methods of
//! registered receiver objects over HTTP POST. The runtime is split into
//! three stages:
//!
//! - **Registry**: maps service names to receivers whose eligible methods
//!   were discovered at compile time by the `#[service]` macro
//! - **Worker pool**: a fixed number of workers draining one shared queue,
//!   so burst arrival never drives unbounded service concurrency
//! - **HTTP front-end**: a thin POST handler that parses, enqueues, waits
//!   for completion, and writes the framed response
//!
//! # Quick start
//!
//! ```rust,no_run
//! use jroh_core::ServiceError;
//! use jroh_macros::service;
//! use jroh_server::Server;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Default, Deserialize)]
//! struct Args { #[serde(rename = "A")] a: i64, #[serde(rename = "B")] b: i64 }
//!
//! #[derive(Default, Serialize)]
//! struct Reply { #[serde(rename = "C")] c: i64 }
//!
//! struct Arith;
//!
//! #[service]
//! impl Arith {
//!     pub fn add(&self, args: Args, reply: &mut Reply) -> Result<(), ServiceError> {
//!         reply.c = args.a + args.b;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let addr: std::net::SocketAddr = "127.0.0.1:5000".parse()?;
//!     let server = Server::builder().bind(addr).workers(10).build().await?;
//!     server.register(Arc::new(Arith))?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! The method above answers to `"Arith.Add"`; the service part of the
//! dotted name defaults to the receiver's type name and can be overridden
//! with [`Server::register_as`].
//!
//! # Concurrency model
//!
//! Each accepted connection runs in its own task. Handler tasks and worker
//! tasks meet only at the shared request queue and at per-request oneshot
//! completion channels; no other mutable state crosses that boundary.
//! Registration takes the registry's write lock and is expected at setup
//! time, but remains safe at any point.

mod builder;
mod http;
mod registry;
mod service;
mod worker;

pub use builder::ServerBuilder;
pub use registry::{Registry, ServiceRecord};
pub use service::{invoke, MethodFn, MethodTable, Service};

use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use jroh_core::{Error, Result};
use std::sync::Arc;
use tokio::net::TcpListener;

/// JSON-RPC 2.0 server over HTTP
pub struct Server {
    listener: TcpListener,
    registry: Arc<Registry>,
    state: Arc<http::HttpState>,
}

impl Server {
    /// Create a new server builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Publish the eligible methods of `receiver` under its type name.
    ///
    /// Fails when the receiver exposes no suitable methods or when the
    /// name is already registered.
    pub fn register<S: Service>(&self, receiver: Arc<S>) -> Result<()> {
        self.registry.register(receiver)
    }

    /// Like [`register`](Self::register), but under an explicit name.
    /// Dotted names are allowed; the method string splits at its last dot.
    pub fn register_as<S: Service>(&self, name: &str, receiver: Arc<S>) -> Result<()> {
        self.registry.register_as(name, receiver)
    }

    /// The local address the listener is bound to.
    ///
    /// Useful to discover the port after binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever, spawning one task per connection.
    pub async fn run(&self) -> Result<()> {
        tracing::info!("server accepting connections");

        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .map_err(|e| Error::Io(e.to_string()))?;

            tracing::debug!(peer = %peer, "connection accepted");

            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| http::handle(Arc::clone(&state), req));
                if let Err(err) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    tracing::debug!(peer = %peer, error = %err, "connection closed with error");
                }
            });
        }
    }
}
