//! Server builder
//!
//! Configures the three things the runtime cares about: the bind address,
//! the RPC endpoint path, and the worker count. `build()` binds the
//! listener and spawns the worker pool, so a freshly built server is ready
//! to register services and `run()`.

use crate::http::HttpState;
use crate::registry::Registry;
use crate::worker::{self, DEFAULT_WORKERS};
use crate::Server;
use jroh_core::{Error, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for constructing a [`Server`]
pub struct ServerBuilder {
    addr: Option<SocketAddr>,
    rpc_path: String,
    workers: usize,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            addr: None,
            rpc_path: "/rpc".to_string(),
            workers: DEFAULT_WORKERS,
        }
    }

    /// Set the bind address.
    pub fn bind(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.addr = Some(addr.into());
        self
    }

    /// Set the bind address from a string such as `"127.0.0.1:5000"`.
    pub fn bind_str(mut self, addr: &str) -> Result<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::Io(format!("invalid bind address: {e}")))?;
        self.addr = Some(addr);
        Ok(self)
    }

    /// Set the RPC endpoint path (default `/rpc`).
    pub fn rpc_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.rpc_path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    /// Set the worker count (default 10). Clamped to at least 1.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Bind the listener, spawn the worker pool, and produce the server.
    pub async fn build(self) -> Result<Server> {
        let addr = self
            .addr
            .ok_or_else(|| Error::Io("no bind address configured".into()))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Io(e.to_string()))?;

        let registry = Arc::new(Registry::new());
        let queue = worker::start(Arc::clone(&registry), self.workers);

        tracing::info!(
            addr = %addr,
            path = %self.rpc_path,
            workers = self.workers,
            "server built"
        );

        Ok(Server {
            listener,
            registry,
            state: Arc::new(HttpState {
                queue,
                rpc_path: self.rpc_path,
            }),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
