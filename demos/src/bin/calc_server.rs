//! Demo JSON-RPC server: a calculator and a server-info service.
//!
//! Run it, then poke it with curl:
//!
//! ```text
//! curl -X POST -H "Content-Type: application/json" \
//!      -d '{"jsonrpc":"2.0","method":"Calculator.Add","params":{"A":2,"B":3},"id":1}' \
//!      http://127.0.0.1:5000/rpc
//! ```

use jroh_core::ServiceError;
use jroh_macros::service;
use jroh_server::Server;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
struct Args {
    #[serde(rename = "A")]
    a: i64,
    #[serde(rename = "B")]
    b: i64,
}

struct Calculator;

#[service]
impl Calculator {
    pub fn add(&self, args: Args, reply: &mut i64) -> Result<(), ServiceError> {
        tracing::info!(a = args.a, b = args.b, "Add");
        *reply = args.a + args.b;
        Ok(())
    }

    pub fn div(&self, args: Args, reply: &mut i64) -> Result<(), ServiceError> {
        if args.b == 0 {
            return Err("divide by zero".into());
        }
        *reply = args.a / args.b;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize)]
struct Stats {
    cpus: usize,
    pid: u32,
}

struct ServerInfo;

#[service]
impl ServerInfo {
    /// Answers to "ServerInfo.ServerStats"; ignores its params.
    pub fn server_stats(
        &self,
        _args: serde_json::Value,
        reply: &mut Stats,
    ) -> Result<(), ServiceError> {
        reply.cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        reply.pid = std::process::id();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:5000".to_string());

    let server = Server::builder().bind_str(&addr)?.build().await?;
    server.register(Arc::new(Calculator))?;
    server.register(Arc::new(ServerInfo))?;

    tracing::info!(addr = %addr, "waiting for connections");
    server.run().await?;
    Ok(())
}
