//! JROH - JSON-RPC 2.0 Over HTTP
//!
//! This is the main convenience crate that re-exports all JROH sub-crates.
//! Use it if you want a single dependency providing both the server and
//! client halves of the runtime.
//!
//! # Architecture
//!
//! JROH is organized into modular crates:
//!
//! - **jroh-core**: wire types, JSON-RPC 2.0 codec, error taxonomy
//! - **jroh-server**: service registry, worker pool, HTTP front-end
//! - **jroh-client**: async HTTP client with per-call completion handles
//! - **jroh-macros**: the `#[service]` macro that discovers eligible
//!   methods at compile time
//!
//! # Quick start - server
//!
//! ```rust,no_run
//! use jroh::core::ServiceError;
//! use jroh::service;
//! use jroh::Server;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Default, Deserialize)]
//! struct Args { #[serde(rename = "A")] a: i64, #[serde(rename = "B")] b: i64 }
//!
//! #[derive(Default, Serialize)]
//! struct Reply { #[serde(rename = "C")] c: i64 }
//!
//! struct Calculator;
//!
//! #[service]
//! impl Calculator {
//!     pub fn add(&self, args: Args, reply: &mut Reply) -> Result<(), ServiceError> {
//!         reply.c = args.a + args.b;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::builder().bind_str("127.0.0.1:5000")?.build().await?;
//!     server.register(Arc::new(Calculator))?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Quick start - client
//!
//! ```rust,no_run
//! use jroh::Client;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> jroh::core::Result<()> {
//!     let client = Client::new("http://127.0.0.1:5000/rpc")?;
//!     let call = client.call::<_, serde_json::Value>(
//!         "Calculator.Add",
//!         &json!({"A": 5, "B": 3}),
//!     ).await;
//!     println!("reply: {}", call.recv().await?);
//!     Ok(())
//! }
//! ```

pub use jroh_client as client;
pub use jroh_core as core;
pub use jroh_server as server;

// The most commonly used items, importable straight off the facade.
pub use jroh_client::{Client, PendingCall};
pub use jroh_macros::service;
pub use jroh_server::Server;
