//! Async JSON-RPC 2.0 client over HTTP
//!
//! This crate provides [`Client`], an HTTP JSON-RPC 2.0 client built
//! around per-call completion handles:
//!
//! - [`Client::call`] enqueues a call and returns a typed
//!   [`PendingCall`] handle without waiting for the network
//! - a single sender task drains the queue, assigns strictly increasing
//!   request ids (starting at 1), and POSTs each request
//! - every handle resolves exactly once, with the decoded reply or a
//!   terminal error
//!
//! Fan-out over one client is natural: start several calls, then await
//! their handles in any order. Submission to the transport stays FIFO;
//! completion order is whatever the server makes of it.

mod call;
mod client;

pub use call::PendingCall;
pub use client::Client;
