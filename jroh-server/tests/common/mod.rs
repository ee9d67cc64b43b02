//! Shared fixtures for jroh-server integration tests
//!
//! `Arith` is the canonical test service: some methods take value args,
//! some take references. That's deliberate, so both calling conventions
//! stay covered.

#![allow(dead_code)]

use jroh_core::ServiceError;
use jroh_macros::service;
use jroh_server::Server;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

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

    pub fn mul(&self, args: &Args, reply: &mut Reply) -> Result<(), ServiceError> {
        reply.c = args.a * args.b;
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

/// Boot a server with the Arith service on an OS-chosen port.
///
/// Returns the bound address and the full RPC endpoint URL.
pub async fn start_server() -> (SocketAddr, String) {
    start_server_with_workers(10).await
}

pub async fn start_server_with_workers(workers: usize) -> (SocketAddr, String) {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = Server::builder()
        .bind(addr)
        .workers(workers)
        .build()
        .await
        .unwrap();
    server.register(Arc::new(Arith)).unwrap();

    let local = server.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run().await;
    });

    (local, format!("http://{local}/rpc"))
}

/// POST a raw body to the endpoint; the tests control every byte.
pub async fn post_raw(url: &str, body: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .header("content-type", "application/json; charset=utf-8")
        .body(body.to_string())
        .send()
        .await
        .unwrap()
}
