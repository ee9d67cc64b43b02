//! Demo JSON-RPC client: fans out a few calculator calls, then awaits the
//! handles.

use jroh_client::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:5000/rpc".to_string());

    let client = Client::new(&url)?;
    tracing::info!(endpoint = client.endpoint(), "connecting");

    // Start all calls before awaiting any of them; the handles resolve
    // independently.
    let mut calls = Vec::new();
    for i in 0..3i64 {
        let call = client
            .call::<_, i64>("Calculator.Add", &json!({"A": 2 + i, "B": 3}))
            .await;
        calls.push((i, call));
    }

    for (i, call) in calls {
        match call.recv().await {
            Ok(reply) => println!("reply {i}: {reply}"),
            Err(err) => eprintln!("call {i} failed: {err}"),
        }
    }

    let stats = client
        .call::<_, serde_json::Value>("ServerInfo.ServerStats", &serde_json::Value::Null)
        .await;
    println!("server stats: {}", stats.recv().await?);

    client.close();
    Ok(())
}
