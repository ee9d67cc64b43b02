//! Bounded worker pool between the HTTP front-end and the dispatcher
//!
//! A fixed number of long-lived workers share one small queue. Fixing the
//! pool size decouples burst arrival rate from service concurrency: with W
//! workers, at most W user methods run at once, and submission blocks once
//! the queue and all workers are busy, giving natural backpressure.
//!
//! Shutdown is drain-then-terminate: when every queue sender is dropped,
//! each worker finishes the request it holds and exits.

use crate::registry::Registry;
use jroh_core::Result;
use serde_json::value::RawValue;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

/// Default number of workers when the builder is not told otherwise.
pub(crate) const DEFAULT_WORKERS: usize = 10;

/// One request in flight between the front-end and a worker.
pub(crate) struct QueuedRequest {
    pub service: String,
    pub method: String,
    pub params: Option<Box<RawValue>>,
    /// Single-use completion channel; the worker sends exactly one value.
    pub done: oneshot::Sender<Result<Value>>,
}

/// Spawn `workers` worker tasks draining a shared queue and return the
/// submission side.
pub(crate) fn start(registry: Arc<Registry>, workers: usize) -> mpsc::Sender<QueuedRequest> {
    // Capacity 1 keeps submission tightly coupled to worker availability,
    // the closest tokio offers to an unbuffered rendezvous channel.
    let (tx, rx) = mpsc::channel(1);
    let rx = Arc::new(Mutex::new(rx));

    for id in 0..workers.max(1) {
        tokio::spawn(worker_loop(id, Arc::clone(&registry), Arc::clone(&rx)));
    }

    tx
}

/// One worker: receive, dispatch, complete, repeat.
async fn worker_loop(
    id: usize,
    registry: Arc<Registry>,
    queue: Arc<Mutex<mpsc::Receiver<QueuedRequest>>>,
) {
    loop {
        // Hold the queue lock only while waiting for the next request, so
        // dispatch below runs with the queue free for the other workers.
        let request = {
            let mut queue = queue.lock().await;
            queue.recv().await
        };

        let Some(request) = request else {
            tracing::debug!(worker = id, "request queue closed, worker exiting");
            return;
        };

        tracing::debug!(
            worker = id,
            service = %request.service,
            method = %request.method,
            "dispatching request"
        );

        let outcome = registry.serve(
            &request.service,
            &request.method,
            request.params.as_deref(),
        );

        // The completion channel never blocks, and the front-end may have
        // abandoned the request; a dropped receiver is not an error.
        let _ = request.done.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MethodTable, Service};
    use jroh_core::codes;
    use serde_json::json;

    struct Doubler;

    impl Service for Doubler {
        const NAME: &'static str = "Doubler";

        fn method_table(self: Arc<Self>) -> MethodTable {
            let mut table = MethodTable::new();
            table.insert(
                "Double",
                Box::new(|params| {
                    let n: i64 = jroh_core::codec::decode_params(params)?;
                    Ok(json!(n * 2))
                }),
            );
            table
        }
    }

    fn raw(text: &str) -> Box<RawValue> {
        RawValue::from_string(text.to_string()).unwrap()
    }

    async fn submit(
        queue: &mpsc::Sender<QueuedRequest>,
        service: &str,
        method: &str,
        params: Option<Box<RawValue>>,
    ) -> Result<Value> {
        let (done, completion) = oneshot::channel();
        queue
            .send(QueuedRequest {
                service: service.to_string(),
                method: method.to_string(),
                params,
                done,
            })
            .await
            .expect("queue open");
        completion.await.expect("worker replied")
    }

    #[tokio::test]
    async fn workers_dispatch_and_complete() {
        let registry = Arc::new(Registry::new());
        registry.register(Arc::new(Doubler)).unwrap();
        let queue = start(Arc::clone(&registry), 2);

        let value = submit(&queue, "Doubler", "Double", Some(raw("21"))).await.unwrap();
        assert_eq!(value, json!(42));
    }

    #[tokio::test]
    async fn unknown_targets_report_method_not_found() {
        let registry = Arc::new(Registry::new());
        registry.register(Arc::new(Doubler)).unwrap();
        let queue = start(Arc::clone(&registry), 1);

        let err = submit(&queue, "Doubler", "Triple", None).await.unwrap_err();
        assert_eq!(err.to_error_object().code, codes::METHOD_NOT_FOUND);

        let err = submit(&queue, "Nobody", "Double", None).await.unwrap_err();
        assert_eq!(err.to_error_object().code, codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn every_submitted_request_completes_exactly_once() {
        let registry = Arc::new(Registry::new());
        registry.register(Arc::new(Doubler)).unwrap();
        let queue = start(Arc::clone(&registry), 3);

        let mut completions = Vec::new();
        for n in 0..32i64 {
            let (done, completion) = oneshot::channel();
            queue
                .send(QueuedRequest {
                    service: "Doubler".into(),
                    method: "Double".into(),
                    params: Some(raw(&n.to_string())),
                    done,
                })
                .await
                .unwrap();
            completions.push((n, completion));
        }

        for (n, completion) in completions {
            // A oneshot receiver resolving at all proves exactly-once: a
            // second send is impossible by construction.
            let value = completion.await.unwrap().unwrap();
            assert_eq!(value, json!(n * 2));
        }
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_wedge_the_worker() {
        let registry = Arc::new(Registry::new());
        registry.register(Arc::new(Doubler)).unwrap();
        let queue = start(Arc::clone(&registry), 1);

        let (done, completion) = oneshot::channel();
        drop(completion);
        queue
            .send(QueuedRequest {
                service: "Doubler".into(),
                method: "Double".into(),
                params: Some(raw("1")),
                done,
            })
            .await
            .unwrap();

        // The worker must survive the abandoned request and serve the next.
        let value = submit(&queue, "Doubler", "Double", Some(raw("2"))).await.unwrap();
        assert_eq!(value, json!(4));
    }
}
