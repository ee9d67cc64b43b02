//! Per-call completion handles
//!
//! Every outbound call gets a dedicated oneshot channel. Exactly one value
//! is ever sent on it, by the sender task, so "received" is the same thing
//! as "completed". The handle is typed: awaiting it decodes the raw result
//! blob into the caller's reply type.

use jroh_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use serde_json::Value;
use std::marker::PhantomData;
use tokio::sync::oneshot;

/// What the sender task publishes for one call: the raw result blob on
/// success, the terminal error otherwise.
pub(crate) type CallOutcome = std::result::Result<Box<RawValue>, Error>;

/// One call queued for the sender task.
pub(crate) struct CallRequest {
    pub method: String,
    pub params: Value,
    /// Single-use completion channel; published exactly once.
    pub done: oneshot::Sender<CallOutcome>,
}

/// Handle to an in-flight call
///
/// Returned by [`Client::call`](crate::Client::call). Resolves exactly
/// once, even when the client is closed while the call is in flight.
pub struct PendingCall<R> {
    completion: oneshot::Receiver<CallOutcome>,
    reply: PhantomData<fn() -> R>,
}

impl<R: DeserializeOwned> PendingCall<R> {
    pub(crate) fn new(completion: oneshot::Receiver<CallOutcome>) -> Self {
        Self {
            completion,
            reply: PhantomData,
        }
    }

    /// Wait for the call to complete and decode the result into the reply
    /// type.
    ///
    /// A response carrying an `error` member surfaces as `Error::Rpc` with
    /// the decoded error object; transport failures surface as
    /// `Error::Http`.
    pub async fn recv(self) -> Result<R> {
        let outcome = self
            .completion
            .await
            .map_err(|_| Error::ConnectionClosed)?;
        let raw = outcome?;
        serde_json::from_str(raw.get()).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> Box<RawValue> {
        RawValue::from_string(text.to_string()).unwrap()
    }

    #[tokio::test]
    async fn recv_decodes_the_result_blob() {
        let (tx, rx) = oneshot::channel();
        let pending: PendingCall<i64> = PendingCall::new(rx);
        tx.send(Ok(raw("42"))).unwrap();
        assert_eq!(pending.recv().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn recv_surfaces_the_terminal_error() {
        let (tx, rx) = oneshot::channel();
        let pending: PendingCall<i64> = PendingCall::new(rx);
        tx.send(Err(Error::Http("connection refused".into()))).unwrap();
        assert!(matches!(pending.recv().await, Err(Error::Http(_))));
    }

    #[tokio::test]
    async fn recv_reports_a_vanished_sender_as_closed() {
        let (tx, rx) = oneshot::channel::<CallOutcome>();
        drop(tx);
        let pending: PendingCall<i64> = PendingCall::new(rx);
        assert!(matches!(pending.recv().await, Err(Error::ConnectionClosed)));
    }

    #[tokio::test]
    async fn recv_rejects_a_mismatched_reply_type() {
        let (tx, rx) = oneshot::channel();
        let pending: PendingCall<i64> = PendingCall::new(rx);
        tx.send(Ok(raw("\"not a number\""))).unwrap();
        assert!(matches!(pending.recv().await, Err(Error::Serialization(_))));
    }
}
