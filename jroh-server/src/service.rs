//! Service trait, method tables, and the trampoline invoker
//!
//! A service is an ordinary object whose eligible methods were turned into
//! a [`MethodTable`] by the `#[service]` macro in `jroh-macros`. Each table
//! entry is a trampoline closure holding an `Arc` of the receiver plus the
//! static knowledge of its argument and reply types, so the dispatcher can
//! materialize and decode values for a method it knows nothing about.
//!
//! # Method shape
//!
//! ```ignore
//! pub fn name(&self, args: Args, reply: &mut Reply) -> Result<(), ServiceError>
//! ```
//!
//! The argument may also be taken as `&Args`. The reply is always behind
//! `&mut` so the method fills in a value the runtime allocated, mirroring
//! the reply-pointer convention of classic RPC registries.

use jroh_core::{codec, Error, Result, ServiceError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// One registered method: decodes params, invokes the receiver, returns
/// the serialized reply.
pub type MethodFn = Box<dyn Fn(Option<&RawValue>) -> Result<Value> + Send + Sync>;

/// Map from wire method name to trampoline
///
/// Built once at registration time and immutable afterwards.
#[derive(Default)]
pub struct MethodTable {
    methods: HashMap<&'static str, MethodFn>,
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method under its wire name. Called from generated code.
    pub fn insert(&mut self, name: &'static str, method: MethodFn) {
        self.methods.insert(name, method);
    }

    /// Look up a method by wire name.
    pub fn get(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    /// True when introspection found no eligible methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// The wire names of all registered methods.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.keys().copied()
    }
}

/// A receiver object whose eligible methods can be exposed remotely
///
/// Implemented by the `#[service]` attribute macro; not meant to be written
/// by hand (though tests do, to exercise the registry directly).
pub trait Service: Send + Sync + 'static {
    /// Default service name: the receiver's type name.
    const NAME: &'static str;

    /// Build the dispatch table for this receiver.
    ///
    /// Every entry captures a clone of the `Arc`, so the table keeps the
    /// receiver alive for as long as the service stays registered.
    fn method_table(self: Arc<Self>) -> MethodTable;
}

/// Run one method invocation: materialize, decode, call, extract.
///
/// This is the shared body of every generated trampoline:
///
/// 1. allocate a fresh zero argument value and decode the raw params into
///    it (absent or `null` params leave the zero value untouched);
/// 2. allocate a fresh zero reply value;
/// 3. invoke the target with `(args, &mut reply)`;
/// 4. apply the user-error policy via `ServiceError`'s conversion; the
///    reply is discarded when the method failed;
/// 5. serialize the reply.
pub fn invoke<A, R, F>(params: Option<&RawValue>, call: F) -> Result<Value>
where
    A: DeserializeOwned + Default,
    R: Serialize + Default,
    F: FnOnce(A, &mut R) -> std::result::Result<(), ServiceError>,
{
    let args: A = codec::decode_params(params)?;
    let mut reply = R::default();
    call(args, &mut reply).map_err(Error::from)?;
    serde_json::to_value(&reply).map_err(|e| Error::Serialization(e.to_string()))
}
