//! Service registry: name -> service record
//!
//! Registration is a rare setup-time operation and takes the write lock;
//! lookups are on the hot path and take the read lock, so concurrent
//! dispatches never contend with each other. The lock is never held across
//! an await point.

use crate::service::{MethodTable, Service};
use jroh_core::{Error, Result};
use parking_lot::RwLock;
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The bundle a service lives under once registered
///
/// Immutable after creation; destroyed with the registry (or when the last
/// in-flight dispatch drops its `Arc`).
pub struct ServiceRecord {
    name: String,
    methods: MethodTable,
}

impl ServiceRecord {
    /// The name this service was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke a method on this service.
    ///
    /// An unknown method name fails with method-not-found carrying the
    /// name in the error data.
    pub fn call(&self, method: &str, params: Option<&RawValue>) -> Result<Value> {
        match self.methods.get(method) {
            Some(trampoline) => trampoline(params),
            None => Err(Error::MethodNotFound(method.to_string())),
        }
    }

    /// Wire names of the methods this service exposes.
    pub fn method_names(&self) -> Vec<&'static str> {
        self.methods.names().collect()
    }
}

/// Registry mapping service names to service records
#[derive(Default)]
pub struct Registry {
    services: RwLock<HashMap<String, Arc<ServiceRecord>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a receiver under its type name.
    pub fn register<S: Service>(&self, receiver: Arc<S>) -> Result<()> {
        self.register_as(S::NAME, receiver)
    }

    /// Register a receiver under an explicit name.
    ///
    /// Fails when introspection found no suitable methods, or when the
    /// name is already taken.
    pub fn register_as<S: Service>(&self, name: &str, receiver: Arc<S>) -> Result<()> {
        let methods = receiver.method_table();
        if methods.is_empty() {
            return Err(Error::Registration(format!(
                "type {name} has no suitable methods"
            )));
        }

        let record = Arc::new(ServiceRecord {
            name: name.to_string(),
            methods,
        });

        let mut services = self.services.write();
        if services.contains_key(name) {
            return Err(Error::Registration(format!(
                "service already defined: {name}"
            )));
        }
        services.insert(name.to_string(), Arc::clone(&record));
        drop(services);

        tracing::info!(
            service = name,
            methods = record.method_names().len(),
            "service registered"
        );
        Ok(())
    }

    /// Look up a service record by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<ServiceRecord>> {
        self.services.read().get(name).cloned()
    }

    /// Dispatch one request to its target service and method.
    ///
    /// An unknown service fails with method-not-found carrying the service
    /// name in the error data, symmetrical with the unknown-method case.
    pub fn serve(&self, service: &str, method: &str, params: Option<&RawValue>) -> Result<Value> {
        match self.lookup(service) {
            Some(record) => record.call(method, params),
            None => Err(Error::MethodNotFound(service.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jroh_core::codes;
    use serde_json::json;

    /// Hand-rolled service impls, so the registry is testable without the
    /// attribute macro.
    struct Echo;

    impl Service for Echo {
        const NAME: &'static str = "Echo";

        fn method_table(self: Arc<Self>) -> MethodTable {
            let mut table = MethodTable::new();
            table.insert(
                "Ping",
                Box::new(|_params| Ok(json!({"pong": true}))),
            );
            table
        }
    }

    struct Barren;

    impl Service for Barren {
        const NAME: &'static str = "Barren";

        fn method_table(self: Arc<Self>) -> MethodTable {
            MethodTable::new()
        }
    }

    #[test]
    fn register_and_serve() {
        let registry = Registry::new();
        registry.register(Arc::new(Echo)).unwrap();

        let value = registry.serve("Echo", "Ping", None).unwrap();
        assert_eq!(value, json!({"pong": true}));
    }

    #[test]
    fn register_rejects_empty_method_table() {
        let registry = Registry::new();
        let err = registry.register(Arc::new(Barren)).unwrap_err();
        assert!(matches!(err, Error::Registration(_)));
        assert!(registry.lookup("Barren").is_none());
    }

    #[test]
    fn register_rejects_duplicate_names() {
        let registry = Registry::new();
        registry.register(Arc::new(Echo)).unwrap();
        let err = registry.register(Arc::new(Echo)).unwrap_err();
        assert!(matches!(err, Error::Registration(_)));
    }

    #[test]
    fn register_as_uses_explicit_name() {
        let registry = Registry::new();
        registry.register_as("Sonar", Arc::new(Echo)).unwrap();

        assert!(registry.lookup("Sonar").is_some());
        assert!(registry.lookup("Echo").is_none());
        // Explicit names collide just like derived ones.
        let err = registry.register_as("Sonar", Arc::new(Echo)).unwrap_err();
        assert!(matches!(err, Error::Registration(_)));
    }

    #[test]
    fn unknown_service_is_method_not_found_with_name() {
        let registry = Registry::new();
        let err = registry.serve("Nowhere", "X", None).unwrap_err();
        let obj = err.to_error_object();
        assert_eq!(obj.code, codes::METHOD_NOT_FOUND);
        assert_eq!(obj.data, Some(json!("Nowhere")));
    }

    #[test]
    fn unknown_method_is_method_not_found_with_name() {
        let registry = Registry::new();
        registry.register(Arc::new(Echo)).unwrap();
        let err = registry.serve("Echo", "BadOp", None).unwrap_err();
        let obj = err.to_error_object();
        assert_eq!(obj.code, codes::METHOD_NOT_FOUND);
        assert_eq!(obj.data, Some(json!("BadOp")));
    }
}
