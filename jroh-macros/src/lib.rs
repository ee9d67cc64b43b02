//! Procedural macros for the jroh RPC toolkit
//!
//! # `#[service]` - RPC service impl block
//!
//! The source language of classic RPC registries discovers remotely
//! callable methods by runtime reflection. Rust has no reflection, so the
//! discovery step runs at compile time instead: `#[service]` inspects an
//! inherent impl block and emits a `{name -> trampoline}` method table,
//! preserving the ergonomic "register an object" API with full static type
//! safety.
//!
//! A method is picked up if and only if it looks like an RPC endpoint:
//!
//! 1. it is `pub` (non-public methods are internal by definition);
//! 2. it takes exactly `&self`, an argument (by value or by `&` reference),
//!    and a reply by `&mut` reference;
//! 3. it returns `Result<(), ServiceError>`;
//! 4. it is a plain method: not `async`, not generic, not `unsafe`.
//!
//! Anything else in the block is left alone and stays callable as ordinary
//! Rust. If nothing qualifies, the generated table is empty and
//! registration fails at runtime with a "no suitable methods" error.
//!
//! Wire method names are the PascalCase form of the method ident, so
//! `fn add` answers to `"Add"` and `fn server_stats` to `"ServerStats"`.
//! The wire service name defaults to the type's ident and can be overridden
//! at registration time.
//!
//! # Example
//!
//! ```ignore
//! use jroh_core::ServiceError;
//! use jroh_macros::service;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Deserialize)]
//! struct Args { a: i64, b: i64 }
//!
//! #[derive(Default, Serialize)]
//! struct Reply { c: i64 }
//!
//! struct Arith;
//!
//! #[service]
//! impl Arith {
//!     // Exposed as "Arith.Add".
//!     pub fn add(&self, args: Args, reply: &mut Reply) -> Result<(), ServiceError> {
//!         reply.c = args.a + args.b;
//!         Ok(())
//!     }
//!
//!     // Not eligible (no reply parameter): stays a plain method.
//!     fn describe(&self) -> &'static str {
//!         "arithmetic"
//!     }
//! }
//! ```
//!
//! The generated code implements `jroh_server::Service` for the type, so
//! `jroh_server` must be a direct dependency wherever the macro is used.

mod service;

use proc_macro::TokenStream;

/// Attribute macro exposing the eligible methods of an impl block as an
/// RPC service.
///
/// See the crate-level documentation for the eligibility rules and an
/// example. The expansion keeps the impl block unchanged and appends a
/// `jroh_server::Service` implementation whose method table holds one
/// trampoline per eligible method. Each trampoline materializes a fresh
/// zero argument value, decodes the raw params into it, invokes the method
/// with a fresh zero reply, and serializes the reply back.
#[proc_macro_attribute]
pub fn service(attr: TokenStream, item: TokenStream) -> TokenStream {
    service::expand(attr, item)
}
