//! papi - placeholder expansion engine
//!
//! Resolves `%identifier_params%` tags embedded in text. Each identifier is
//! routed to an expansion registered in a [`Registry`]; expansions come from
//! host modules, from a directory of expansion binaries, or from a single
//! binary, loaded by the [`Loader`](plugin::Loader).
//!
//! ```
//! use papi::{ContextFree, Expansion, Registry, Resolver};
//!
//! struct Name;
//!
//! impl Expansion for Name {
//!     fn identifier(&self) -> &str { "name" }
//!     fn author(&self) -> &str { "docs" }
//!     fn context_free(&self) -> Option<&dyn ContextFree> { Some(self) }
//! }
//!
//! impl ContextFree for Name {
//!     fn resolve(&self, _parameters: &str) -> Option<String> { Some("Bob".into()) }
//! }
//!
//! let registry = Registry::new();
//! registry.register(Box::new(Name)).unwrap();
//!
//! let text = Resolver::new(&registry).resolve_without_context("Hello %name_123%, %unknown_x%!");
//! assert_eq!(text, "Hello Bob, %unknown_x%!");
//! ```

pub mod placeholder;
pub mod plugin;
pub mod config;
pub mod cli;

#[cfg(test)]
mod test_support;

pub use placeholder::{
    Capabilities, Capability, Context, ContextBound, ContextFree, Expansion, Registry, Resolver,
};
