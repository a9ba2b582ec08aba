//! # Placeholder Engine
//!
//! Resolves `%identifier_params%` tags in arbitrary text.
//!
//! ## Resolution Rules
//!
//! | Situation | With context | Without context |
//! |-----------|--------------|-----------------|
//! | Unknown identifier | tag kept | tag kept |
//! | Context-bound expansion | context-bound value | tag kept |
//! | Context-free expansion | context-free value | context-free value |
//! | Both capabilities | context-bound value | context-free value |
//! | Inert expansion | tag kept + warning | tag kept |
//! | Expansion returns no value | `NaN` | `NaN` |
//!
//! ## Key Types
//!
//! - [`Registry`] - Identifier to expansion mapping
//! - [`Resolver`] - Single-pass substitution over a registry
//! - [`Expansion`] - Contract implemented by every expansion
//! - [`Context`] - Opaque caller identity

mod context;
mod expansion;
mod registry;
mod resolver;
pub mod tag;

pub use context::Context;
pub use expansion::{Capabilities, Capability, ContextBound, ContextFree, Expansion};
pub use registry::{RegisteredExpansion, Registration, Registry, RegistryError};
pub use resolver::{Resolver, NO_VALUE};
pub use tag::Tag;

pub(crate) use resolver::panic_message;
