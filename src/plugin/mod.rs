//! # Expansion Loading
//!
//! Discovers expansions and registers them in a [`Registry`](crate::Registry).
//!
//! ## Sources
//!
//! | Source | Entry point | Unit of failure |
//! |--------|-------------|-----------------|
//! | Host modules | [`Loader::load_host_modules`] | expansion type |
//! | Expansion directory | [`Loader::load_directory`] | binary, then expansion |
//! | Single binary | [`Loader::load_binary`] | binary, then expansion |
//!
//! ## Protocol
//!
//! Expansion binaries communicate via JSON over stdin/stdout, so they can be
//! written in any language.
//!
//! ```text
//! papi                         Expansion Binary
//!  │                               │
//!  ├── Spawn: weather --manifest   │
//!  │                               │
//!  └── Stdout: {"name": "weather", "expansions": [...]}
//!
//!  ├── Spawn: weather              │
//!  ├── Stdin: {"operation": "resolve", "params": {...}}
//!  └── Stdout: {"success": true, "data": "21C"}
//! ```
//!
//! ## Key Types
//!
//! - [`Loader`] - Runs discovery and registration
//! - [`LoadReport`] - Per-batch successes and failures
//! - [`HostModule`] - In-process module exposing [`ExpansionType`]s
//! - [`ExternalModule`] - Expansion binary opened through its manifest
//! - [`CoreModule`] - Built-in expansions

mod builtin;
mod host;
mod loader;
mod process;
mod protocol;

pub use builtin::{CaseExpansion, ContextExpansion, CoreModule, DateExpansion, EnvExpansion};
pub use host::{ExpansionType, HostModule};
pub use loader::{LoadError, LoadFailure, LoadReport, Loader, DEFAULT_HOST_MODULE};
pub use process::{ExternalModule, ProcessExpansion};
pub use protocol::{ExpansionManifest, ManifestEntry, PluginRequest, PluginResponse};
