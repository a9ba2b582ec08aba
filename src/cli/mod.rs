//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create `.papi/` with a default config and expansion directory |
//! | `resolve` | Resolve tags in text (argument or stdin) |
//! | `expansion list` | Show registered expansions |
//! | `expansion load` | Load one expansion binary and report |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Warnings and errors go to stderr. Use `--verbose` (or `-v`) for debug
//! output, or set `RUST_LOG`:
//! ```bash
//! papi --verbose resolve "%upper_hi%"
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod expansion_cmd;
mod logging;
mod output;
mod resolve_cmd;
mod session;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
