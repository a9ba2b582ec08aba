//! Tag substitution
//!
//! Scans text once, left to right, and replaces every tag whose identifier
//! is registered. Substituted values are never re-scanned.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::context::Context;
use super::registry::{RegisteredExpansion, Registry};
use super::tag::{self, Tag};

/// Substituted when an expansion runs but produces no value
pub const NO_VALUE: &str = "NaN";

/// Resolves tags against a registry
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r Registry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Resolves tags on behalf of the given caller
    ///
    /// Context-bound resolution is preferred; context-free resolution is the
    /// fallback. A registered expansion offering neither is reported with a
    /// warning and its tag is left as is.
    pub fn resolve_with_context(&self, context: &Context, text: &str) -> String {
        self.resolve(Some(context), text)
    }

    /// Resolves tags without a caller
    ///
    /// Only context-free resolution is attempted. Tags of expansions that
    /// need a context are left as is, without a warning.
    pub fn resolve_without_context(&self, text: &str) -> String {
        self.resolve(None, text)
    }

    /// Resolves tags, with or without a caller
    pub fn resolve(&self, context: Option<&Context>, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut copied = 0;

        for tag in tag::scan(text) {
            let span = tag.span();
            output.push_str(&text[copied..span.start]);
            match self.substitute(context, &tag) {
                Some(value) => output.push_str(&value),
                None => output.push_str(tag.full_match()),
            }
            copied = span.end;
        }

        output.push_str(&text[copied..]);
        output
    }

    /// Returns the replacement for a tag, or `None` to keep it literally
    fn substitute(&self, context: Option<&Context>, tag: &Tag<'_>) -> Option<String> {
        let entry = self.registry.lookup(tag.identifier())?;
        let parameters = tag.parameters();

        // Dispatch follows the classification made at registration.
        let capabilities = entry.capabilities();
        let value = match context {
            Some(context) if capabilities.context_bound => guarded(&entry, || {
                entry
                    .context_bound()
                    .and_then(|bound| bound.resolve_for(context, parameters))
            }),
            Some(_) if capabilities.context_free => guarded(&entry, || {
                entry.context_free().and_then(|free| free.resolve(parameters))
            }),
            Some(_) => {
                tracing::warn!(
                    identifier = %entry.identifier(),
                    author = %entry.author(),
                    "The expansion {} has no methods for the placeholders, please contact {}",
                    entry.identifier(),
                    entry.author()
                );
                return None;
            }
            None if capabilities.context_free => guarded(&entry, || {
                entry.context_free().and_then(|free| free.resolve(parameters))
            }),
            None => return None,
        };

        Some(value.unwrap_or_else(|| NO_VALUE.to_string()))
    }
}

/// Runs one expansion call; a panic counts as "no value"
fn guarded(entry: &RegisteredExpansion, call: impl FnOnce() -> Option<String>) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => value,
        Err(payload) => {
            tracing::warn!(
                identifier = %entry.identifier(),
                author = %entry.author(),
                "expansion panicked while resolving: {}",
                panic_message(payload.as_ref())
            );
            None
        }
    }
}

/// Extracts the message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
