//! Expansion registry
//!
//! Maps identifiers to registered expansions. Registration overwrites any
//! previous entry under the same identifier, so an expansion can be swapped
//! at runtime by registering its replacement.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use thiserror::Error;

use super::expansion::{Capabilities, ContextBound, ContextFree, Expansion};
use super::tag;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid expansion identifier '{0}': expected one or more ASCII letters or digits")]
    InvalidIdentifier(String),
}

/// An expansion together with its capability classification
pub struct RegisteredExpansion {
    expansion: Box<dyn Expansion>,
    capabilities: Capabilities,
    origin: Option<String>,
}

impl RegisteredExpansion {
    pub fn identifier(&self) -> &str {
        self.expansion.identifier()
    }

    pub fn author(&self) -> &str {
        self.expansion.author()
    }

    /// Capabilities as classified at registration time
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Module that supplied the expansion, if it came through the loader
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Context-bound entry point, if classified as present
    pub fn context_bound(&self) -> Option<&dyn ContextBound> {
        if self.capabilities.context_bound {
            self.expansion.context_bound()
        } else {
            None
        }
    }

    /// Context-free entry point, if classified as present
    pub fn context_free(&self) -> Option<&dyn ContextFree> {
        if self.capabilities.context_free {
            self.expansion.context_free()
        } else {
            None
        }
    }
}

impl fmt::Debug for RegisteredExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredExpansion")
            .field("identifier", &self.identifier())
            .field("author", &self.author())
            .field("capabilities", &self.capabilities)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Outcome of a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub identifier: String,
    pub author: String,
    pub capabilities: Capabilities,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// True if an earlier expansion with the same identifier was replaced
    pub replaced: bool,
}

/// Identifier to expansion mapping
#[derive(Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Arc<RegisteredExpansion>>>,
}

impl Registry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an expansion, replacing any entry with the same identifier
    pub fn register(&self, expansion: Box<dyn Expansion>) -> Result<Registration, RegistryError> {
        self.insert(expansion, None)
    }

    /// Registers an expansion supplied by the named module
    pub fn register_from(
        &self,
        origin: impl Into<String>,
        expansion: Box<dyn Expansion>,
    ) -> Result<Registration, RegistryError> {
        self.insert(expansion, Some(origin.into()))
    }

    fn insert(
        &self,
        expansion: Box<dyn Expansion>,
        origin: Option<String>,
    ) -> Result<Registration, RegistryError> {
        let identifier = expansion.identifier().to_string();
        if !tag::is_valid_identifier(&identifier) {
            return Err(RegistryError::InvalidIdentifier(identifier));
        }

        let capabilities = Capabilities::of(expansion.as_ref());
        let entry = Arc::new(RegisteredExpansion {
            expansion,
            capabilities,
            origin,
        });

        let registration = Registration {
            identifier: identifier.clone(),
            author: entry.author().to_string(),
            capabilities,
            origin: entry.origin.clone(),
            replaced: false,
        };

        let previous = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identifier, entry);

        if let Some(previous) = &previous {
            tracing::debug!(
                identifier = %registration.identifier,
                previous_author = %previous.author(),
                "replaced registered expansion"
            );
        }

        Ok(Registration {
            replaced: previous.is_some(),
            ..registration
        })
    }

    /// Removes an expansion; returns false if it was not registered
    pub fn unregister(&self, identifier: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identifier)
            .is_some()
    }

    /// Looks up an expansion by identifier
    pub fn lookup(&self, identifier: &str) -> Option<Arc<RegisteredExpansion>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries, sorted by identifier
    pub fn entries(&self) -> Vec<Arc<RegisteredExpansion>> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        entries
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        id: &'static str,
        author: &'static str,
        value: &'static str,
    }

    impl Expansion for Fixed {
        fn identifier(&self) -> &str {
            self.id
        }
        fn author(&self) -> &str {
            self.author
        }
        fn context_free(&self) -> Option<&dyn ContextFree> {
            Some(self)
        }
    }

    impl ContextFree for Fixed {
        fn resolve(&self, _parameters: &str) -> Option<String> {
            Some(self.value.to_string())
        }
    }

    fn fixed(id: &'static str, value: &'static str) -> Box<dyn Expansion> {
        Box::new(Fixed {
            id,
            author: "tests",
            value,
        })
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("name").is_none());
    }

    #[test]
    fn register_and_lookup() {
        let registry = Registry::new();
        let registration = registry.register(fixed("name", "Bob")).unwrap();

        assert_eq!(registration.identifier, "name");
        assert!(registration.capabilities.context_free);
        assert!(!registration.capabilities.context_bound);
        assert!(!registration.replaced);

        let entry = registry.lookup("name").unwrap();
        assert_eq!(entry.author(), "tests");
        assert_eq!(entry.origin(), None);
        assert_eq!(
            entry.context_free().and_then(|r| r.resolve("x")),
            Some("Bob".to_string())
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = Registry::new();
        registry.register(fixed("name", "Bob")).unwrap();

        assert!(registry.lookup("Name").is_none());
    }

    #[test]
    fn reregistration_overwrites() {
        let registry = Registry::new();
        registry.register(fixed("name", "Bob")).unwrap();
        let second = registry.register(fixed("name", "Alice")).unwrap();

        assert!(second.replaced);
        assert_eq!(registry.len(), 1);

        let entry = registry.lookup("name").unwrap();
        assert_eq!(
            entry.context_free().and_then(|r| r.resolve("")),
            Some("Alice".to_string())
        );
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = Registry::new();
        registry.register(fixed("name", "Bob")).unwrap();

        assert!(registry.unregister("name"));
        assert!(!registry.unregister("name"));
        assert!(!registry.contains("name"));
    }

    #[test]
    fn invalid_identifier_is_rejected() {
        let registry = Registry::new();
        let err = registry.register(fixed("bad_id", "x")).unwrap_err();

        assert!(matches!(err, RegistryError::InvalidIdentifier(id) if id == "bad_id"));
        assert!(registry.is_empty());
    }

    #[test]
    fn register_from_records_origin() {
        let registry = Registry::new();
        let registration = registry.register_from("weather", fixed("temp", "21")).unwrap();

        assert_eq!(registration.origin.as_deref(), Some("weather"));
        assert_eq!(registry.lookup("temp").unwrap().origin(), Some("weather"));
    }

    #[test]
    fn entries_are_sorted() {
        let registry = Registry::new();
        registry.register(fixed("zeta", "z")).unwrap();
        registry.register(fixed("alpha", "a")).unwrap();

        let ids: Vec<_> = registry
            .entries()
            .iter()
            .map(|e| e.identifier().to_string())
            .collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn concurrent_lookups() {
        let registry = Arc::new(Registry::new());
        registry.register(fixed("name", "Bob")).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.lookup("name").is_some())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
