//! In-process expansion modules
//!
//! A host module is a unit of code already linked into (or loaded by) the
//! host that exposes expansion types. Each [`ExpansionType`] is a constructor
//! the loader calls once to obtain an instance to register.

use std::fmt;

use anyhow::Result;

use crate::placeholder::Expansion;

type Constructor = Box<dyn Fn() -> Result<Box<dyn Expansion>> + Send + Sync>;

/// Constructor entry point for one expansion type
pub struct ExpansionType {
    name: String,
    construct: Constructor,
}

impl ExpansionType {
    /// Creates an entry point from a fallible constructor
    pub fn new<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Expansion>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            construct: Box::new(construct),
        }
    }

    /// Creates an entry point for a type constructed with `Default`
    pub fn of<E>() -> Self
    where
        E: Expansion + Default + 'static,
    {
        Self::new(std::any::type_name::<E>(), || {
            Ok(Box::new(E::default()) as Box<dyn Expansion>)
        })
    }

    /// Type name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructs a fresh instance
    pub fn instantiate(&self) -> Result<Box<dyn Expansion>> {
        (self.construct)()
    }
}

impl fmt::Debug for ExpansionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpansionType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A module known to the host that may contribute expansions
pub trait HostModule {
    /// Module name; the loader skips the module named like the host itself
    fn name(&self) -> &str;

    /// Expansion types exposed by this module
    fn expansion_types(&self) -> Vec<ExpansionType>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Quiet;

    impl Expansion for Quiet {
        fn identifier(&self) -> &str {
            "quiet"
        }
        fn author(&self) -> &str {
            "tests"
        }
    }

    #[test]
    fn of_uses_default_constructor() {
        let ty = ExpansionType::of::<Quiet>();

        assert!(ty.name().ends_with("Quiet"));
        assert_eq!(ty.instantiate().unwrap().identifier(), "quiet");
    }

    #[test]
    fn constructor_errors_surface() {
        let ty = ExpansionType::new("broken", || anyhow::bail!("missing settings"));

        let err = ty.instantiate().err().unwrap();
        assert_eq!(err.to_string(), "missing settings");
    }
}
