//! Expansion contract
//!
//! An expansion names itself and may provide one or both resolution
//! capabilities. Capabilities are offered through accessor methods that
//! default to `None`, so an implementation only opts into what it overrides:
//!
//! ```
//! use papi::{ContextFree, Expansion};
//!
//! struct Shout;
//!
//! impl Expansion for Shout {
//!     fn identifier(&self) -> &str { "shout" }
//!     fn author(&self) -> &str { "docs" }
//!     fn context_free(&self) -> Option<&dyn ContextFree> { Some(self) }
//! }
//!
//! impl ContextFree for Shout {
//!     fn resolve(&self, parameters: &str) -> Option<String> {
//!         Some(parameters.to_uppercase())
//!     }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::Context;

/// A named unit producing substitution values for one identifier
///
/// The capability accessors are read once, at registration. They must keep
/// answering the same way afterwards; an accessor that later returns `None`
/// resolves to `NaN` rather than falling back to the other capability.
pub trait Expansion: Send + Sync {
    /// Routing key matched against a tag's identifier
    fn identifier(&self) -> &str;

    /// Who to contact about this expansion
    fn author(&self) -> &str;

    /// Resolution that needs the caller's context
    fn context_bound(&self) -> Option<&dyn ContextBound> {
        None
    }

    /// Resolution that works without a context
    fn context_free(&self) -> Option<&dyn ContextFree> {
        None
    }
}

/// Context-bound resolution
///
/// `None` means the expansion ran but had no value to offer.
pub trait ContextBound {
    fn resolve_for(&self, context: &Context, parameters: &str) -> Option<String>;
}

/// Context-free resolution
///
/// `None` means the expansion ran but had no value to offer.
pub trait ContextFree {
    fn resolve(&self, parameters: &str) -> Option<String>;
}

/// A single resolution entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ContextBound,
    ContextFree,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ContextBound => "context_bound",
            Capability::ContextFree => "context_free",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of capabilities an expansion provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub context_bound: bool,
    pub context_free: bool,
}

impl Capabilities {
    /// Classifies an expansion by the capabilities it offers
    pub fn of(expansion: &dyn Expansion) -> Self {
        Self {
            context_bound: expansion.context_bound().is_some(),
            context_free: expansion.context_free().is_some(),
        }
    }

    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::ContextBound => self.context_bound,
            Capability::ContextFree => self.context_free,
        }
    }

    /// An inert expansion cannot resolve anything
    pub fn is_inert(&self) -> bool {
        !self.context_bound && !self.context_free
    }

    pub fn to_vec(&self) -> Vec<Capability> {
        [Capability::ContextBound, Capability::ContextFree]
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut caps = Capabilities::default();
        for capability in iter {
            match capability {
                Capability::ContextBound => caps.context_bound = true,
                Capability::ContextFree => caps.context_free = true,
            }
        }
        caps
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inert() {
            return f.write_str("none");
        }
        let names: Vec<_> = self.to_vec().iter().map(Capability::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;

    impl Expansion for Inert {
        fn identifier(&self) -> &str {
            "inert"
        }
        fn author(&self) -> &str {
            "tests"
        }
    }

    struct Both;

    impl Expansion for Both {
        fn identifier(&self) -> &str {
            "both"
        }
        fn author(&self) -> &str {
            "tests"
        }
        fn context_bound(&self) -> Option<&dyn ContextBound> {
            Some(self)
        }
        fn context_free(&self) -> Option<&dyn ContextFree> {
            Some(self)
        }
    }

    impl ContextBound for Both {
        fn resolve_for(&self, context: &Context, _parameters: &str) -> Option<String> {
            Some(context.id().to_string())
        }
    }

    impl ContextFree for Both {
        fn resolve(&self, _parameters: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn default_expansion_is_inert() {
        let caps = Capabilities::of(&Inert);
        assert!(caps.is_inert());
        assert_eq!(caps.to_string(), "none");
    }

    #[test]
    fn overridden_accessors_are_detected() {
        let caps = Capabilities::of(&Both);
        assert!(caps.contains(Capability::ContextBound));
        assert!(caps.contains(Capability::ContextFree));
        assert_eq!(caps.to_string(), "context_bound, context_free");
    }

    #[test]
    fn collect_from_capability_list() {
        let caps: Capabilities = vec![Capability::ContextFree].into_iter().collect();
        assert_eq!(caps.to_vec(), vec![Capability::ContextFree]);
        assert!(!caps.context_bound);
    }

    #[test]
    fn capability_names_match_manifest_format() {
        let json = serde_json::to_string(&Capability::ContextBound).unwrap();
        assert_eq!(json, r#""context_bound""#);
    }
}
