//! Built-in expansions
//!
//! Shipped with the CLI as the `core` host module:
//!
//! | Tag | Capability | Value |
//! |-----|------------|-------|
//! | `%env_NAME%` | context-free | environment variable `NAME` |
//! | `%date_FORMAT%` | context-free | current UTC time (`rfc3339`, `unix`, `date`, `time`) |
//! | `%upper_TEXT%` | context-free | `TEXT` in upper case |
//! | `%lower_TEXT%` | context-free | `TEXT` in lower case |
//! | `%context_KEY%` | context-bound | caller id (`id`) or attribute `KEY` |

use chrono::Utc;

use super::host::{ExpansionType, HostModule};
use crate::placeholder::{Context, ContextBound, ContextFree, Expansion};

const AUTHOR: &str = "papi";

/// Host module holding the built-in expansions
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreModule;

impl CoreModule {
    pub const NAME: &'static str = "core";
}

impl HostModule for CoreModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn expansion_types(&self) -> Vec<ExpansionType> {
        vec![
            ExpansionType::of::<EnvExpansion>(),
            ExpansionType::of::<DateExpansion>(),
            ExpansionType::new("upper", || Ok(Box::new(CaseExpansion::Upper) as Box<dyn Expansion>)),
            ExpansionType::new("lower", || Ok(Box::new(CaseExpansion::Lower) as Box<dyn Expansion>)),
            ExpansionType::of::<ContextExpansion>(),
        ]
    }
}

/// `%env_NAME%`
#[derive(Debug, Default)]
pub struct EnvExpansion;

impl Expansion for EnvExpansion {
    fn identifier(&self) -> &str {
        "env"
    }

    fn author(&self) -> &str {
        AUTHOR
    }

    fn context_free(&self) -> Option<&dyn ContextFree> {
        Some(self)
    }
}

impl ContextFree for EnvExpansion {
    fn resolve(&self, parameters: &str) -> Option<String> {
        std::env::var(parameters).ok()
    }
}

/// `%date_FORMAT%`
#[derive(Debug, Default)]
pub struct DateExpansion;

impl Expansion for DateExpansion {
    fn identifier(&self) -> &str {
        "date"
    }

    fn author(&self) -> &str {
        AUTHOR
    }

    fn context_free(&self) -> Option<&dyn ContextFree> {
        Some(self)
    }
}

impl ContextFree for DateExpansion {
    fn resolve(&self, parameters: &str) -> Option<String> {
        let now = Utc::now();
        match parameters {
            "rfc3339" => Some(now.to_rfc3339()),
            "unix" => Some(now.timestamp().to_string()),
            "date" => Some(now.format("%Y-%m-%d").to_string()),
            "time" => Some(now.format("%H:%M:%S").to_string()),
            _ => None,
        }
    }
}

/// `%upper_TEXT%` and `%lower_TEXT%`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseExpansion {
    Upper,
    Lower,
}

impl Expansion for CaseExpansion {
    fn identifier(&self) -> &str {
        match self {
            CaseExpansion::Upper => "upper",
            CaseExpansion::Lower => "lower",
        }
    }

    fn author(&self) -> &str {
        AUTHOR
    }

    fn context_free(&self) -> Option<&dyn ContextFree> {
        Some(self)
    }
}

impl ContextFree for CaseExpansion {
    fn resolve(&self, parameters: &str) -> Option<String> {
        match self {
            CaseExpansion::Upper => Some(parameters.to_uppercase()),
            CaseExpansion::Lower => Some(parameters.to_lowercase()),
        }
    }
}

/// `%context_KEY%`
#[derive(Debug, Default)]
pub struct ContextExpansion;

impl Expansion for ContextExpansion {
    fn identifier(&self) -> &str {
        "context"
    }

    fn author(&self) -> &str {
        AUTHOR
    }

    fn context_bound(&self) -> Option<&dyn ContextBound> {
        Some(self)
    }
}

impl ContextBound for ContextExpansion {
    fn resolve_for(&self, context: &Context, parameters: &str) -> Option<String> {
        match parameters {
            "id" => Some(context.id().to_string()),
            key => context.attribute(key).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{Registry, Resolver};

    fn core_registry() -> Registry {
        let registry = Registry::new();
        for ty in CoreModule.expansion_types() {
            registry
                .register_from(CoreModule::NAME, ty.instantiate().unwrap())
                .unwrap();
        }
        registry
    }

    #[test]
    fn core_module_registers_all() {
        let registry = core_registry();
        let ids: Vec<_> = registry
            .entries()
            .iter()
            .map(|e| e.identifier().to_string())
            .collect();

        assert_eq!(ids, vec!["context", "date", "env", "lower", "upper"]);
    }

    #[test]
    fn case_conversion() {
        let registry = core_registry();
        let resolver = Resolver::new(&registry);

        assert_eq!(
            resolver.resolve_without_context("%upper_hello world% %lower_LOUD%"),
            "HELLO WORLD loud"
        );
    }

    #[test]
    fn env_lookup() {
        let registry = core_registry();
        let resolver = Resolver::new(&registry);

        assert_eq!(
            resolver.resolve_without_context("%env_PAPI_SURELY_UNSET_VARIABLE%"),
            "NaN"
        );
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(resolver.resolve_without_context("%env_PATH%"), path);
        }
    }

    #[test]
    fn date_formats() {
        let date = DateExpansion;

        let day = date.resolve("date").unwrap();
        assert_eq!(day.len(), 10);
        assert!(date.resolve("unix").unwrap().parse::<i64>().is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&date.resolve("rfc3339").unwrap()).is_ok());
        assert_eq!(date.resolve("fortnight"), None);
    }

    #[test]
    fn context_requires_caller() {
        let registry = core_registry();
        let resolver = Resolver::new(&registry);
        let ctx = Context::new("p1").with_attribute("team", "red");

        assert_eq!(
            resolver.resolve_with_context(&ctx, "%context_id% on %context_team% %context_rank%"),
            "p1 on red NaN"
        );
        assert_eq!(resolver.resolve_without_context("%context_id%"), "%context_id%");
    }
}
