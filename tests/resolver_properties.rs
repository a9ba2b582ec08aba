//! Property tests for tag resolution

use papi::placeholder::tag;
use papi::{ContextFree, Expansion, Registry, Resolver};
use proptest::prelude::*;

struct Name;

impl Expansion for Name {
    fn identifier(&self) -> &str {
        "name"
    }
    fn author(&self) -> &str {
        "tests"
    }
    fn context_free(&self) -> Option<&dyn ContextFree> {
        Some(self)
    }
}

impl ContextFree for Name {
    fn resolve(&self, _parameters: &str) -> Option<String> {
        Some("Bob".to_string())
    }
}

fn registry_with_name() -> Registry {
    let registry = Registry::new();
    registry.register(Box::new(Name)).unwrap();
    registry
}

proptest! {
    #[test]
    fn text_without_percent_is_unchanged(text in "[^%]*") {
        let registry = registry_with_name();
        let resolver = Resolver::new(&registry);

        prop_assert_eq!(resolver.resolve_without_context(&text), text.clone());
        prop_assert_eq!(
            resolver.resolve_with_context(&papi::Context::new("p"), &text),
            text
        );
    }

    #[test]
    fn empty_registry_changes_nothing(text in "\\PC*") {
        let registry = Registry::new();
        prop_assert_eq!(Resolver::new(&registry).resolve_without_context(&text), text);
    }

    #[test]
    fn unknown_tags_are_kept_byte_for_byte(
        parts in prop::collection::vec(("[a-zA-Z0-9]{1,8}", "[^%]{1,12}", "[^%]{0,6}"), 0..6)
    ) {
        let registry = registry_with_name();
        let text: String = parts
            .iter()
            .filter(|(id, _, _)| id != "name")
            .map(|(id, params, gap)| format!("%{}_{}%{}", id, params, gap))
            .collect();

        prop_assert_eq!(Resolver::new(&registry).resolve_without_context(&text), text);
    }

    #[test]
    fn resolved_text_is_stable(text in "[a-z %_]{0,40}") {
        let registry = registry_with_name();
        let resolver = Resolver::new(&registry);

        let once = resolver.resolve_without_context(&text);
        prop_assume!(tag::scan(&once).next().is_none());
        prop_assert_eq!(resolver.resolve_without_context(&once), once);
    }

    #[test]
    fn known_tag_is_replaced_in_place(
        before in "[^%]{0,10}",
        params in "[^%]{1,10}",
        after in "[^%]{0,10}",
    ) {
        let registry = registry_with_name();
        let text = format!("{}%name_{}%{}", before, params, after);

        prop_assert_eq!(
            Resolver::new(&registry).resolve_without_context(&text),
            format!("{}Bob{}", before, after)
        );
    }
}
