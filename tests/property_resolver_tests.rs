use proptest::prelude::*;
use resilient_chart::core::{ChartKind, ChartRegistry, ChartTypeResolver};

fn class_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,10}",
        "[a-zA-Z]{1,10}-chart",
        prop::sample::select(ChartKind::ALL.to_vec()).prop_map(|kind| format!("{kind}-chart")),
    ]
}

proptest! {
    #[test]
    fn resolve_is_deterministic(
        host in prop::collection::vec(class_token(), 0..5),
        parent in prop::collection::vec(class_token(), 0..5),
        id in prop::option::of("[a-zA-Z0-9_-]{0,24}"),
    ) {
        let registry = ChartRegistry::builtin();
        let resolver = ChartTypeResolver::new(&registry);

        let first = resolver.resolve(&host, &parent, id.as_deref());
        let second = resolver.resolve(&host, &parent, id.as_deref());
        let fresh = ChartTypeResolver::new(&registry).resolve(&host, &parent, id.as_deref());

        prop_assert_eq!(first, second);
        prop_assert_eq!(first, fresh);
    }

    #[test]
    fn class_matches_always_have_a_registry_entry(
        host in prop::collection::vec(class_token(), 1..5),
    ) {
        let registry = ChartRegistry::builtin();
        let resolver = ChartTypeResolver::new(&registry);

        let kind = resolver.resolve(&host, &[], None);
        prop_assert!(registry.contains(kind));
    }
}
