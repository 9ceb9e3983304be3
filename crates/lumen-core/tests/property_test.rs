use lumen_core::config::{TransportConfig, TransportConfigPatch};
use lumen_core::{Action, Category};
use proptest::prelude::*;

fn any_action() -> impl Strategy<Value = Action> {
    (0..Action::ALL.len()).prop_map(|i| Action::ALL[i])
}

fn any_category() -> impl Strategy<Value = Category> {
    (0..Category::ALL.len()).prop_map(|i| Category::ALL[i])
}

proptest! {
    #[test]
    fn action_names_parse_back(action in any_action()) {
        prop_assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        let json = serde_json::to_string(&action).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", action.as_str()));
    }

    #[test]
    fn category_names_parse_back(category in any_category()) {
        prop_assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
    }

    #[test]
    fn unknown_names_are_rejected(name in "[a-z_]{1,24}") {
        let known = Action::ALL.iter().any(|a| a.as_str() == name);
        prop_assert_eq!(name.parse::<Action>().is_ok(), known);
    }

    #[test]
    fn patch_only_touches_fields_it_sets(
        max_retries in proptest::option::of(0u32..10),
        batch_size_limit in proptest::option::of(0usize..100),
        enabled in proptest::option::of(any::<bool>()),
    ) {
        let base = TransportConfig::default();
        let mut patched = base.clone();
        patched.apply(&TransportConfigPatch {
            max_retries,
            batch_size_limit,
            enabled,
            ..Default::default()
        });

        prop_assert_eq!(patched.max_retries, max_retries.unwrap_or(base.max_retries));
        prop_assert_eq!(
            patched.batch_size_limit,
            batch_size_limit.map_or(base.batch_size_limit, |v| v.max(1))
        );
        prop_assert_eq!(patched.enabled, enabled.unwrap_or(base.enabled));
        prop_assert_eq!(&patched.endpoint, &base.endpoint);
        prop_assert_eq!(patched.retry_base_delay_ms, base.retry_base_delay_ms);
        prop_assert_eq!(patched.circuit_breaker_threshold, base.circuit_breaker_threshold);
        prop_assert_eq!(patched.batch_bytes_limit, base.batch_bytes_limit);
    }
}
