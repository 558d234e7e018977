//! Property-based tests for the form builder using proptest.

use proptest::prelude::*;
use pagekit_form::{
    Attributes, Form, FormConfig, FormError, OptionTree, SelectInput, VALID_INPUT_TYPES,
};

// ============================================================================
// Strategies
// ============================================================================

fn valid_type() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_INPUT_TYPES).prop_map(String::from)
}

fn invalid_type() -> impl Strategy<Value = String> {
    "[a-z\\-]{1,16}".prop_filter("must not be a valid type", |t| {
        !VALID_INPUT_TYPES.contains(&t.as_str())
    })
}

fn config() -> impl Strategy<Value = FormConfig> {
    (any::<bool>(), any::<bool>(), "[a-z_]{0,6}").prop_map(|(prep_value, auto_id, prefix)| {
        FormConfig {
            prep_value,
            auto_id,
            auto_id_prefix: prefix,
            ..FormConfig::default()
        }
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every valid type passes validation.
    #[test]
    fn valid_types_never_fail(ty in valid_type(), name in "[a-z]{1,10}") {
        let form = Form::default();
        let attrs = Attributes::from([("name", name), ("type", ty)]);
        prop_assert!(form.input(attrs).is_ok());
    }

    /// Anything else fails with InvalidFieldType carrying the offending type.
    #[test]
    fn invalid_types_always_fail(ty in invalid_type()) {
        let form = Form::default();
        let attrs = Attributes::from([("name", "x".to_string()), ("type", ty.clone())]);
        prop_assert_eq!(form.input(attrs), Err(FormError::InvalidFieldType(ty)));
    }

    /// Same inputs and config always produce the same markup.
    #[test]
    fn rendering_is_deterministic(
        config in config(),
        name in "[a-z]{1,10}",
        value in ".{0,20}",
    ) {
        let first = Form::new(config.clone()).textarea((name.clone(), value.clone()));
        let second = Form::new(config).textarea((name, value));
        prop_assert_eq!(first, second);
    }

    /// The `[]` suffix is added at most once.
    #[test]
    fn multiple_suffix_is_idempotent(name in "[a-z]{1,10}", already in any::<bool>()) {
        let form = Form::default();
        let field = if already { format!("{}[]", name) } else { name.clone() };
        let html = form
            .select(
                SelectInput::named(field, OptionTree::new().option("1", "One"))
                    .attributes(Attributes::new().with_flag("multiple")),
            )
            .unwrap();
        let expected = format!("name=\"{}[]\"", name);
        prop_assert!(html.contains(&expected));
        prop_assert!(!html.contains("[][]"));
    }

    /// Exactly the selected leaves carry the selected token.
    #[test]
    fn selected_count_matches(
        values in prop::collection::btree_set("[a-z]{1,4}", 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let values: Vec<String> = values.into_iter().collect();
        let chosen = values[pick.index(values.len())].clone();
        let tree: OptionTree = values.iter().map(|v| (v.clone(), v.to_uppercase())).collect();

        let html = Form::default()
            .select(SelectInput::named("f", tree).selected([chosen]))
            .unwrap();
        prop_assert_eq!(html.matches(" selected>").count(), 1);
    }
}
