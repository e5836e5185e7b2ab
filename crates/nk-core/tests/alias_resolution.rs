use nk_core::{NkError, ParamValue, ParameterSet};
use proptest::prelude::*;

fn historical_defaults() -> ParameterSet {
    let mut set = ParameterSet::new();
    set.insert("N", 20i64);
    set.insert("K", 3i64);
    set.insert("POP_SIZE", 200i64);
    set.insert("MUT_RATE", 0.05);
    set.insert("FILTER_LENGTH", "POP_SIZE");
    set
}

#[test]
fn alias_follows_override() {
    let overrides: ParameterSet = [("POP_SIZE", 2000i64)].into_iter().collect();
    let mut merged = ParameterSet::merged(&historical_defaults(), &overrides);
    merged.resolve_aliases().unwrap();
    assert_eq!(merged.get("FILTER_LENGTH"), Some(&ParamValue::Int(2000)));
    assert_eq!(merged.get("POP_SIZE"), Some(&ParamValue::Int(2000)));
}

#[test]
fn explicit_value_replaces_alias() {
    let overrides: ParameterSet = [("FILTER_LENGTH", 1000i64)].into_iter().collect();
    let mut merged = ParameterSet::merged(&historical_defaults(), &overrides);
    merged.resolve_aliases().unwrap();
    assert_eq!(merged.get("FILTER_LENGTH"), Some(&ParamValue::Int(1000)));
}

#[test]
fn chained_aliases_reach_terminal_value() {
    let mut set = ParameterSet::new();
    set.insert("A", "B");
    set.insert("B", "C");
    set.insert("C", 7i64);
    set.resolve_aliases().unwrap();
    for name in ["A", "B", "C"] {
        assert_eq!(set.get(name), Some(&ParamValue::Int(7)));
    }
}

#[test]
fn self_reference_is_rejected() {
    let mut set = ParameterSet::new();
    set.insert("A", "A");
    let err = set.resolve_aliases().unwrap_err();
    assert!(matches!(err, NkError::Config(ref info) if info.code == "alias-cycle"));
}

#[test]
fn cycle_is_rejected_and_set_left_untouched() {
    let mut set = ParameterSet::new();
    set.insert("A", "B");
    set.insert("B", "A");
    set.insert("C", 1i64);
    let before = set.clone();
    let err = set.resolve_aliases().unwrap_err();
    assert_eq!(err.info().context["chain"], "A -> B -> A");
    assert_eq!(set, before);
}

proptest! {
    #[test]
    fn merge_covers_union_exactly_once(
        defaults in prop::collection::btree_map("[A-Z]{1,3}", 0i64..100, 0..8),
        overrides in prop::collection::btree_map("[A-Z]{1,3}", 0i64..100, 0..8),
    ) {
        let d: ParameterSet = defaults.clone().into_iter().collect();
        let o: ParameterSet = overrides.clone().into_iter().collect();
        let merged = ParameterSet::merged(&d, &o);
        let mut union: Vec<_> = defaults.keys().chain(overrides.keys()).cloned().collect();
        union.sort();
        union.dedup();
        prop_assert_eq!(merged.len(), union.len());
        for name in &union {
            let expected = overrides
                .get(name)
                .or_else(|| defaults.get(name))
                .copied()
                .map(ParamValue::Int);
            prop_assert_eq!(merged.get(name), expected.as_ref());
        }
    }

    #[test]
    fn acyclic_chains_terminate(depth in 1usize..32, terminal in any::<i64>()) {
        let mut set = ParameterSet::new();
        for idx in 0..depth {
            set.insert(format!("P{idx}"), format!("P{}", idx + 1));
        }
        set.insert(format!("P{depth}"), terminal);
        set.resolve_aliases().unwrap();
        for (_, value) in set.iter() {
            prop_assert_eq!(value, &ParamValue::Int(terminal));
        }
    }

    #[test]
    fn rings_are_always_rejected(len in 1usize..16) {
        let mut set = ParameterSet::new();
        for idx in 0..len {
            set.insert(format!("R{idx}"), format!("R{}", (idx + 1) % len));
        }
        prop_assert!(set.resolve_aliases().is_err());
    }
}
