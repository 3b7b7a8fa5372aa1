//! Property tests for the codec and assembler round-trip laws.

use proptest::prelude::*;

use filterboard_core::{
    codec, document, placement, values_of, Condition, Field, GroupTree, Prop, PropertyValues,
    SkipPolicy,
};

fn value_string() -> impl Strategy<Value = String> {
    // Verbatim strings the wire format must carry through untouched.
    "[a-zA-Z0-9 ._-]{0,12}"
}

fn numeric_string() -> impl Strategy<Value = String> {
    (0u32..10_000).prop_map(|n| n.to_string())
}

fn tag_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn equality_condition(field: Field) -> impl Strategy<Value = Condition> {
    (prop_oneof!(Just("is"), Just("is not")), value_string()).prop_map(move |(rel, value)| {
        Condition::new(
            field,
            values_of([(Prop::Relation, rel), (Prop::Value, &value)]),
        )
    })
}

fn range_condition(field: Field) -> impl Strategy<Value = Condition> {
    (
        prop_oneof!(Just("is greater than"), Just("is less than")),
        numeric_string(),
    )
        .prop_map(move |(rel, value)| {
            Condition::new(
                field,
                values_of([(Prop::Relation, rel), (Prop::Value, &value)]),
            )
        })
}

fn session_recency_condition(field: Field) -> impl Strategy<Value = Condition> {
    (
        prop_oneof!(Just("is greater than"), Just("is less than")),
        numeric_string(),
    )
        .prop_map(move |(rel, hours)| {
            Condition::new(
                field,
                values_of([(Prop::Relation, rel), (Prop::HoursAgo, &hours)]),
            )
        })
}

fn location_condition() -> impl Strategy<Value = Condition> {
    (numeric_string(), numeric_string(), numeric_string()).prop_map(|(radius, lat, long)| {
        Condition::new(
            Field::Location,
            values_of([
                (Prop::Radius, &radius),
                (Prop::Lat, &lat),
                (Prop::Long, &long),
            ]),
        )
    })
}

fn tag_condition() -> impl Strategy<Value = Condition> {
    let relations = prop_oneof!(
        Just("is"),
        Just("is not"),
        Just("exists"),
        Just("doesn't exist"),
        Just("is greater than"),
        Just("is less than"),
        Just("time elapsed since is greater than"),
        Just("time elapsed since is less than"),
    );
    (tag_key(), relations, value_string(), numeric_string()).prop_map(
        |(key, relation, text_value, numeric_value)| {
            let mut values: PropertyValues =
                values_of([(Prop::Key, key.as_str()), (Prop::Relation, relation)]);
            match relation {
                // No value input exists for presence checks.
                "exists" | "doesn't exist" => {}
                // Time-elapsed comparators substitute "0" for an empty
                // value, so only non-empty values round-trip verbatim.
                "time elapsed since is greater than" | "time elapsed since is less than" => {
                    values.insert(Prop::Value, numeric_value);
                }
                _ => {
                    values.insert(Prop::Value, text_value);
                }
            }
            Condition::new(Field::Tag, values)
        },
    )
}

fn any_condition() -> impl Strategy<Value = Condition> {
    prop_oneof!(
        equality_condition(Field::Country),
        equality_condition(Field::Language),
        equality_condition(Field::AppVersion),
        range_condition(Field::AppVersion),
        range_condition(Field::SessionTime),
        range_condition(Field::SessionCount),
        session_recency_condition(Field::FirstSession),
        session_recency_condition(Field::LastSession),
        location_condition(),
        tag_condition(),
    )
}

proptest! {
    /// decode(encode(c)) == c for every schema-reachable condition.
    #[test]
    fn prop_codec_roundtrip(condition in any_condition()) {
        let encoded = codec::encode(&condition).expect("schema-reachable conditions encode");
        let decoded = codec::decode(&encoded).expect("encoded entries decode");
        prop_assert_eq!(decoded, condition);
    }

    /// Rebuilding a placement-built tree from its serialized form
    /// reproduces the same group partition.
    #[test]
    fn prop_document_roundtrip(conditions in prop::collection::vec(any_condition(), 0..12)) {
        let mut tree = GroupTree::new();
        for condition in conditions {
            let preferred = tree.active();
            placement::place(&mut tree, Some(preferred), condition).expect("placement succeeds");
        }

        let document = document::serialize(&tree);
        let rebuilt = document::deserialize(&document, SkipPolicy::Silent);

        let original: Vec<Vec<Condition>> = tree
            .groups()
            .iter()
            .filter(|g| !g.is_empty())
            .map(|g| g.conditions().map(|(_, c)| c.clone()).collect())
            .collect();
        let roundtripped: Vec<Vec<Condition>> = rebuilt
            .groups()
            .iter()
            .filter(|g| !g.is_empty())
            .map(|g| g.conditions().map(|(_, c)| c.clone()).collect())
            .collect();
        prop_assert_eq!(original, roundtripped);
    }

    /// Serialized documents never begin or end with a separator, and never
    /// hold two adjacent separators.
    #[test]
    fn prop_document_separator_invariant(conditions in prop::collection::vec(any_condition(), 0..12)) {
        let mut tree = GroupTree::new();
        for condition in conditions {
            let preferred = tree.active();
            placement::place(&mut tree, Some(preferred), condition).expect("placement succeeds");
        }

        let document = document::serialize(&tree);
        if let Some(first) = document.first() {
            prop_assert!(!codec::is_separator(first));
        }
        if let Some(last) = document.last() {
            prop_assert!(!codec::is_separator(last));
        }
        for pair in document.windows(2) {
            prop_assert!(!(codec::is_separator(&pair[0]) && codec::is_separator(&pair[1])));
        }
    }
}
