// Property-based tests (proptest): type mapper, codec round trip, filter splitter

use docrel_core::schema::{binding_type, column_definition};
use docrel_core::sql::{Operator, split};
use docrel_core::{
    Attribute, AttributeType, Collection, DocRelError, Document, DocumentEngine, EngineConfig,
    IndexKind, SqlDialect, SqliteConnection,
};
use proptest::prelude::*;
use serde_json::json;

fn engine() -> DocumentEngine<SqliteConnection> {
    let config = EngineConfig::new("prop").with_dialect(SqlDialect::Sqlite);
    DocumentEngine::new(SqliteConnection::open_in_memory().unwrap(), config).unwrap()
}

fn attribute_type() -> impl Strategy<Value = AttributeType> {
    (0..AttributeType::ALL.len()).prop_map(|i| AttributeType::ALL[i])
}

fn operator() -> impl Strategy<Value = Operator> {
    (0..Operator::PRECEDENCE.len()).prop_map(|i| Operator::PRECEDENCE[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_type_mapping_is_deterministic(ty in attribute_type()) {
        prop_assert_eq!(column_definition(ty), column_definition(ty));
        prop_assert_eq!(binding_type(ty), binding_type(ty));
        prop_assert_eq!(ty.as_str().parse::<AttributeType>().unwrap(), ty);
    }

    #[test]
    fn prop_filter_split_recovers_parts(
        key in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        value in "[a-zA-Z0-9 ._-]{1,16}",
        op in operator(),
    ) {
        let filter = split(&format!("{key}{op}{value}")).unwrap();
        prop_assert_eq!(filter.key, key);
        prop_assert_eq!(filter.operator, op);
        prop_assert_eq!(filter.value, value);
    }

    #[test]
    fn prop_unknown_index_kind_rejected(kind in "[a-z]{1,10}") {
        prop_assume!(!["key", "unique", "fulltext", "spatial"].contains(&kind.as_str()));
        let parsed = kind.parse::<IndexKind>();
        prop_assert!(matches!(parsed, Err(DocRelError::UnsupportedIndexKind(_))));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_scalar_documents_round_trip(
        name in "[a-zA-Z0-9 ]{0,24}",
        age in any::<i32>(),
        active in any::<bool>(),
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
    ) {
        let engine = engine();
        let people = Collection::new(
            "people",
            vec![
                Attribute::new("name", AttributeType::Text),
                Attribute::new("age", AttributeType::Integer),
                Attribute::new("active", AttributeType::Boolean),
                Attribute::new("email", AttributeType::Email),
            ],
        )
        .unwrap();
        engine.create_collection(&people).unwrap();

        let input = Document::new("people")
            .with("name", json!(name))
            .with("age", json!(age))
            .with("active", json!(active))
            .with("email", json!(email));
        let created = engine.create_document(&people, input.clone()).unwrap();
        let fetched = engine
            .get_document(&people, created.id.as_deref().unwrap())
            .unwrap()
            .unwrap();

        prop_assert_eq!(fetched.attributes, input.attributes);
    }

    #[test]
    fn prop_array_values_are_preserved_as_a_set(scores in prop::collection::vec(any::<i32>(), 0..12)) {
        let engine = engine();
        let players = Collection::new(
            "players",
            vec![Attribute::new("scores", AttributeType::Integer).with_array(true)],
        )
        .unwrap();
        engine.create_collection(&players).unwrap();

        let created = engine
            .create_document(&players, Document::new("players").with("scores", json!(scores)))
            .unwrap();
        let fetched = engine
            .get_document(&players, created.id.as_deref().unwrap())
            .unwrap()
            .unwrap();

        let mut stored: Vec<i64> = fetched.get("scores").unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        let mut expected: Vec<i64> = scores.iter().map(|&s| i64::from(s)).collect();
        stored.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(stored, expected);
    }
}
