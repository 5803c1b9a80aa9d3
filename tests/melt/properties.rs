//! Property tests over randomly generated documents.

use crate::common::{expected_rows, melt, read_table};
use json2relcsv::melt::{CsvExporter, ExportOptions};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

/// Keys are lowercase and never contain `_`, so they can't collide with
/// generated `id`/`<table>_id` columns or with junction table names.
fn key() -> impl Strategy<Value = String> {
    "k[a-z]{0,3}"
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z ,\"\n]{0,8}".prop_map(Value::String),
    ]
}

fn document() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn count_objects(value: &Value, top_level: bool) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(|v| count_objects(v, false)).sum::<usize>(),
        Value::Array(items) if top_level => items
            .iter()
            .filter(|v| v.is_object())
            .map(|v| count_objects(v, false))
            .sum(),
        // objects in a mixed array are rendered, not expanded
        Value::Array(items) if items.iter().all(Value::is_object) => {
            items.iter().map(|v| count_objects(v, false)).sum()
        }
        _ => 0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn entity_ids_are_unique_and_dense(doc in document()) {
        let tables = melt(&doc);

        let mut ids = BTreeSet::new();
        let mut total = 0usize;
        for table in tables.iter().filter(|t| !t.schema.is_junction) {
            for row in &table.rows {
                let id: u64 = row["id"].parse().unwrap();
                prop_assert!(ids.insert(id), "duplicate entity id {}", id);
                total += 1;
            }
        }

        prop_assert_eq!(total, count_objects(&doc, true));
        let expected: BTreeSet<u64> = (1..=total as u64).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn junction_ids_strictly_increase(doc in document()) {
        let tables = melt(&doc);

        let mut seen = BTreeSet::new();
        for table in tables.iter().filter(|t| t.schema.is_junction) {
            let mut previous = None;
            for row in &table.rows {
                let id: u64 = row["id"].parse().unwrap();
                prop_assert!(id >= 10_000);
                prop_assert!(previous.map_or(true, |p| id > p));
                prop_assert!(seen.insert(id));
                previous = Some(id);
            }
        }
    }

    #[test]
    fn scalar_columns_only(fields in prop::collection::btree_map(key(), prop_oneof![
        scalar(),
        Just(json!({"nested": 1})),
        Just(json!([1, 2])),
    ], 0..8)) {
        let scalars = fields.values().filter(|v| !v.is_object() && !v.is_array()).count();
        let doc = Value::Object(fields.into_iter().collect());
        let tables = melt(&doc);

        let root = tables.get("root").unwrap();
        prop_assert_eq!(root.rows[0].len(), scalars + 1);
        prop_assert_eq!(root.schema.columns.len(), scalars + 1);
    }

    #[test]
    fn object_array_rows_share_parent(
        items in prop::collection::vec(prop::collection::btree_map(key(), scalar(), 0..4), 1..10)
    ) {
        let count = items.len();
        let array: Vec<Value> = items
            .into_iter()
            .map(|m| Value::Object(m.into_iter().collect()))
            .collect();
        let tables = melt(&json!({ "items": array }));

        let table = tables.get("items").unwrap();
        prop_assert_eq!(table.rows.len(), count);
        prop_assert!(table.rows.iter().all(|r| r["root_id"] == "1"));
    }

    #[test]
    fn scalar_array_becomes_indexed_junction(values in prop::collection::vec(scalar(), 1..20)) {
        let count = values.len();
        let tables = melt(&json!({ "values": values }));

        let junction = tables.get("root_values").unwrap();
        prop_assert_eq!(junction.rows.len(), count);
        for (i, row) in junction.rows.iter().enumerate() {
            prop_assert_eq!(&row["index"], &i.to_string());
            prop_assert_eq!(&row["parent_id"], "1");
        }
    }

    #[test]
    fn csv_round_trip(doc in document()) {
        let tables = melt(&doc);
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path(), ExportOptions::default()).unwrap();
        let report = exporter.export(&tables);
        prop_assert!(report.is_complete());

        for table in tables.iter() {
            let (_, rows) = read_table(&exporter.table_path(table.name()));
            prop_assert_eq!(rows, expected_rows(table));
        }
    }
}
