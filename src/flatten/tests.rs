//! Tests for flatten module

use super::*;
use crate::batch::{Batch, Cell, Column};
use crate::error::Error;
use pretty_assertions::assert_eq;

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

fn batch_with(column: &str, cells: Vec<Cell>) -> Batch {
    let ids = (0..cells.len() as i64).map(Cell::Int).collect();
    Batch::from_columns(vec![Column::new("id", ids), Column::new(column, cells)]).unwrap()
}

#[test]
fn test_flattened_name() {
    assert_eq!(flattened_name("custom_data", "zip"), "custom_data_zip");
}

#[test]
fn test_all_null_column_adds_expected_fields() {
    let batch = batch_with("custom_data", vec![Cell::Null, Cell::Null, Cell::Null]);
    let out = flatten(batch, "custom_data", &fields(&["custom_data_a", "custom_data_b", "custom_data_c"]))
        .unwrap();

    assert_eq!(out.num_rows(), 3);
    assert_eq!(
        out.column_names(),
        vec!["id", "custom_data", "custom_data_a", "custom_data_b", "custom_data_c"]
    );
    assert!(out.column("custom_data_b").unwrap().is_all_null());
}

#[test]
fn test_missing_column_adds_expected_fields() {
    let batch = Batch::from_columns(vec![Column::new("id", vec![Cell::Int(1)])]).unwrap();
    let out = flatten(batch, "custom_data", &fields(&["custom_data_a"])).unwrap();
    assert_eq!(out.column_names(), vec!["id", "custom_data_a"]);
}

#[test]
fn test_schema_floor_adds_missing_field() {
    let batch = batch_with("entity", vec![Cell::str(r#"{"a": 1}"#)]);
    let out = flatten(batch, "entity", &fields(&["entity_a", "entity_b"])).unwrap();

    assert_eq!(out.cell("entity_a", 0), Some(&Cell::Int(1)));
    assert_eq!(out.cell("entity_b", 0), Some(&Cell::Null));
}

#[test]
fn test_schema_floor_keeps_unexpected_field() {
    let batch = batch_with("entity", vec![Cell::str(r#"{"a": 1, "z": 9}"#)]);
    let out = flatten(batch, "entity", &fields(&["entity_a", "entity_b"])).unwrap();

    assert_eq!(
        out.column_names(),
        vec!["id", "entity", "entity_a", "entity_z", "entity_b"]
    );
    assert_eq!(out.cell("entity_z", 0), Some(&Cell::Int(9)));
}

#[test]
fn test_original_column_preserved() {
    let raw = r#"{"zip": "02110"}"#;
    let batch = batch_with("custom_data", vec![Cell::str(raw), Cell::Null]);
    let out = flatten(batch, "custom_data", &[]).unwrap();

    assert_eq!(out.cell("custom_data", 0), Some(&Cell::str(raw)));
    assert_eq!(out.cell("custom_data", 1), Some(&Cell::Null));
}

#[test]
fn test_rows_stay_aligned() {
    let batch = batch_with(
        "doc",
        vec![
            Cell::str(r#"{"k": "first"}"#),
            Cell::Null,
            Cell::str(r#"{"other": true}"#),
            Cell::str(r#"{"k": "fourth"}"#),
        ],
    );
    let out = flatten(batch, "doc", &[]).unwrap();

    assert_eq!(out.num_rows(), 4);
    assert_eq!(out.cell("doc_k", 0), Some(&Cell::str("first")));
    assert_eq!(out.cell("doc_k", 1), Some(&Cell::Null));
    assert_eq!(out.cell("doc_k", 2), Some(&Cell::Null));
    assert_eq!(out.cell("doc_k", 3), Some(&Cell::str("fourth")));
    assert_eq!(out.cell("doc_other", 2), Some(&Cell::Bool(true)));
    assert_eq!(out.cell("id", 3), Some(&Cell::Int(3)));
}

#[test]
fn test_nested_objects_use_dotted_paths() {
    let batch = batch_with(
        "custom_data",
        vec![Cell::str(r#"{"address": {"zip": "02110", "geo": {"lat": 42.3}}, "tags": ["a", "b"]}"#)],
    );
    let out = flatten(batch, "custom_data", &[]).unwrap();

    assert_eq!(out.cell("custom_data_address.zip", 0), Some(&Cell::str("02110")));
    assert_eq!(out.cell("custom_data_address.geo.lat", 0), Some(&Cell::Float(42.3)));
    assert_eq!(out.cell("custom_data_tags", 0), Some(&Cell::str(r#"["a","b"]"#)));
}

#[test]
fn test_empty_strings_become_null() {
    let batch = batch_with("custom_data", vec![Cell::str(r#"{"gender": "", "zip": "1"}"#)]);
    let out = flatten(batch, "custom_data", &[]).unwrap();

    assert_eq!(out.cell("custom_data_gender", 0), Some(&Cell::Null));
    assert_eq!(out.cell("custom_data_zip", 0), Some(&Cell::str("1")));
}

#[test]
fn test_literal_fallback_applies_to_whole_column() {
    let batch = batch_with(
        "custom_data",
        vec![
            Cell::str(r#"{"zip": "02110"}"#),
            Cell::str("{'zip': '10001', 'active': True}"),
        ],
    );
    let out = flatten(batch, "custom_data", &[]).unwrap();

    assert_eq!(out.cell("custom_data_zip", 0), Some(&Cell::str("02110")));
    assert_eq!(out.cell("custom_data_zip", 1), Some(&Cell::str("10001")));
    assert_eq!(out.cell("custom_data_active", 1), Some(&Cell::Bool(true)));
}

#[test]
fn test_unparsable_column_is_flatten_error() {
    let batch = batch_with("custom_data", vec![Cell::str("{zip: 02110")]);
    let err = flatten(batch, "custom_data", &[]).unwrap_err();

    assert!(matches!(err, Error::Flatten { ref column, .. } if column == "custom_data"));
}

#[test]
fn test_non_object_document_is_flatten_error() {
    let batch = batch_with("custom_data", vec![Cell::str("[1, 2]")]);
    assert!(matches!(
        flatten(batch, "custom_data", &[]),
        Err(Error::Flatten { .. })
    ));
}

#[test]
fn test_chained_flatten_of_two_columns() {
    let batch = Batch::from_columns(vec![
        Column::new("a", vec![Cell::str(r#"{"x": 1}"#)]),
        Column::new("b", vec![Cell::Null]),
    ])
    .unwrap();

    let out = flatten(batch, "a", &fields(&["a_x"])).unwrap();
    let out = flatten(out, "b", &fields(&["b_y"])).unwrap();

    assert_eq!(out.column_names(), vec!["a", "b", "a_x", "b_y"]);
}

#[test]
fn test_document_tier_display() {
    assert_eq!(DocumentTier::Json.to_string(), "json");
    assert_eq!(DocumentTier::Literal.to_string(), "literal");
}
