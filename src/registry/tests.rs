//! Tests for registry module

use super::*;
use crate::error::Error;
use test_case::test_case;

const MINIMAL: &str = r"
entities:
  regions:
    read_types:
      region_id: int64
      region_name: string
    write_types:
      region_id: int64
      region_name: string
      source_file_name: string
      source_file_date: date
      source_file_datetime: timestamp
";

// ============================================================================
// Built-in Registry Tests
// ============================================================================

#[test]
fn test_builtin_registry_loads() {
    let registry = builtin_registry().unwrap();
    assert_eq!(
        registry.entity_names(),
        vec![
            "countries",
            "departments",
            "employees",
            "job_history",
            "jobs",
            "locations",
            "regions",
            "user_point_transactions",
        ]
    );
}

#[test]
fn test_builtin_employees_schema() {
    let registry = builtin_registry().unwrap();
    let employees = registry.get("employees").unwrap();

    assert_eq!(employees.name, "employees");
    assert_eq!(employees.date_columns, vec!["hire_date"]);
    assert_eq!(employees.json_columns, vec!["custom_data"]);
    assert_eq!(employees.expected_fields("custom_data").len(), 6);
    assert_eq!(employees.read_type("hire_date"), Some(ColumnType::String));
    assert_eq!(
        employees.write_types.get("hire_date"),
        Some(&ColumnType::Timestamp)
    );
    assert_eq!(
        employees.write_types.get("source_file_date"),
        Some(&ColumnType::Date)
    );
}

#[test]
fn test_builtin_split_entity() {
    let registry = builtin_registry().unwrap();
    let upt = registry.get("user_point_transactions").unwrap();
    assert_eq!(
        upt.pre_flatten,
        Some(PreFlattenDef::SplitJson {
            column: "reference_type".to_string(),
            json_column: "reference_type_json".to_string(),
        })
    );
    assert!(!upt.write_types.contains_key("reference_type_json"));
}

#[test]
fn test_entity_without_json_columns() {
    let registry = builtin_registry().unwrap();
    let jobs = registry.get("jobs").unwrap();
    assert!(!jobs.has_json_columns());
    assert!(jobs.expected_fields("anything").is_empty());
}

#[test]
fn test_unknown_entity() {
    let registry = builtin_registry().unwrap();
    let err = registry.get("payroll").unwrap_err();
    assert!(matches!(err, Error::UnknownEntity { entity } if entity == "payroll"));
}

// ============================================================================
// Parsing Tests
// ============================================================================

#[test]
fn test_load_minimal_registry() {
    let registry = load_registry_from_str(MINIMAL).unwrap();
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("regions"));
    assert!(registry.get("regions").unwrap().date_columns.is_empty());
}

#[test_case("str", ColumnType::String ; "pandas str")]
#[test_case("Int64", ColumnType::Int64 ; "pandas nullable int")]
#[test_case("float64", ColumnType::Float64 ; "float")]
#[test_case("datetime64[ns]", ColumnType::Timestamp ; "pandas datetime")]
#[test_case("raw", ColumnType::Raw ; "raw")]
fn test_column_type_aliases(tag: &str, expected: ColumnType) {
    let parsed: ColumnType = serde_yaml::from_str(&format!("\"{tag}\"")).unwrap();
    assert_eq!(parsed, expected);
}

#[test]
fn test_load_registry_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.yaml");
    std::fs::write(&path, MINIMAL).unwrap();

    let registry = load_registry(&path).unwrap();
    assert!(registry.contains("regions"));
}

#[test]
fn test_load_registry_missing_file() {
    let result = load_registry("/nonexistent/registry.yaml");
    assert!(matches!(result, Err(Error::Config { .. })));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_reject_json_column_without_shape() {
    let yaml = r"
entities:
  employees:
    read_types:
      custom_data: string
    json_columns: [custom_data]
    write_types:
      custom_data: string
      source_file_name: string
      source_file_date: date
      source_file_datetime: timestamp
";
    let err = load_registry_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("has no expected_json_shape"));
}

#[test]
fn test_reject_flattened_field_missing_from_write_types() {
    let yaml = r"
entities:
  employees:
    read_types:
      custom_data: string
    json_columns: [custom_data]
    expected_json_shape:
      custom_data: [custom_data_zip]
    write_types:
      custom_data: string
      source_file_name: string
      source_file_date: date
      source_file_datetime: timestamp
";
    let err = load_registry_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("custom_data_zip"));
}

#[test]
fn test_reject_missing_provenance_columns() {
    let yaml = r"
entities:
  regions:
    read_types:
      region_id: int64
    write_types:
      region_id: int64
";
    let err = load_registry_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("source_file_name"));
}

#[test]
fn test_reject_unknown_date_column() {
    let yaml = r"
entities:
  regions:
    read_types:
      region_id: int64
    date_columns: [created_at]
    write_types:
      region_id: int64
      source_file_name: string
      source_file_date: date
      source_file_datetime: timestamp
";
    assert!(load_registry_from_str(yaml).is_err());
}

#[test]
fn test_reject_unknown_type_tag() {
    let yaml = r"
entities:
  regions:
    read_types:
      region_id: decimal
    write_types:
      region_id: int64
";
    assert!(matches!(
        load_registry_from_str(yaml),
        Err(Error::Config { .. })
    ));
}
