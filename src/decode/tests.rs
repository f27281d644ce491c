//! Tests for decoder module

use super::*;
use crate::batch::Cell;
use crate::registry::{ColumnType, ColumnTypes};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// CSV Decoder Tests
// ============================================================================

#[test]
fn test_csv_decoder_basic() {
    let body = "id,name\n1,Alice\n2,Bob\n";
    let batch = CsvDecoder::new().decode(body).unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.column_names(), vec!["id", "name"]);
    assert_eq!(batch.cell("id", 0), Some(&Cell::str("1")));
    assert_eq!(batch.cell("name", 1), Some(&Cell::str("Bob")));
}

#[test]
fn test_csv_decoder_quoted_json() {
    let body = "id,custom_data\n1,\"{\"\"zip\"\": \"\"02110\"\", \"\"city\"\": \"\"Boston, MA\"\"}\"\n";
    let batch = CsvDecoder::new().decode(body).unwrap();

    assert_eq!(
        batch.cell("custom_data", 0),
        Some(&Cell::str(r#"{"zip": "02110", "city": "Boston, MA"}"#))
    );
}

#[test]
fn test_csv_decoder_multiline_quoted_field() {
    let body = "id,note\r\n1,\"line one\nline two\"\r\n2,plain\r\n";
    let batch = CsvDecoder::new().decode(body).unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.cell("note", 0), Some(&Cell::str("line one\nline two")));
}

#[test]
fn test_csv_decoder_null_tokens() {
    let body = "a,b,c\n,NULL,x\n";
    let batch = CsvDecoder::new().decode(body).unwrap();

    assert_eq!(batch.cell("a", 0), Some(&Cell::Null));
    assert_eq!(batch.cell("b", 0), Some(&Cell::Null));
    assert_eq!(batch.cell("c", 0), Some(&Cell::str("x")));
}

#[test]
fn test_csv_decoder_short_row_padded_with_nulls() {
    let body = "a,b\n1\n";
    let batch = CsvDecoder::new().decode(body).unwrap();
    assert_eq!(batch.cell("b", 0), Some(&Cell::Null));
}

#[test]
fn test_csv_decoder_long_row_rejected() {
    let body = "a,b\n1,2,3\n";
    assert!(CsvDecoder::new().decode(body).is_err());
}

#[test]
fn test_csv_decoder_unterminated_quote() {
    let body = "a\n\"open\n";
    assert!(CsvDecoder::new().decode(body).is_err());
}

#[test]
fn test_csv_decoder_header_only() {
    let batch = CsvDecoder::new().decode("id,name\n").unwrap();
    assert!(batch.is_empty());
    assert_eq!(batch.column_names(), vec!["id", "name"]);
}

#[test]
fn test_csv_decoder_empty_body() {
    let batch = CsvDecoder::new().decode("").unwrap();
    assert!(batch.is_empty());
    assert_eq!(batch.num_columns(), 0);
}

#[test]
fn test_csv_decoder_custom_delimiter_no_header() {
    let batch = CsvDecoder::with_options(';', false)
        .decode("1;2\n3;4\n")
        .unwrap();
    assert_eq!(batch.column_names(), vec!["column_0", "column_1"]);
    assert_eq!(batch.num_rows(), 2);
}

// ============================================================================
// Read Type Tests
// ============================================================================

fn employee_types() -> ColumnTypes {
    let mut types = ColumnTypes::new();
    types.insert("employee_id".to_string(), ColumnType::Int64);
    types.insert("salary".to_string(), ColumnType::Float64);
    types.insert("hire_date".to_string(), ColumnType::String);
    types.insert("custom_data".to_string(), ColumnType::Raw);
    types
}

#[test]
fn test_apply_read_types() {
    let body = "employee_id,salary,hire_date,custom_data\n100,24000,2003-06-17,\n101,,not-a-date,{}\n";
    let raw = CsvDecoder::new().decode(body).unwrap();
    let batch = apply_read_types(raw, &employee_types(), &["hire_date".to_string()]).unwrap();

    assert_eq!(batch.cell("employee_id", 0), Some(&Cell::Int(100)));
    assert_eq!(batch.cell("salary", 0), Some(&Cell::Float(24000.0)));
    assert_eq!(batch.cell("salary", 1), Some(&Cell::Null));
    assert_eq!(
        batch.cell("hire_date", 0),
        Some(&Cell::Timestamp(
            NaiveDate::from_ymd_opt(2003, 6, 17)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        ))
    );
    // Unparsable dates stay as read
    assert_eq!(batch.cell("hire_date", 1), Some(&Cell::str("not-a-date")));
    assert_eq!(batch.cell("custom_data", 1), Some(&Cell::str("{}")));
}

#[test]
fn test_apply_read_types_bad_integer() {
    let raw = CsvDecoder::new().decode("employee_id\nabc\n").unwrap();
    let err = apply_read_types(raw, &employee_types(), &[]).unwrap_err();
    assert!(err.to_string().contains("employee_id"));
}

#[test]
fn test_apply_read_types_ignores_absent_columns() {
    let raw = CsvDecoder::new().decode("employee_id\n7\n").unwrap();
    let batch = apply_read_types(raw, &employee_types(), &[]).unwrap();
    assert_eq!(batch.column_names(), vec!["employee_id"]);
}

// ============================================================================
// Literal Parser Tests
// ============================================================================

#[test]
fn test_parse_literal_python_dict() {
    let value = parse_literal("{'zip': '02110', 'active': True, 'manager': None}").unwrap();
    assert_eq!(
        value,
        json!({"zip": "02110", "active": true, "manager": null})
    );
}

#[test]
fn test_parse_literal_nested_and_tuples() {
    let value = parse_literal("{'addr': {'lines': ('1 Main', '2nd Floor',)}, 'n': -3.5}").unwrap();
    assert_eq!(
        value,
        json!({"addr": {"lines": ["1 Main", "2nd Floor"]}, "n": -3.5})
    );
}

#[test]
fn test_parse_literal_accepts_json() {
    let value = parse_literal(r#"{"a": [1, 2, 3], "b": false}"#).unwrap();
    assert_eq!(value, json!({"a": [1, 2, 3], "b": false}));
}

#[test]
fn test_parse_literal_escapes_and_control_chars() {
    let value = parse_literal("{'note': 'it\\'s\tfine\\n'}").unwrap();
    assert_eq!(value, json!({"note": "it's\tfine\n"}));
}

#[test]
fn test_parse_literal_numeric_keys() {
    let value = parse_literal("{1: 'one'}").unwrap();
    assert_eq!(value, json!({"1": "one"}));
}

#[test]
fn test_parse_literal_errors() {
    assert!(parse_literal("{'a': }").is_err());
    assert!(parse_literal("{'a': 1").is_err());
    assert!(parse_literal("{'a': undefined}").is_err());
    assert!(parse_literal("{'a': 1} extra").is_err());
    assert!(parse_literal("").is_err());
}
