//! JSON encoding of progress records.
//!
//! Decoding is permissive: the document is read as a generic JSON object,
//! a fresh record supplies every field, and each field present in the
//! document is coerced and overlaid on top. Unknown keys are ignored so
//! files written by newer versions still load. A value that cannot be
//! coerced is an error rather than a silent default.

use serde_json::{Map, Value};

use crate::core::ProgressRecord;
use crate::error::Result;

/// Serialize a record as pretty-printed JSON.
pub fn encode_record(record: &ProgressRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Parse a record from JSON text, overlaying present fields on `defaults`.
///
/// The error string describes what is wrong; callers attach the file path.
pub fn decode_record(
    content: &str,
    defaults: ProgressRecord,
) -> std::result::Result<ProgressRecord, String> {
    let raw: Value =
        serde_json::from_str(content).map_err(|e| format!("not valid JSON: {}", e))?;
    let Value::Object(fields) = raw else {
        return Err(format!(
            "expected a JSON object at the top level, found {}",
            kind(&raw)
        ));
    };
    overlay(defaults, &fields)
}

fn overlay(
    mut record: ProgressRecord,
    fields: &Map<String, Value>,
) -> std::result::Result<ProgressRecord, String> {
    if let Some(value) = fields.get("xp") {
        record.xp = coerce_int(value).map_err(|e| field_error("xp", e))?;
    }
    if let Some(value) = fields.get("completed_modules") {
        record.completed_modules =
            coerce_string_list(value).map_err(|e| field_error("completed_modules", e))?;
    }
    if let Some(value) = fields.get("last_active_date") {
        record.last_active_date =
            coerce_text(value).map_err(|e| field_error("last_active_date", e))?;
    }
    if let Some(value) = fields.get("streak_days") {
        record.streak_days = coerce_int(value).map_err(|e| field_error("streak_days", e))?;
    }
    if let Some(value) = fields.get("updated_at") {
        record.updated_at = coerce_text(value).map_err(|e| field_error("updated_at", e))?;
    }
    Ok(record)
}

fn field_error(field: &str, message: String) -> String {
    format!("field `{}`: {}", field, message)
}

/// Coerce a JSON value to an integer.
///
/// Accepts integers, integral text, booleans, and finite floats (truncated).
fn coerce_int(value: &Value) -> std::result::Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(format!("integer {} is out of range", n))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.is_finite() && f.trunc() >= i64::MIN as f64 && f.trunc() <= i64::MAX as f64 {
                    Ok(f.trunc() as i64)
                } else {
                    Err(format!("number {} is out of range", n))
                }
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("expected an integer, found {:?}", s)),
        other => Err(format!("expected an integer, found {}", kind(other))),
    }
}

/// Coerce a scalar JSON value to text.
fn coerce_text(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a string, found {}", kind(other))),
    }
}

/// Coerce a JSON array of scalars to a list of strings.
fn coerce_string_list(value: &Value) -> std::result::Result<Vec<String>, String> {
    let Value::Array(items) = value else {
        return Err(format!("expected a list of strings, found {}", kind(value)));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| coerce_text(item).map_err(|e| format!("item {}: {}", i, e)))
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn defaults() -> ProgressRecord {
        ProgressRecord::new_on(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_decode_full_document() {
        let content = r#"{
            "xp": 300,
            "completed_modules": ["Module 1: Python Foundations", "Module 8: NLP"],
            "last_active_date": "2024-05-30",
            "streak_days": 4,
            "updated_at": "2024-05-30T18:00:00+00:00"
        }"#;

        let record = decode_record(content, defaults()).unwrap();
        assert_eq!(record.xp, 300);
        assert_eq!(
            record.completed_modules,
            vec!["Module 1: Python Foundations", "Module 8: NLP"]
        );
        assert_eq!(record.last_active_date, "2024-05-30");
        assert_eq!(record.streak_days, 4);
        assert_eq!(record.updated_at, "2024-05-30T18:00:00+00:00");
    }

    #[test]
    fn test_decode_missing_fields_use_defaults() {
        let record = decode_record(r#"{"xp": 50}"#, defaults()).unwrap();
        let expected = ProgressRecord {
            xp: 50,
            ..defaults()
        };
        assert_eq!(record, expected);
    }

    #[test]
    fn test_decode_empty_object_is_defaults() {
        assert_eq!(decode_record("{}", defaults()).unwrap(), defaults());
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let content = r#"{"xp": 1, "badges": ["gold"], "v": 2}"#;
        let record = decode_record(content, defaults()).unwrap();
        assert_eq!(record.xp, 1);
    }

    #[test]
    fn test_decode_coerces_numeric_text() {
        let content = r#"{"xp": " 120 ", "streak_days": "3"}"#;
        let record = decode_record(content, defaults()).unwrap();
        assert_eq!(record.xp, 120);
        assert_eq!(record.streak_days, 3);
    }

    #[test]
    fn test_decode_coerces_floats_and_bools() {
        let content = r#"{"xp": 99.9, "streak_days": true}"#;
        let record = decode_record(content, defaults()).unwrap();
        assert_eq!(record.xp, 99);
        assert_eq!(record.streak_days, 1);

        let record = decode_record(r#"{"xp": -2.5}"#, defaults()).unwrap();
        assert_eq!(record.xp, -2);
    }

    #[test]
    fn test_decode_keeps_negative_values_for_validation() {
        let content = r#"{"xp": -5, "streak_days": -1}"#;
        let record = decode_record(content, defaults()).unwrap();
        assert_eq!(record.xp, -5);
        assert_eq!(record.streak_days, -1);
    }

    #[test]
    fn test_decode_renders_scalar_module_ids() {
        let record =
            decode_record(r#"{"completed_modules": ["A", 7, false]}"#, defaults()).unwrap();
        assert_eq!(record.completed_modules, vec!["A", "7", "false"]);
    }

    #[test]
    fn test_decode_rejects_uncoercible_int() {
        let err = decode_record(r#"{"xp": "lots"}"#, defaults()).unwrap_err();
        assert!(err.contains("field `xp`"));
        assert!(err.contains("lots"));

        let err = decode_record(r#"{"streak_days": null}"#, defaults()).unwrap_err();
        assert!(err.contains("field `streak_days`"));
        assert!(err.contains("null"));
    }

    #[test]
    fn test_decode_rejects_out_of_range_int() {
        let content = r#"{"xp": 18446744073709551615}"#;
        let err = decode_record(content, defaults()).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_decode_rejects_non_list_modules() {
        let err = decode_record(r#"{"completed_modules": "A"}"#, defaults()).unwrap_err();
        assert!(err.contains("expected a list of strings"));

        let content = r#"{"completed_modules": ["A", {"x": 1}]}"#;
        let err = decode_record(content, defaults()).unwrap_err();
        assert!(err.contains("item 1"));
    }

    #[test]
    fn test_decode_rejects_structured_dates() {
        let content = r#"{"last_active_date": [2024, 1, 1]}"#;
        let err = decode_record(content, defaults()).unwrap_err();
        assert!(err.contains("field `last_active_date`"));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = decode_record("{\"xp\": 1", defaults()).unwrap_err();
        assert!(err.contains("not valid JSON"));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode_record("[1, 2, 3]", defaults()).unwrap_err();
        assert!(err.contains("top level"));
    }

    #[test]
    fn test_encode_is_pretty_and_unescaped() {
        let mut record = defaults();
        record.completed_modules.push("Módulo é".to_string());
        let json = encode_record(&record).unwrap();
        assert!(json.contains("\n  \"xp\": 0"));
        assert!(json.contains("Módulo é"));
        assert_eq!(decode_record(&json, ProgressRecord::new()).unwrap(), record);
    }
}
