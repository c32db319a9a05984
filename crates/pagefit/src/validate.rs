//! Spec validation
//!
//! Turns untyped `{sheet_name, print_area}` records into [`PrintAreaSpec`]s.
//! Validation is all-or-nothing: the first bad entry rejects the whole list.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::spec::{PrintArea, PrintAreaSpec};

const SHEET_NAME_KEY: &str = "sheet_name";
const PRINT_AREA_KEY: &str = "print_area";

/// Why a spec list was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The list has no entries
    #[error("No print area specifications provided")]
    EmptySpecList,

    /// An entry is not an object with string `sheet_name` and `print_area`
    #[error("Malformed specification at index {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    /// A print-area piece is not of the form `A1:G66`
    #[error("Invalid range format '{range}' for sheet '{sheet_name}'")]
    InvalidRangeFormat { sheet_name: String, range: String },

    /// The envelope is not a JSON array
    #[error("Specifications are not a JSON array: {0}")]
    Unparseable(String),
}

/// Validate raw spec records
///
/// Entries are checked in order and the first failure is returned. Print
/// areas are checked for syntax only.
///
/// # Example
///
/// ```rust
/// use pagefit::{validate, ValidationError};
/// use serde_json::json;
///
/// let specs = validate(&[
///     json!({"sheet_name": "Summary", "print_area": "A1:G66"}),
///     json!({"sheet_name": "Notes", "print_area": "skip"}),
/// ])
/// .unwrap();
/// assert_eq!(specs.len(), 2);
///
/// assert_eq!(validate(&[]), Err(ValidationError::EmptySpecList));
/// ```
pub fn validate(raw: &[Value]) -> Result<Vec<PrintAreaSpec>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptySpecList);
    }

    raw.iter()
        .enumerate()
        .map(|(index, entry)| validate_entry(index, entry))
        .collect()
}

/// Parse a JSON array of spec records and [`validate`] it
pub fn parse_specs(json: &str) -> Result<Vec<PrintAreaSpec>, ValidationError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ValidationError::Unparseable(e.to_string()))?;

    match value {
        Value::Array(entries) => validate(&entries),
        other => Err(ValidationError::Unparseable(format!(
            "expected an array, found {}",
            json_type(&other)
        ))),
    }
}

fn validate_entry(index: usize, entry: &Value) -> Result<PrintAreaSpec, ValidationError> {
    let malformed = |reason: String| ValidationError::MalformedEntry { index, reason };

    let Value::Object(fields) = entry else {
        return Err(malformed(format!("expected an object, found {}", json_type(entry))));
    };

    // Both keys must be present before either value is looked at
    for key in [SHEET_NAME_KEY, PRINT_AREA_KEY] {
        if !fields.contains_key(key) {
            return Err(malformed(format!("missing '{}'", key)));
        }
    }

    let sheet_name = string_field(fields, SHEET_NAME_KEY).map_err(malformed)?;
    let print_area = string_field(fields, PRINT_AREA_KEY).map_err(malformed)?;

    let print_area = PrintArea::parse(print_area).map_err(|e| {
        ValidationError::InvalidRangeFormat {
            sheet_name: sheet_name.to_string(),
            range: e.0,
        }
    })?;

    Ok(PrintAreaSpec {
        sheet_name: sheet_name.to_string(),
        print_area,
    })
}

fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => Err(format!("'{}' is null", key)),
        Some(other) => Err(format!(
            "'{}' must be a string, found {}",
            key,
            json_type(other)
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn malformed_index(result: Result<Vec<PrintAreaSpec>, ValidationError>) -> usize {
        match result {
            Err(ValidationError::MalformedEntry { index, .. }) => index,
            other => panic!("expected MalformedEntry, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(validate(&[]), Err(ValidationError::EmptySpecList));
        assert_eq!(parse_specs("[]"), Err(ValidationError::EmptySpecList));
    }

    #[test]
    fn test_valid_entries_keep_order() {
        let specs = validate(&[
            json!({"sheet_name": "B", "print_area": "A1:C3"}),
            json!({"sheet_name": "A", "print_area": "skip", "note": "ignored"}),
        ])
        .unwrap();

        assert_eq!(
            specs,
            vec![
                PrintAreaSpec::new("B", "A1:C3").unwrap(),
                PrintAreaSpec::skip("A"),
            ]
        );
    }

    #[test]
    fn test_missing_keys() {
        assert_eq!(malformed_index(validate(&[json!({"sheet_name": "A"})])), 0);
        assert_eq!(
            malformed_index(validate(&[
                json!({"sheet_name": "A", "print_area": "A1:B2"}),
                json!({"print_area": "A1:B2"}),
            ])),
            1
        );
    }

    #[test]
    fn test_missing_key_reported_before_null_value() {
        let err = validate(&[json!({"sheet_name": null})]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedEntry {
                index: 0,
                reason: "missing 'print_area'".into()
            }
        );
    }

    #[test]
    fn test_null_and_non_string_values() {
        let err = validate(&[json!({"sheet_name": "A", "print_area": null})]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedEntry {
                index: 0,
                reason: "'print_area' is null".into()
            }
        );

        assert_eq!(
            malformed_index(validate(&[json!({"sheet_name": 3, "print_area": "A1:B2"})])),
            0
        );
        assert_eq!(malformed_index(validate(&[json!("Sheet1")])), 0);
        assert_eq!(malformed_index(validate(&[json!(null)])), 0);
    }

    #[test]
    fn test_invalid_range_cites_piece_and_sheet() {
        let err = validate(&[json!({"sheet_name": "Q1", "print_area": "A1:E36, A37-E53"})])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRangeFormat {
                sheet_name: "Q1".into(),
                range: "A37-E53".into()
            }
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let err = validate(&[
            json!({"sheet_name": "A", "print_area": "bad"}),
            json!({"print_area": "A1:B2"}),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRangeFormat { .. }));
    }

    #[test]
    fn test_parse_specs_envelope() {
        let specs = parse_specs(r#"[{"sheet_name": "Sheet1", "print_area": "A1:G66"}]"#).unwrap();
        assert_eq!(specs[0].print_area.end_rows(), vec![66]);

        assert!(matches!(
            parse_specs("not json"),
            Err(ValidationError::Unparseable(_))
        ));
        assert_eq!(
            parse_specs(r#"{"sheet_name": "Sheet1"}"#),
            Err(ValidationError::Unparseable(
                "expected an array, found an object".into()
            ))
        );
    }
}
