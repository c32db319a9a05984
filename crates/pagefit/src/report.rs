//! What an application run did

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Sheet name -> print area actually applied
///
/// Skipped and missing sheets never appear. Serializes as a flat JSON object,
/// e.g. `{"Sheet1": "A1:G66"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApplicationReport {
    applied: BTreeMap<String, String>,
}

impl ApplicationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a print area for `sheet_name`, replacing any earlier entry
    pub fn record(&mut self, sheet_name: impl Into<String>, print_area: impl Into<String>) {
        self.applied.insert(sheet_name.into(), print_area.into());
    }

    /// Print area applied to `sheet_name`, if any
    pub fn get(&self, sheet_name: &str) -> Option<&str> {
        self.applied.get(sheet_name).map(String::as_str)
    }

    /// Number of sheets changed
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    /// Check if nothing was applied
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Iterate `(sheet_name, print_area)` pairs by sheet name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.applied.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The report as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.applied
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

/// A spec that could not be applied; the rest of the run continues
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApplyWarning {
    #[error("Sheet '{sheet_name}' not found in workbook")]
    SheetNotFound { sheet_name: String },
}

/// Result of folding a spec list over a workbook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Application {
    /// Print areas applied
    pub report: ApplicationReport,
    /// Specs skipped because they could not be applied, in input order
    pub warnings: Vec<ApplyWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_last_write_wins() {
        let mut report = ApplicationReport::new();
        report.record("Sheet1", "A1:B2");
        report.record("Sheet1", "A1:G66");

        assert_eq!(report.len(), 1);
        assert_eq!(report.get("Sheet1"), Some("A1:G66"));
        assert_eq!(report.get("Sheet2"), None);
    }

    #[test]
    fn test_json_shape() {
        let mut application = Application::default();
        application.report.record("Summary", "A1:E36,A37:E53");
        application.warnings.push(ApplyWarning::SheetNotFound {
            sheet_name: "Missing".into(),
        });

        assert_eq!(
            application.report.to_json(),
            json!({"Summary": "A1:E36,A37:E53"})
        );
        assert_eq!(
            serde_json::to_value(&application).unwrap(),
            json!({
                "report": {"Summary": "A1:E36,A37:E53"},
                "warnings": [{"kind": "sheet_not_found", "sheet_name": "Missing"}],
            })
        );
        assert_eq!(
            application.warnings[0].to_string(),
            "Sheet 'Missing' not found in workbook"
        );
    }
}
