//! `_xlnm.Print_Area` defined-name formulas
//!
//! Print areas live in `xl/workbook.xml` as sheet-scoped defined names whose
//! value is a comma-separated list of absolute, sheet-qualified ranges:
//! `'Q1 Report'!$A$1:$E$36,'Q1 Report'!$A$37:$E$53`.

use pagefit_core::{CellAddress, CellRange, MAX_COLS, MAX_ROWS};

use crate::error::{XlsxError, XlsxResult};

/// Built-in name Excel uses for print areas
pub const PRINT_AREA_NAME: &str = "_xlnm.Print_Area";

/// Format a print area (e.g. "A1:E36,A37:E53") as a defined-name formula
///
/// Every range must parse and lie inside the worksheet grid.
pub fn format_print_area(sheet_name: &str, print_area: &str) -> XlsxResult<String> {
    let invalid = |reason: String| XlsxError::InvalidPrintArea {
        sheet: sheet_name.to_string(),
        reason,
    };

    let ranges = CellRange::parse_list(print_area).map_err(|e| invalid(e.to_string()))?;

    let sheet = format_sheet_name(sheet_name);
    let mut out = String::new();
    for (idx, range) in ranges.iter().enumerate() {
        for cell in [range.start, range.end] {
            if !cell.is_within_sheet() {
                return Err(invalid(format!(
                    "{} is outside the worksheet",
                    cell.to_relative()
                )));
            }
        }
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&sheet);
        out.push('!');
        out.push_str(&range.to_absolute_string());
    }
    Ok(out)
}

/// Parse a defined-name formula back into a relative range list ("A1:G66")
///
/// Returns `None` when the formula is not a plain list of cell ranges on
/// `sheet_name` (e.g. `#REF!`, whole-column areas, or another sheet).
pub fn parse_print_area(sheet_name: &str, formula: &str) -> Option<String> {
    let mut ranges = Vec::new();
    for area in split_areas(formula) {
        let (sheet, reference) = split_sheet_name(area)?;
        if !sheet.eq_ignore_ascii_case(sheet_name) {
            return None;
        }
        let range = CellRange::parse(reference).ok()?;
        ranges.push(range.to_relative().to_a1_string());
    }

    if ranges.is_empty() {
        None
    } else {
        Some(ranges.join(","))
    }
}

/// Split on top-level commas, ignoring commas inside quoted sheet names
fn split_areas(formula: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut in_quotes = false;
    let bytes = formula.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                if in_quotes && bytes.get(i + 1) == Some(&b'\'') {
                    // Escaped quote in a sheet name.
                    i += 1;
                } else {
                    in_quotes = !in_quotes;
                }
            }
            b',' if !in_quotes => {
                let part = formula[start..i].trim();
                if !part.is_empty() {
                    parts.push(part);
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    let part = formula[start..].trim();
    if !part.is_empty() {
        parts.push(part);
    }
    parts
}

fn split_sheet_name(area: &str) -> Option<(String, &str)> {
    if let Some(quoted) = area.strip_prefix('\'') {
        let mut sheet = String::new();
        let mut chars = quoted.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            if c != '\'' {
                sheet.push(c);
                continue;
            }
            if let Some((_, '\'')) = chars.peek() {
                sheet.push('\'');
                chars.next();
                continue;
            }
            let rest = quoted[idx + 1..].strip_prefix('!')?;
            return Some((sheet, rest));
        }
        return None;
    }

    let (sheet, rest) = area.split_once('!')?;
    Some((sheet.to_string(), rest))
}

/// Quote a sheet name for use in a formula when Excel would
fn format_sheet_name(sheet_name: &str) -> String {
    if needs_quotes(sheet_name) {
        format!("'{}'", sheet_name.replace('\'', "''"))
    } else {
        sheet_name.to_string()
    }
}

fn needs_quotes(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return true;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return true;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return true;
    }
    if name.eq_ignore_ascii_case("TRUE") || name.eq_ignore_ascii_case("FALSE") {
        return true;
    }
    looks_like_a1_cell(name) || looks_like_r1c1_ref(name)
}

fn looks_like_a1_cell(name: &str) -> bool {
    CellAddress::parse(name)
        .map(|addr| {
            addr.row >= 1 && addr.row <= MAX_ROWS && addr.col <= u32::from(MAX_COLS)
        })
        .unwrap_or(false)
}

fn looks_like_r1c1_ref(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    if let Some(rest) = upper.strip_prefix('R') {
        return match rest.split_once('C') {
            Some((row, col)) => digits(row) && digits(col),
            None => digits(rest),
        };
    }
    upper.strip_prefix('C').map(digits).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_single_range() {
        assert_eq!(
            format_print_area("Sheet1", "A1:G66").unwrap(),
            "Sheet1!$A$1:$G$66"
        );
    }

    #[test]
    fn test_format_multiple_ranges_quotes_sheet() {
        assert_eq!(
            format_print_area("Q1 Report", "A1:E36, A37:E53").unwrap(),
            "'Q1 Report'!$A$1:$E$36,'Q1 Report'!$A$37:$E$53"
        );
        assert_eq!(
            format_print_area("Bob's", "A1:B2").unwrap(),
            "'Bob''s'!$A$1:$B$2"
        );
    }

    #[test]
    fn test_format_quotes_names_that_look_like_references() {
        assert_eq!(format_print_area("A1", "A1:B2").unwrap(), "'A1'!$A$1:$B$2");
        assert_eq!(format_print_area("R1C1", "A1:B2").unwrap(), "'R1C1'!$A$1:$B$2");
        assert_eq!(format_print_area("TRUE", "A1:B2").unwrap(), "'TRUE'!$A$1:$B$2");
        assert_eq!(format_print_area("2024", "A1:B2").unwrap(), "'2024'!$A$1:$B$2");
    }

    #[test]
    fn test_format_rejects_rows_outside_the_sheet() {
        let err = format_print_area("Sheet1", "A1:G2000000").unwrap_err();
        assert!(matches!(err, XlsxError::InvalidPrintArea { .. }));

        let err = format_print_area("Sheet1", "A0:B1").unwrap_err();
        assert!(matches!(err, XlsxError::InvalidPrintArea { .. }));
    }

    #[test]
    fn test_parse_round_trips() {
        assert_eq!(
            parse_print_area("Q1 Report", "'Q1 Report'!$A$1:$E$36,'Q1 Report'!$A$37:$E$53"),
            Some("A1:E36,A37:E53".to_string())
        );
        assert_eq!(
            parse_print_area("Sheet1", "Sheet1!$A$1:$G$66"),
            Some("A1:G66".to_string())
        );
        assert_eq!(
            parse_print_area("Bob's", "'Bob''s'!$A$1:$B$2"),
            Some("A1:B2".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_unusual_formulas() {
        assert_eq!(parse_print_area("Sheet1", "#REF!"), None);
        assert_eq!(parse_print_area("Sheet1", "Sheet1!$A:$C"), None);
        assert_eq!(parse_print_area("Sheet1", "Other!$A$1:$B$2"), None);
        assert_eq!(parse_print_area("Sheet1", ""), None);
    }
}
