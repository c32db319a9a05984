//! Typed print-area specifications
//!
//! A [`PrintAreaSpec`] only exists once its print area has passed the range
//! syntax check, so the applicator never sees unvalidated input.

use lazy_regex::regex_is_match;
use thiserror::Error;

use crate::CellRange;

/// Literal print-area value that opts a sheet out of any change
pub const SKIP_TOKEN: &str = "skip";

/// One validated `{sheet_name, print_area}` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintAreaSpec {
    /// Name of the target sheet, matched exactly
    pub sheet_name: String,
    /// What to do with that sheet
    pub print_area: PrintArea,
}

impl PrintAreaSpec {
    /// Build a spec, checking `print_area` the same way [`crate::validate`] does
    pub fn new<S: Into<String>>(sheet_name: S, print_area: &str) -> Result<Self, InvalidRange> {
        Ok(Self {
            sheet_name: sheet_name.into(),
            print_area: PrintArea::parse(print_area)?,
        })
    }

    /// A spec that leaves `sheet_name` untouched
    pub fn skip<S: Into<String>>(sheet_name: S) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            print_area: PrintArea::Skip,
        }
    }
}

/// The print-area value of a spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintArea {
    /// Leave the sheet's layout as it is
    Skip,
    /// One or more ranges
    Ranges {
        /// The range list exactly as given (e.g. "A1:E36, A37:E53")
        raw: String,
        /// Each comma-separated piece, in input order
        ranges: Vec<CellRange>,
    },
}

/// A range-list piece that is not of the form `A1:G66`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid range format: '{0}'")]
pub struct InvalidRange(pub String);

impl PrintArea {
    /// Parse a print-area value: [`SKIP_TOKEN`] or a comma-separated list of
    /// `<letters><digits>:<letters><digits>` ranges.
    ///
    /// Only the syntax is checked. Reversed ranges and references past the
    /// last row or column are accepted here.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagefit::PrintArea;
    ///
    /// let area = PrintArea::parse("A1:E36, A37:E53").unwrap();
    /// assert_eq!(area.end_rows(), vec![36, 53]);
    ///
    /// assert!(PrintArea::parse("a1:g66").is_err());
    /// assert_eq!(PrintArea::parse("skip").unwrap(), PrintArea::Skip);
    /// ```
    pub fn parse(value: &str) -> Result<Self, InvalidRange> {
        if value == SKIP_TOKEN {
            return Ok(PrintArea::Skip);
        }

        let mut ranges = Vec::new();
        for piece in value.split(',').map(str::trim) {
            if !regex_is_match!(r"^[A-Z]+[0-9]+:[A-Z]+[0-9]+$", piece) {
                return Err(InvalidRange(piece.to_string()));
            }
            let range = CellRange::parse(piece).map_err(|_| InvalidRange(piece.to_string()))?;
            ranges.push(range);
        }

        Ok(PrintArea::Ranges {
            raw: value.to_string(),
            ranges,
        })
    }

    /// Whether this is the skip token
    pub fn is_skip(&self) -> bool {
        matches!(self, PrintArea::Skip)
    }

    /// The raw range list, or `None` for [`PrintArea::Skip`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrintArea::Skip => None,
            PrintArea::Ranges { raw, .. } => Some(raw),
        }
    }

    /// Row of each range's end cell, left to right, duplicates included
    pub fn end_rows(&self) -> Vec<u32> {
        match self {
            PrintArea::Skip => Vec::new(),
            PrintArea::Ranges { ranges, .. } => ranges.iter().map(|r| r.end.row).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_skip_token_is_exact() {
        assert_eq!(PrintArea::parse("skip"), Ok(PrintArea::Skip));
        assert_eq!(PrintArea::parse("SKIP"), Err(InvalidRange("SKIP".into())));
        assert_eq!(PrintArea::parse(" skip"), Err(InvalidRange("skip".into())));
    }

    #[test]
    fn test_single_range() {
        let area = PrintArea::parse("A1:G66").unwrap();
        assert_eq!(area.as_str(), Some("A1:G66"));
        assert_eq!(area.end_rows(), vec![66]);
        assert!(!area.is_skip());
    }

    #[test]
    fn test_pieces_are_trimmed_but_raw_is_kept() {
        let area = PrintArea::parse(" A1:E36 ,  A37:E53").unwrap();
        assert_eq!(area.as_str(), Some(" A1:E36 ,  A37:E53"));
        assert_eq!(area.end_rows(), vec![36, 53]);
    }

    #[test]
    fn test_end_rows_keep_duplicates_and_order() {
        let area = PrintArea::parse("A1:B10,C1:D10,E1:F5").unwrap();
        assert_eq!(area.end_rows(), vec![10, 10, 5]);
    }

    #[test]
    fn test_rejects_bad_pieces() {
        for (value, piece) in [
            ("A1-G66", "A1-G66"),
            ("1A:G66", "1A:G66"),
            ("a1:g66", "a1:g66"),
            ("A1", "A1"),
            ("$A$1:$G$66", "$A$1:$G$66"),
            ("A1:G66,", ""),
            ("", ""),
            ("A1:G66,B2:C", "B2:C"),
            ("Sheet1!A1:B2", "Sheet1!A1:B2"),
        ] {
            assert_eq!(PrintArea::parse(value), Err(InvalidRange(piece.into())), "{}", value);
        }
    }

    #[test]
    fn test_no_semantic_checks() {
        // Reversed and oversized ranges are syntactically fine
        assert!(PrintArea::parse("G66:A1").is_ok());
        assert!(PrintArea::parse("A1:XFE99999999").is_ok());
        assert_eq!(PrintArea::parse("A0:B0").unwrap().end_rows(), vec![0]);
    }

    #[test]
    fn test_spec_constructors() {
        let spec = PrintAreaSpec::new("Sheet1", "A1:G66").unwrap();
        assert_eq!(spec.sheet_name, "Sheet1");
        assert_eq!(spec.print_area.as_str(), Some("A1:G66"));

        assert!(PrintAreaSpec::skip("Sheet1").print_area.is_skip());
        assert!(PrintAreaSpec::new("Sheet1", "nope").is_err());
    }
}
