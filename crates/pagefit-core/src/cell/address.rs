//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// Rows and columns are stored 1-based, exactly as they appear in A1 notation
/// (`A1` is row 1, column 1). Parsing is purely syntactic: a row such as
/// `A2000000` parses fine even though it lies outside any worksheet; use
/// [`CellAddress::is_within_sheet`] to check bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1, B=2, ..., XFD=16384)
    pub col: u32,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a new cell address with relative references
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create an absolute cell address ($A$1 style)
    pub fn absolute(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            row_absolute: true,
            col_absolute: true,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// Row numbers too large for a `u32` saturate to `u32::MAX`; they can never
    /// be within a sheet, so they fail whatever bounds check is applied later.
    ///
    /// # Examples
    /// ```
    /// use pagefit_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("G66").unwrap();
    /// assert_eq!(addr.row, 66);
    /// assert_eq!(addr.col, 7);
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert!(addr.row_absolute);
    /// assert!(addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        let col_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }

        let col = Self::letters_to_column(&s[col_start..pos])?;

        let row_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!("invalid row number in '{}'", s)));
        }

        let row = row_str
            .bytes()
            .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')));

        Ok(Self {
            row,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to a 1-based number (A = 1, Z = 26, AA = 27, etc.)
    ///
    /// Columns too wide for a `u32` saturate, like rows do in [`CellAddress::parse`].
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            col = col.saturating_mul(26).saturating_add(digit);
        }

        Ok(col)
    }

    /// Whether this address lies inside the largest possible worksheet
    pub fn is_within_sheet(&self) -> bool {
        (1..=MAX_ROWS).contains(&self.row) && (1..=u32::from(MAX_COLS)).contains(&self.col)
    }

    /// Format as A1-style string, keeping the `$` markers
    pub fn to_a1_string(&self) -> String {
        let mut result = String::new();

        if self.col_absolute {
            result.push('$');
        }
        result.push_str(&Self::column_to_letters(self.col));

        if self.row_absolute {
            result.push('$');
        }
        result.push_str(&self.row.to_string());

        result
    }

    /// Format as a fully absolute reference (`$A$1`)
    pub fn to_absolute_string(&self) -> String {
        Self::absolute(self.row, self.col).to_a1_string()
    }

    /// Return a copy with both `$` markers cleared
    pub fn to_relative(&self) -> Self {
        Self::new(self.row, self.col)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of cells (e.g., "A1:B10")
///
/// The endpoints are kept in the order they were written; `end` is always the
/// cell after the colon, even when it lies above or left of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// First cell as written
    pub start: CellAddress,
    /// Second cell as written
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// Parse a range from A1 notation (e.g., "A1:G66")
    ///
    /// A single cell (e.g., "B2") parses as a one-cell range.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((start, end)) => {
                let start = CellAddress::parse(start)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                let end = CellAddress::parse(end)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::new(start, end))
            }
            None => {
                let cell = CellAddress::parse(s)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::new(cell, cell))
            }
        }
    }

    /// Parse a comma-separated list of ranges (e.g., "A1:E36,A37:E53")
    ///
    /// Pieces are trimmed before parsing.
    pub fn parse_list(s: &str) -> Result<Vec<Self>> {
        s.split(',').map(Self::parse).collect()
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }

    /// Format with both endpoints absolute (`$A$1:$G$66`)
    pub fn to_absolute_string(&self) -> String {
        format!(
            "{}:{}",
            self.start.to_absolute_string(),
            self.end.to_absolute_string()
        )
    }

    /// Return a copy with every `$` marker cleared
    pub fn to_relative(&self) -> Self {
        Self::new(self.start.to_relative(), self.end.to_relative())
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!(addr.row, 1);
        assert_eq!(addr.col, 1);

        let addr = CellAddress::parse("XFD1048576").unwrap();
        assert_eq!(addr.col, 16_384);
        assert_eq!(addr.row, 1_048_576);
        assert!(addr.is_within_sheet());

        let addr = CellAddress::parse("$C$7").unwrap();
        assert!(addr.row_absolute && addr.col_absolute);
        assert_eq!(addr.to_a1_string(), "$C$7");
    }

    #[test]
    fn test_parse_address_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("12").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("A1B").is_err());
        assert!(CellAddress::parse("A-1").is_err());
    }

    #[test]
    fn test_out_of_sheet_rows_parse() {
        let addr = CellAddress::parse("A2000000").unwrap();
        assert_eq!(addr.row, 2_000_000);
        assert!(!addr.is_within_sheet());

        let addr = CellAddress::parse("A0").unwrap();
        assert!(!addr.is_within_sheet());

        let addr = CellAddress::parse("A99999999999").unwrap();
        assert_eq!(addr.row, u32::MAX);
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(CellAddress::column_to_letters(1), "A");
        assert_eq!(CellAddress::column_to_letters(26), "Z");
        assert_eq!(CellAddress::column_to_letters(27), "AA");
        assert_eq!(CellAddress::column_to_letters(16_384), "XFD");

        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 1);
        assert_eq!(CellAddress::letters_to_column("AZ").unwrap(), 52);
        assert_eq!(CellAddress::letters_to_column("xfd").unwrap(), 16_384);
    }

    #[test]
    fn test_range_keeps_written_order() {
        let range = CellRange::parse("G66:A1").unwrap();
        assert_eq!(range.end.row, 1);

        assert_eq!(range.start.to_a1_string(), "G66");
        assert_eq!(range.to_a1_string(), "G66:A1");
    }

    #[test]
    fn test_range_list() {
        let ranges = CellRange::parse_list("A1:E36, A37:E53").unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].end.row, 36);
        assert_eq!(ranges[1].end.row, 53);
        assert_eq!(ranges[1].to_absolute_string(), "$A$37:$E$53");
    }

    #[test]
    fn test_range_relative() {
        let range = CellRange::parse("$A$1:$B$2").unwrap();
        assert_eq!(range.to_relative().to_a1_string(), "A1:B2");
    }
}
