//! # pagefit-core
//!
//! Core data structures for the pagefit page-layout tools.
//!
//! This crate provides the document model that the rest of pagefit reads and mutates:
//! - [`CellAddress`] and [`CellRange`] - A1-style cell addressing
//! - [`PageSetup`], [`PageOrientation`], [`PaperSize`] - Print page setup
//! - [`RowBreaks`] - Manual row page breaks
//! - [`Workbook`], [`Worksheet`] - The main document structures
//!
//! ## Example
//!
//! ```rust
//! use pagefit_core::{PageOrientation, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_by_name_mut("Sheet1").unwrap();
//!
//! sheet.set_print_area(Some("A1:G66".to_string()));
//! sheet.page_setup_mut().orientation = PageOrientation::Landscape;
//! sheet.row_breaks_mut().insert(66);
//!
//! assert_eq!(sheet.print_area(), Some("A1:G66"));
//! ```

pub mod cell;
pub mod error;
pub mod page_setup;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange};
pub use error::{Error, Result};
pub use page_setup::{PageOrientation, PageSetup, PaperSize, RowBreaks};
pub use workbook::Workbook;
pub use worksheet::{SheetLayout, Worksheet};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
