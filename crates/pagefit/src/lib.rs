//! # pagefit
//!
//! Validate per-sheet print-area specifications and apply them as page
//! layout to spreadsheets.
//!
//! A request is a list of `{sheet_name, print_area}` records. `print_area` is
//! either `"skip"` or a comma-separated list of ranges such as
//! `"A1:E36,A37:E53"`. Each named sheet gets:
//!
//! - that print area,
//! - one manual page break after the last row of every range,
//! - the page setup from [`LayoutOptions`] (portrait A4, one page wide).
//!
//! Validation rejects the whole list on the first bad entry. Sheets that do
//! not exist are skipped with a warning.
//!
//! ## Example
//!
//! ```rust
//! use pagefit::prelude::*;
//! use serde_json::json;
//!
//! let specs = validate(&[json!({"sheet_name": "Sheet1", "print_area": "A1:G66"})]).unwrap();
//!
//! let mut workbook = Workbook::new();
//! let application = workbook.apply_print_areas(&specs);
//!
//! let sheet = workbook.worksheet(0).unwrap();
//! assert_eq!(sheet.print_area(), Some("A1:G66"));
//! assert!(sheet.row_breaks().contains(66));
//! assert_eq!(application.report.to_json(), json!({"Sheet1": "A1:G66"}));
//! ```
//!
//! For XLSX files, [`process`] runs the whole pipeline on the package bytes.

pub mod apply;
pub mod error;
pub mod options;
pub mod prelude;
pub mod process;
pub mod report;
pub mod spec;
pub mod uniform;
pub mod validate;

pub use apply::{apply, set_print_areas, WorkbookLayoutExt};
pub use error::{Error, Result};
pub use options::LayoutOptions;
pub use process::{
    process, process_document, process_print_areas, process_validated, Processed,
};
pub use report::{Application, ApplicationReport, ApplyWarning};
pub use spec::{InvalidRange, PrintArea, PrintAreaSpec, SKIP_TOKEN};
pub use uniform::uniform_specs;
pub use validate::{parse_specs, validate, ValidationError};

// Re-export core types
pub use pagefit_core::{
    CellAddress, CellRange, Error as CoreError, PageOrientation, PageSetup, PaperSize, RowBreaks,
    SheetLayout, Workbook, Worksheet, MAX_COLS, MAX_ROWS,
};

// Re-export I/O types
pub use pagefit_xlsx::{XlsxDocument, XlsxError, XlsxReader, XlsxWriter};
