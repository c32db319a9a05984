//! # pagefit-xlsx
//!
//! XLSX (Office Open XML) page-layout reader and writer for pagefit.
//!
//! Unlike a full spreadsheet reader, this crate only models what affects
//! printing: sheet names, print areas, page setup and manual row breaks. Every
//! other part of the package is carried through untouched, so a document that
//! is read and written back without layout changes comes out byte-identical.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pagefit_xlsx::{XlsxReader, XlsxWriter};
//!
//! let mut doc = XlsxReader::read_file("report.xlsx")?;
//! let sheet = doc.workbook_mut().worksheet_by_name_mut("Sheet1").unwrap();
//! sheet.set_print_area(Some("A1:G66".into()));
//! XlsxWriter::write_file(&doc, "report-print.xlsx")?;
//! ```

pub mod defined_name;
pub mod document;
pub mod error;
pub mod reader;
pub mod writer;

mod xml;

pub use document::XlsxDocument;
pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;

/// MIME type of an XLSX package
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
