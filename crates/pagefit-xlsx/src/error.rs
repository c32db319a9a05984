//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A page break row outside the worksheet
    #[error("Page break row {0} out of bounds (valid: 1..=1048576)")]
    RowOutOfBounds(u32),

    /// A print area that cannot be written as a defined name
    #[error("Invalid print area for sheet '{sheet}': {reason}")]
    InvalidPrintArea { sheet: String, reason: String },

    /// Worksheets were added or removed after reading
    #[error("Worksheet count changed from {expected} to {actual}; only layout may be edited")]
    SheetCountMismatch { expected: usize, actual: usize },

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] pagefit_core::Error),
}
