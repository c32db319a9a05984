//! Pipeline error types

use thiserror::Error;

use crate::validate::ValidationError;
use pagefit_xlsx::XlsxError;

/// Result type for the end-to-end pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Why a request was rejected
///
/// Everything except [`Error::Xlsx`] is raised before the document is touched.
#[derive(Debug, Error)]
pub enum Error {
    /// No spreadsheet was supplied, or it was empty
    #[error("No file received")]
    NoInputFile,

    /// The spec list was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The spreadsheet could not be read or written
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}
