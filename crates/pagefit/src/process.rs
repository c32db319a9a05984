//! End-to-end pipeline: bytes and raw specs in, bytes and report out

use serde_json::Value;

use crate::apply::{apply, set_print_areas};
use crate::error::{Error, Result};
use crate::options::LayoutOptions;
use crate::report::Application;
use crate::spec::PrintAreaSpec;
use crate::validate::validate;
use pagefit_xlsx::{XlsxDocument, XlsxReader};

/// A processed spreadsheet
#[derive(Debug, Clone)]
pub struct Processed {
    /// The updated XLSX package
    pub bytes: Vec<u8>,
    /// What was applied
    pub application: Application,
}

/// Validate `raw_specs`, apply them to the XLSX package `file` and serialize it
///
/// Validation happens before the package is opened, so a rejected spec list
/// never costs a parse. Sheets that are only skipped (or not found) come out
/// byte-identical, as does the whole package if nothing changed.
pub fn process(
    file: Option<&[u8]>,
    raw_specs: &[Value],
    options: &LayoutOptions,
) -> Result<Processed> {
    let file = match file {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(Error::NoInputFile),
    };

    let specs = validate(raw_specs)?;
    process_validated(file.to_vec(), &specs, options)
}

/// Apply already-validated specs to an XLSX package
pub fn process_validated(
    file: Vec<u8>,
    specs: &[PrintAreaSpec],
    options: &LayoutOptions,
) -> Result<Processed> {
    let mut doc = XlsxReader::read_bytes(file)?;
    process_document(&mut doc, specs, options)
}

/// Apply validated specs to an open document and serialize it
pub fn process_document(
    doc: &mut XlsxDocument,
    specs: &[PrintAreaSpec],
    options: &LayoutOptions,
) -> Result<Processed> {
    let application = apply(doc.workbook_mut(), specs, options);
    serialize(doc, application)
}

/// Set only the print areas named by `specs` on an open document and serialize it
///
/// Page setup and row breaks keep whatever the package already had.
pub fn process_print_areas(doc: &mut XlsxDocument, specs: &[PrintAreaSpec]) -> Result<Processed> {
    let application = set_print_areas(doc.workbook_mut(), specs);
    serialize(doc, application)
}

fn serialize(doc: &XlsxDocument, application: Application) -> Result<Processed> {
    log::info!(
        "Applied {} print area(s), {} warning(s)",
        application.report.len(),
        application.warnings.len()
    );

    let bytes = doc.to_bytes()?;
    Ok(Processed { bytes, application })
}
