//! An XLSX package held in memory together with its page-layout model

use pagefit_core::{SheetLayout, Workbook};

/// One file inside the ZIP package
#[derive(Debug, Clone)]
pub(crate) struct Part {
    pub(crate) name: String,
    pub(crate) data: Vec<u8>,
    pub(crate) compression: zip::CompressionMethod,
    pub(crate) is_dir: bool,
}

/// Where a modelled worksheet lives in the package
#[derive(Debug, Clone)]
pub(crate) struct SheetEntry {
    /// Path of the worksheet part (e.g. "xl/worksheets/sheet1.xml")
    pub(crate) part: String,
    /// Position of the sheet in `<sheets>`, used as `localSheetId`
    pub(crate) local_sheet_id: usize,
    /// Layout as read, to detect what changed
    pub(crate) original: SheetLayout,
}

/// A spreadsheet document: the raw package plus an editable layout model
///
/// Only page layout is editable. Worksheets (not chart sheets) appear in
/// [`XlsxDocument::workbook`] in tab order; adding or removing sheets from the
/// model is rejected when the document is written.
#[derive(Debug, Clone)]
pub struct XlsxDocument {
    pub(crate) source: Vec<u8>,
    pub(crate) parts: Vec<Part>,
    pub(crate) workbook_part: String,
    pub(crate) sheets: Vec<SheetEntry>,
    pub(crate) workbook: Workbook,
}

impl XlsxDocument {
    /// The layout model
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// The layout model, for editing
    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    /// The package bytes this document was read from
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Names of sheets whose layout differs from what was read
    pub fn changed_sheets(&self) -> Vec<&str> {
        self.sheets
            .iter()
            .zip(self.workbook.worksheets())
            .filter(|(entry, sheet)| &entry.original != sheet.layout())
            .map(|(_, sheet)| sheet.name())
            .collect()
    }

    /// Whether any layout changed since reading
    pub fn is_modified(&self) -> bool {
        self.sheets.len() != self.workbook.sheet_count() || !self.changed_sheets().is_empty()
    }

    /// Serialize to XLSX bytes (see [`crate::XlsxWriter::write`])
    pub fn to_bytes(&self) -> crate::XlsxResult<Vec<u8>> {
        let mut buf = std::io::Cursor::new(Vec::new());
        crate::XlsxWriter::write(self, &mut buf)?;
        Ok(buf.into_inner())
    }
}
