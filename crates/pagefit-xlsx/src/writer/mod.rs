//! XLSX writer

mod patch;

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::defined_name::format_print_area;
use crate::document::{Part, XlsxDocument};
use crate::error::{XlsxError, XlsxResult};
use pagefit_core::Workbook;

use patch::{patch_workbook, patch_worksheet};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a document to a file path
    pub fn write_file<P: AsRef<Path>>(doc: &XlsxDocument, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(doc, file)
    }

    /// Write a document to a writer
    ///
    /// Worksheets whose layout is unchanged, and every part pagefit does not
    /// model, are copied as-is. If nothing changed at all, the original package
    /// bytes are written back verbatim.
    pub fn write<W: Write + Seek>(doc: &XlsxDocument, mut writer: W) -> XlsxResult<()> {
        let replacements = Self::rewritten_parts(doc)?;

        if replacements.is_empty() {
            writer.write_all(&doc.source)?;
            writer.flush()?;
            return Ok(());
        }

        let mut zip = zip::ZipWriter::new(writer);
        for part in &doc.parts {
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(writable_compression(part.compression));

            if part.is_dir {
                zip.add_directory(part.name.as_str(), options)?;
                continue;
            }

            zip.start_file(part.name.as_str(), options)?;
            let data = replacements
                .get(part.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or(part.data.as_slice());
            zip.write_all(data)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Compute the new contents of every part touched by a layout change
    fn rewritten_parts(doc: &XlsxDocument) -> XlsxResult<HashMap<&str, Vec<u8>>> {
        if doc.sheets.len() != doc.workbook.sheet_count() {
            return Err(XlsxError::SheetCountMismatch {
                expected: doc.sheets.len(),
                actual: doc.workbook.sheet_count(),
            });
        }

        let mut replacements = HashMap::new();
        let mut print_areas = BTreeMap::new();

        for (entry, sheet) in doc.sheets.iter().zip(doc.workbook.worksheets()) {
            let layout = sheet.layout();
            let original = &entry.original;

            if layout.page_setup != original.page_setup || layout.row_breaks != original.row_breaks
            {
                log::debug!("rewriting page setup of '{}' ({})", sheet.name(), entry.part);
                let part = find_part(&doc.parts, &entry.part)?;
                replacements.insert(entry.part.as_str(), patch_worksheet(&part.data, layout)?);
            }

            if layout.print_area != original.print_area {
                let formula = layout
                    .print_area
                    .as_deref()
                    .map(|area| format_print_area(sheet.name(), area))
                    .transpose()?;
                print_areas.insert(entry.local_sheet_id, formula);
            }
        }

        if !print_areas.is_empty() {
            log::debug!("rewriting print areas in {}", doc.workbook_part);
            let part = find_part(&doc.parts, &doc.workbook_part)?;
            replacements.insert(
                doc.workbook_part.as_str(),
                patch_workbook(&part.data, &print_areas)?,
            );
        }

        Ok(replacements)
    }

    /// Write a brand-new package containing the worksheets and layouts of
    /// `workbook`. The sheets have no cell data.
    pub fn write_workbook<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml(workbook).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS_XML.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(&Self::workbook_xml(workbook)?)?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(Self::workbook_rels_xml(workbook).as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES_XML.as_bytes())?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1).as_str(), options)?;
            zip.write_all(&patch_worksheet(EMPTY_WORKSHEET_XML.as_bytes(), sheet.layout())?)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn content_types_xml(workbook: &Workbook) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");
        content
    }

    fn workbook_xml(workbook: &Workbook) -> XlsxResult<Vec<u8>> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }
        content.push_str("</sheets></workbook>");

        let mut print_areas = BTreeMap::new();
        for (i, sheet) in workbook.worksheets().enumerate() {
            if let Some(area) = sheet.print_area() {
                print_areas.insert(i, Some(format_print_area(sheet.name(), area)?));
            }
        }

        if print_areas.is_empty() {
            Ok(content.into_bytes())
        } else {
            patch_workbook(content.as_bytes(), &print_areas)
        }
    }

    fn workbook_rels_xml(workbook: &Workbook) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
            workbook.sheet_count() + 1
        ));
        content
    }
}

fn find_part<'a>(parts: &'a [Part], name: &str) -> XlsxResult<&'a Part> {
    parts
        .iter()
        .find(|p| p.name == name && !p.is_dir)
        .ok_or_else(|| XlsxError::MissingPart(name.to_string()))
}

/// Only stored and deflated entries can be written with the enabled zip features
fn writable_compression(method: zip::CompressionMethod) -> zip::CompressionMethod {
    match method {
        zip::CompressionMethod::Stored => zip::CompressionMethod::Stored,
        _ => zip::CompressionMethod::Deflated,
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const EMPTY_WORKSHEET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData/><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;
