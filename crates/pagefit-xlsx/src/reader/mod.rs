//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::defined_name::{parse_print_area, PRINT_AREA_NAME};
use crate::document::{Part, SheetEntry, XlsxDocument};
use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_value, parse_bool};
use pagefit_core::{
    PageOrientation, PageSetup, PaperSize, RowBreaks, SheetLayout, Workbook, Worksheet,
};

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

/// A `<sheet>` entry from workbook.xml
#[derive(Debug)]
struct SheetInfo {
    name: String,
    r_id: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a document from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<XlsxDocument> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Self::read_bytes(bytes)
    }

    /// Read a document from a reader
    pub fn read<R: Read + Seek>(mut reader: R) -> XlsxResult<XlsxDocument> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::read_bytes(bytes)
    }

    /// Read a document from the package bytes
    pub fn read_bytes(bytes: Vec<u8>) -> XlsxResult<XlsxDocument> {
        let parts = Self::read_parts(&bytes)?;
        let find = |name: &str| parts.iter().find(|p| p.name == name && !p.is_dir);

        // Verify this is an XLSX file
        if find("[Content_Types].xml").is_none() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let workbook_part = match find("_rels/.rels") {
            Some(rels) => Self::read_root_rels(&rels.data)?,
            None => None,
        }
        .unwrap_or_else(|| DEFAULT_WORKBOOK_PART.to_string());

        let workbook_xml = find(&workbook_part)
            .ok_or_else(|| XlsxError::MissingPart(workbook_part.clone()))?;
        let (sheet_info, print_areas) = Self::read_workbook_xml(&workbook_xml.data)?;

        let rels_part = rels_path_for(&workbook_part);
        let rels_xml =
            find(&rels_part).ok_or_else(|| XlsxError::MissingPart(rels_part.clone()))?;
        let sheet_paths = Self::read_workbook_rels(&rels_xml.data, &workbook_part)?;

        let mut workbook = Workbook::empty();
        let mut sheets = Vec::new();

        for (local_sheet_id, info) in sheet_info.iter().enumerate() {
            // Chart sheets and dialog sheets are not modelled
            let Some(path) = sheet_paths.get(&info.r_id) else {
                log::debug!("skipping non-worksheet sheet '{}'", info.name);
                continue;
            };
            let part = find(path).ok_or_else(|| XlsxError::MissingPart(path.clone()))?;

            let (page_setup, row_breaks) = Self::read_worksheet_layout(&part.data)?;
            let print_area = print_areas.get(&local_sheet_id).map(|formula| {
                parse_print_area(&info.name, formula).unwrap_or_else(|| {
                    log::warn!(
                        "print area of '{}' is not a plain range list, keeping '{}'",
                        info.name,
                        formula
                    );
                    formula.clone()
                })
            });

            let layout = SheetLayout {
                print_area,
                page_setup,
                row_breaks,
            };
            workbook.add_existing_worksheet(Worksheet::with_layout(&info.name, layout.clone()))?;
            sheets.push(SheetEntry {
                part: path.clone(),
                local_sheet_id,
                original: layout,
            });
        }

        Ok(XlsxDocument {
            source: bytes,
            parts,
            workbook_part,
            sheets,
            workbook,
        })
    }

    /// Load every entry of the ZIP archive, in archive order
    fn read_parts(bytes: &[u8]) -> XlsxResult<Vec<Part>> {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            // The declared size is untrusted, so let the buffer grow as data arrives
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            parts.push(Part {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
                is_dir: file.is_dir(),
            });
        }

        Ok(parts)
    }

    /// Resolve the main workbook part from `_rels/.rels`
    fn read_root_rels(xml: &[u8]) -> XlsxResult<Option<String>> {
        let rels = Self::read_relationships(xml)?;
        Ok(rels
            .into_iter()
            .find(|rel| rel.rel_type == REL_OFFICE_DOCUMENT)
            .map(|rel| resolve_target("", &rel.target)))
    }

    /// Read workbook.xml: sheets in tab order, and print areas by `localSheetId`
    fn read_workbook_xml(xml: &[u8]) -> XlsxResult<(Vec<SheetInfo>, HashMap<usize, String>)> {
        let mut xml_reader = Reader::from_reader(xml);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut print_areas = HashMap::new();
        let mut current_print_area: Option<usize> = None;
        let mut text = String::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                    let name = attr_value(&e, b"name")?;
                    let r_id = attr_value(&e, b"r:id")?.or(relationship_id(&e)?);
                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push(SheetInfo { name, r_id });
                    }
                }
                Event::Start(e) if e.local_name().as_ref() == b"definedName" => {
                    let is_print_area = attr_value(&e, b"name")?.as_deref() == Some(PRINT_AREA_NAME);
                    current_print_area = if is_print_area {
                        attr_value(&e, b"localSheetId")?.and_then(|id| id.parse().ok())
                    } else {
                        None
                    };
                    text.clear();
                }
                Event::Text(e) if current_print_area.is_some() => {
                    text.push_str(&e.unescape()?);
                }
                Event::End(e) if e.local_name().as_ref() == b"definedName" => {
                    if let Some(id) = current_print_area.take() {
                        print_areas.insert(id, text.trim().to_string());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, print_areas))
    }

    /// Read the workbook relationships, keeping worksheet targets by id
    fn read_workbook_rels(xml: &[u8], workbook_part: &str) -> XlsxResult<HashMap<String, String>> {
        let base = workbook_part
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("");

        Ok(Self::read_relationships(xml)?
            .into_iter()
            .filter(|rel| rel.rel_type.ends_with("/worksheet"))
            .map(|rel| (rel.id, resolve_target(base, &rel.target)))
            .collect())
    }

    fn read_relationships(xml: &[u8]) -> XlsxResult<Vec<Relationship>> {
        let mut xml_reader = Reader::from_reader(xml);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id")?;
                    let target = attr_value(&e, b"Target")?;
                    let rel_type = attr_value(&e, b"Type")?;
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        rels.push(Relationship {
                            id,
                            target,
                            rel_type,
                        });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the page setup and manual row breaks of one worksheet part
    ///
    /// Only the sheet's own elements count: `pageSetup` and `rowBreaks` must
    /// be children of `<worksheet>`, `pageSetUpPr` a child of its `sheetPr`.
    /// Copies nested in `customSheetView`s belong to those views.
    pub(crate) fn read_worksheet_layout(xml: &[u8]) -> XlsxResult<(PageSetup, RowBreaks)> {
        let mut xml_reader = Reader::from_reader(xml);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut page_setup = PageSetup::default();
        let mut row_breaks = RowBreaks::new();
        let mut depth = 0usize;
        // Local name of the open child of <worksheet>
        let mut parent: Option<Vec<u8>> = None;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    Self::read_layout_element(
                        &e,
                        depth,
                        parent.as_deref(),
                        &mut page_setup,
                        &mut row_breaks,
                    )?;
                    if depth == 1 {
                        parent = Some(e.local_name().as_ref().to_vec());
                    }
                    depth += 1;
                }
                Event::Empty(e) => Self::read_layout_element(
                    &e,
                    depth,
                    parent.as_deref(),
                    &mut page_setup,
                    &mut row_breaks,
                )?,
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 {
                        parent = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok((page_setup, row_breaks))
    }

    fn read_layout_element(
        e: &BytesStart<'_>,
        depth: usize,
        parent: Option<&[u8]>,
        page_setup: &mut PageSetup,
        row_breaks: &mut RowBreaks,
    ) -> XlsxResult<()> {
        match (depth, parent, e.local_name().as_ref()) {
            (1, _, b"pageSetup") => Self::read_page_setup_attrs(e, page_setup)?,
            (2, Some(b"sheetPr"), b"pageSetUpPr") => {
                page_setup.fit_to_page = attr_value(e, b"fitToPage")?
                    .map(|v| parse_bool(&v))
                    .unwrap_or(false);
            }
            (2, Some(b"rowBreaks"), b"brk") => {
                if let Some(id) = attr_value(e, b"id")?.and_then(|v| v.parse().ok()) {
                    row_breaks.insert(id);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn read_page_setup_attrs(e: &BytesStart<'_>, page_setup: &mut PageSetup) -> XlsxResult<()> {
        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"orientation" => {
                    page_setup.orientation = if value == "landscape" {
                        PageOrientation::Landscape
                    } else {
                        PageOrientation::Portrait
                    };
                }
                b"paperSize" => {
                    if let Ok(code) = value.parse() {
                        page_setup.paper_size = PaperSize::from_code(code);
                    }
                }
                b"fitToWidth" => {
                    if let Ok(n) = value.parse() {
                        page_setup.fit_to_width = n;
                    }
                }
                b"fitToHeight" => {
                    if let Ok(n) = value.parse() {
                        page_setup.fit_to_height = n;
                    }
                }
                b"scale" => {
                    if let Ok(n) = value.parse() {
                        page_setup.scale = n;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// A `<Relationship>` entry
#[derive(Debug)]
struct Relationship {
    id: String,
    target: String,
    rel_type: String,
}

/// `r:id` may use any prefix bound to the relationships namespace
fn relationship_id(e: &BytesStart<'_>) -> XlsxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Resolve a relationship target against the directory of its source part
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Path of the relationships part for `part` ("xl/workbook.xml" -> "xl/_rels/workbook.xml.rels")
fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}
