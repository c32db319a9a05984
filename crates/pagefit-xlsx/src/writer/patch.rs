//! Streaming rewrites of existing worksheet and workbook parts
//!
//! Both rewriters copy every event through unchanged except the handful of
//! elements pagefit owns. Generated elements are placed where the schema
//! requires them, which Excel enforces strictly.

use std::collections::BTreeMap;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::defined_name::PRINT_AREA_NAME;
use crate::error::{XlsxError, XlsxResult};
use crate::xml::{
    attr_value, child_rank, element_prefix, qualified, retain_attributes, WORKBOOK_CHILD_ORDER,
    WORKSHEET_CHILD_ORDER,
};
use pagefit_core::{PageSetup, SheetLayout, MAX_COLS, MAX_ROWS};

/// `pageSetup` attributes written from the model; all others are preserved
const MANAGED_PAGE_SETUP_ATTRS: &[&[u8]] = &[
    b"orientation",
    b"paperSize",
    b"fitToWidth",
    b"fitToHeight",
    b"scale",
];

type XmlWriter = Writer<Vec<u8>>;

/// Rewrite a worksheet part so its `pageSetUpPr`, `pageSetup` and `rowBreaks`
/// match `layout`
pub(crate) fn patch_worksheet(xml: &[u8], layout: &SheetLayout) -> XlsxResult<Vec<u8>> {
    let breaks = checked_breaks(layout)?;

    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 512));
    let mut patch = WorksheetPatch {
        page_setup: &layout.page_setup,
        breaks,
        prefix: None,
        sheet_pr_done: false,
        page_setup_done: false,
        row_breaks_done: false,
        in_sheet_pr: false,
        setup_pr_written: false,
    };

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut skip_to: Option<usize> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;

        if let Some(target) = skip_to {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == target {
                        skip_to = None;
                    }
                }
                Event::Eof => return Err(truncated("worksheet")),
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(e) => {
                let skip = match depth {
                    0 => {
                        patch.prefix = element_prefix(&e);
                        writer.write_event(Event::Start(e))?;
                        false
                    }
                    1 => patch.root_child(&mut writer, e, false)?,
                    2 if patch.in_sheet_pr => patch.sheet_pr_child(&mut writer, e, false)?,
                    _ => {
                        writer.write_event(Event::Start(e))?;
                        false
                    }
                };
                if skip {
                    skip_to = Some(depth);
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                0 => {
                    // `<worksheet/>`: open it so generated children have a home
                    patch.prefix = element_prefix(&e);
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    writer.write_event(Event::Start(e))?;
                    patch.flush_before(&mut writer, usize::MAX)?;
                    writer.write_event(Event::End(BytesEnd::new(name)))?;
                }
                1 => {
                    patch.root_child(&mut writer, e, true)?;
                }
                2 if patch.in_sheet_pr => {
                    patch.sheet_pr_child(&mut writer, e, true)?;
                }
                _ => writer.write_event(Event::Empty(e))?,
            },
            Event::End(e) => {
                depth -= 1;
                match depth {
                    0 => patch.flush_before(&mut writer, usize::MAX)?,
                    1 if patch.in_sheet_pr => {
                        if !patch.setup_pr_written {
                            patch.write_setup_pr(&mut writer, None)?;
                        }
                        patch.in_sheet_pr = false;
                    }
                    _ => {}
                }
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

struct WorksheetPatch<'a> {
    page_setup: &'a PageSetup,
    breaks: Vec<u32>,
    prefix: Option<String>,
    sheet_pr_done: bool,
    page_setup_done: bool,
    row_breaks_done: bool,
    in_sheet_pr: bool,
    setup_pr_written: bool,
}

impl WorksheetPatch<'_> {
    /// Handle a direct child of `<worksheet>`. Returns true if its subtree must be skipped.
    fn root_child(
        &mut self,
        writer: &mut XmlWriter,
        e: BytesStart<'_>,
        empty: bool,
    ) -> XlsxResult<bool> {
        let local = e.local_name().as_ref().to_vec();
        if let Some(rank) = child_rank(WORKSHEET_CHILD_ORDER, &local) {
            self.flush_before(writer, rank)?;
        }

        match local.as_slice() {
            b"sheetPr" => {
                self.sheet_pr_done = true;
                if empty {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if self.page_setup.fit_to_page {
                        writer.write_event(Event::Start(e))?;
                        self.write_setup_pr(writer, None)?;
                        writer.write_event(Event::End(BytesEnd::new(name)))?;
                    } else {
                        writer.write_event(Event::Empty(e))?;
                    }
                } else {
                    writer.write_event(Event::Start(e))?;
                    self.in_sheet_pr = true;
                    self.setup_pr_written = false;
                }
                Ok(false)
            }
            b"pageSetup" => {
                self.page_setup_done = true;
                self.write_page_setup(writer, Some(&e))?;
                Ok(!empty)
            }
            b"rowBreaks" => {
                self.row_breaks_done = true;
                self.write_row_breaks(writer)?;
                Ok(!empty)
            }
            _ => {
                if empty {
                    writer.write_event(Event::Empty(e))?;
                } else {
                    writer.write_event(Event::Start(e))?;
                }
                Ok(false)
            }
        }
    }

    /// Handle a direct child of `<sheetPr>`
    fn sheet_pr_child(
        &mut self,
        writer: &mut XmlWriter,
        e: BytesStart<'_>,
        empty: bool,
    ) -> XlsxResult<bool> {
        if e.local_name().as_ref() == b"pageSetUpPr" {
            self.write_setup_pr(writer, Some(&e))?;
            return Ok(!empty);
        }
        if empty {
            writer.write_event(Event::Empty(e))?;
        } else {
            writer.write_event(Event::Start(e))?;
        }
        Ok(false)
    }

    /// Emit every generated element that belongs before schema position `rank`
    fn flush_before(&mut self, writer: &mut XmlWriter, rank: usize) -> XlsxResult<()> {
        let rank_of = |name: &str| child_rank(WORKSHEET_CHILD_ORDER, name.as_bytes()).unwrap_or(0);

        if !self.sheet_pr_done && rank_of("sheetPr") < rank {
            self.sheet_pr_done = true;
            if self.page_setup.fit_to_page {
                let name = qualified(&self.prefix, "sheetPr").into_owned();
                writer.write_event(Event::Start(BytesStart::new(name.clone())))?;
                self.write_setup_pr(writer, None)?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
        if !self.page_setup_done && rank_of("pageSetup") < rank {
            self.page_setup_done = true;
            self.write_page_setup(writer, None)?;
        }
        if !self.row_breaks_done && rank_of("rowBreaks") < rank {
            self.row_breaks_done = true;
            self.write_row_breaks(writer)?;
        }
        Ok(())
    }

    /// `<pageSetUpPr>`, keeping any attributes other than `fitToPage`
    fn write_setup_pr(
        &mut self,
        writer: &mut XmlWriter,
        existing: Option<&BytesStart<'_>>,
    ) -> XlsxResult<()> {
        self.setup_pr_written = true;
        let name = qualified(&self.prefix, "pageSetUpPr").into_owned();
        let mut elem = match existing {
            Some(e) => retain_attributes(e, &name, &[b"fitToPage"])?,
            None => BytesStart::new(name),
        };
        if self.page_setup.fit_to_page {
            elem.push_attribute(("fitToPage", "1"));
        }
        if elem.attributes().next().is_some() {
            writer.write_event(Event::Empty(elem))?;
        }
        Ok(())
    }

    fn write_page_setup(
        &self,
        writer: &mut XmlWriter,
        existing: Option<&BytesStart<'_>>,
    ) -> XlsxResult<()> {
        let name = qualified(&self.prefix, "pageSetup").into_owned();
        let mut elem = match existing {
            Some(e) => retain_attributes(e, &name, MANAGED_PAGE_SETUP_ATTRS)?,
            None => BytesStart::new(name),
        };
        let setup = self.page_setup;
        elem.push_attribute(("paperSize", setup.paper_size.code.to_string().as_str()));
        elem.push_attribute(("scale", setup.scale.to_string().as_str()));
        elem.push_attribute(("fitToWidth", setup.fit_to_width.to_string().as_str()));
        elem.push_attribute(("fitToHeight", setup.fit_to_height.to_string().as_str()));
        elem.push_attribute(("orientation", setup.orientation.as_str()));
        writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn write_row_breaks(&self, writer: &mut XmlWriter) -> XlsxResult<()> {
        if self.breaks.is_empty() {
            return Ok(());
        }

        let name = qualified(&self.prefix, "rowBreaks").into_owned();
        let count = self.breaks.len().to_string();
        let mut start = BytesStart::new(name.clone());
        start.push_attribute(("count", count.as_str()));
        start.push_attribute(("manualBreakCount", count.as_str()));
        writer.write_event(Event::Start(start))?;

        let brk_name = qualified(&self.prefix, "brk").into_owned();
        let max_col = (MAX_COLS - 1).to_string();
        for row in &self.breaks {
            let mut brk = BytesStart::new(brk_name.clone());
            brk.push_attribute(("id", row.to_string().as_str()));
            brk.push_attribute(("max", max_col.as_str()));
            brk.push_attribute(("man", "1"));
            writer.write_event(Event::Empty(brk))?;
        }

        writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

/// Page break rows, rejecting any that cannot exist in a worksheet
fn checked_breaks(layout: &SheetLayout) -> XlsxResult<Vec<u32>> {
    layout
        .row_breaks
        .iter()
        .map(|row| {
            if (1..=MAX_ROWS).contains(&row) {
                Ok(row)
            } else {
                Err(XlsxError::RowOutOfBounds(row))
            }
        })
        .collect()
}

/// Rewrite workbook.xml so the `_xlnm.Print_Area` names of the sheets in
/// `print_areas` (keyed by `localSheetId`) match; `None` removes the name
pub(crate) fn patch_workbook(
    xml: &[u8],
    print_areas: &BTreeMap<usize, Option<String>>,
) -> XlsxResult<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let mut patch = WorkbookPatch {
        print_areas,
        prefix: None,
        names_done: false,
        in_defined_names: false,
    };

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut skip_to: Option<usize> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;

        if let Some(target) = skip_to {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == target {
                        skip_to = None;
                    }
                }
                Event::Eof => return Err(truncated("workbook")),
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(e) => {
                let skip = match depth {
                    0 => {
                        patch.prefix = element_prefix(&e);
                        writer.write_event(Event::Start(e))?;
                        false
                    }
                    1 => {
                        patch.root_child(&mut writer, e, false)?;
                        false
                    }
                    2 if patch.in_defined_names => {
                        if patch.is_replaced(&e)? {
                            true
                        } else {
                            writer.write_event(Event::Start(e))?;
                            false
                        }
                    }
                    _ => {
                        writer.write_event(Event::Start(e))?;
                        false
                    }
                };
                if skip {
                    skip_to = Some(depth);
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                1 => patch.root_child(&mut writer, e, true)?,
                2 if patch.in_defined_names => {
                    if !patch.is_replaced(&e)? {
                        writer.write_event(Event::Empty(e))?;
                    }
                }
                _ => writer.write_event(Event::Empty(e))?,
            },
            Event::End(e) => {
                depth -= 1;
                match depth {
                    0 => patch.write_defined_names(&mut writer)?,
                    1 if patch.in_defined_names => {
                        patch.write_names(&mut writer)?;
                        patch.in_defined_names = false;
                    }
                    _ => {}
                }
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

struct WorkbookPatch<'a> {
    print_areas: &'a BTreeMap<usize, Option<String>>,
    prefix: Option<String>,
    names_done: bool,
    in_defined_names: bool,
}

impl WorkbookPatch<'_> {
    fn root_child(
        &mut self,
        writer: &mut XmlWriter,
        e: BytesStart<'_>,
        empty: bool,
    ) -> XlsxResult<()> {
        let local = e.local_name().as_ref().to_vec();
        let defined_names_rank = child_rank(WORKBOOK_CHILD_ORDER, b"definedNames").unwrap_or(0);

        if local.as_slice() == b"definedNames" {
            self.names_done = true;
            if empty {
                if self.has_new_names() {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    writer.write_event(Event::Start(e))?;
                    self.write_names(writer)?;
                    writer.write_event(Event::End(BytesEnd::new(name)))?;
                } else {
                    writer.write_event(Event::Empty(e))?;
                }
            } else {
                writer.write_event(Event::Start(e))?;
                self.in_defined_names = true;
            }
            return Ok(());
        }

        if child_rank(WORKBOOK_CHILD_ORDER, &local).is_some_and(|rank| rank > defined_names_rank)
        {
            self.write_defined_names(writer)?;
        }

        if empty {
            writer.write_event(Event::Empty(e))?;
        } else {
            writer.write_event(Event::Start(e))?;
        }
        Ok(())
    }

    /// Whether a `<definedName>` is a print area this patch replaces
    fn is_replaced(&self, e: &BytesStart<'_>) -> XlsxResult<bool> {
        if e.local_name().as_ref() != b"definedName"
            || attr_value(e, b"name")?.as_deref() != Some(PRINT_AREA_NAME)
        {
            return Ok(false);
        }
        Ok(attr_value(e, b"localSheetId")?
            .and_then(|id| id.parse::<usize>().ok())
            .is_some_and(|id| self.print_areas.contains_key(&id)))
    }

    fn has_new_names(&self) -> bool {
        self.print_areas.values().any(Option::is_some)
    }

    /// A fresh `<definedNames>` block, if one is still needed
    fn write_defined_names(&mut self, writer: &mut XmlWriter) -> XlsxResult<()> {
        if self.names_done {
            return Ok(());
        }
        self.names_done = true;
        if !self.has_new_names() {
            return Ok(());
        }

        let name = qualified(&self.prefix, "definedNames").into_owned();
        writer.write_event(Event::Start(BytesStart::new(name.clone())))?;
        self.write_names(writer)?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_names(&self, writer: &mut XmlWriter) -> XlsxResult<()> {
        let name = qualified(&self.prefix, "definedName").into_owned();
        for (local_sheet_id, formula) in self.print_areas {
            let Some(formula) = formula else {
                continue;
            };
            let mut elem = BytesStart::new(name.clone());
            elem.push_attribute(("name", PRINT_AREA_NAME));
            elem.push_attribute(("localSheetId", local_sheet_id.to_string().as_str()));
            writer.write_event(Event::Start(elem))?;
            writer.write_event(Event::Text(BytesText::new(formula)))?;
            writer.write_event(Event::End(BytesEnd::new(name.clone())))?;
        }
        Ok(())
    }
}

fn truncated(part: &str) -> XlsxError {
    XlsxError::InvalidFormat(format!("{} part ends inside an element", part))
}
