//! Small helpers shared by the reader and the part rewriters

use std::borrow::Cow;

use quick_xml::events::BytesStart;

use crate::error::XlsxResult;

/// Child elements of `<worksheet>` in schema order (CT_Worksheet)
pub(crate) const WORKSHEET_CHILD_ORDER: &[&str] = &[
    "sheetPr",
    "dimension",
    "sheetViews",
    "sheetFormatPr",
    "cols",
    "sheetData",
    "sheetCalcPr",
    "sheetProtection",
    "protectedRanges",
    "scenarios",
    "autoFilter",
    "sortState",
    "dataConsolidate",
    "customSheetViews",
    "mergeCells",
    "phoneticPr",
    "conditionalFormatting",
    "dataValidations",
    "hyperlinks",
    "printOptions",
    "pageMargins",
    "pageSetup",
    "headerFooter",
    "rowBreaks",
    "colBreaks",
    "customProperties",
    "cellWatches",
    "ignoredErrors",
    "smartTags",
    "drawing",
    "legacyDrawing",
    "legacyDrawingHF",
    "drawingHF",
    "picture",
    "oleObjects",
    "controls",
    "webPublishItems",
    "tableParts",
    "extLst",
];

/// Child elements of `<workbook>` in schema order (CT_Workbook)
pub(crate) const WORKBOOK_CHILD_ORDER: &[&str] = &[
    "fileVersion",
    "fileSharing",
    "workbookPr",
    "workbookProtection",
    "bookViews",
    "sheets",
    "functionGroups",
    "externalReferences",
    "definedNames",
    "calcPr",
    "oleSize",
    "customWorkbookViews",
    "pivotCaches",
    "smartTagPr",
    "smartTagTypes",
    "webPublishing",
    "fileRecoveryPr",
    "webPublishObjects",
    "extLst",
];

/// Position of `local_name` in a schema order table
pub(crate) fn child_rank(order: &[&str], local_name: &[u8]) -> Option<usize> {
    order.iter().position(|name| name.as_bytes() == local_name)
}

/// Unescaped value of an attribute, matched on its full (prefixed) key
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse an OOXML boolean (`1`/`true`)
pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true")
}

/// Qualified element name using the document's namespace prefix, if any
pub(crate) fn qualified<'a>(prefix: &Option<String>, local: &'a str) -> Cow<'a, str> {
    match prefix {
        Some(p) => Cow::Owned(format!("{}:{}", p, local)),
        None => Cow::Borrowed(local),
    }
}

/// Namespace prefix of an element (`x` for `<x:worksheet>`)
pub(crate) fn element_prefix(e: &BytesStart<'_>) -> Option<String> {
    e.name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
}

/// Copy `e`, dropping attributes whose key is in `managed`
///
/// Kept attributes are copied as raw bytes, so their escaping is untouched.
pub(crate) fn retain_attributes(
    e: &BytesStart<'_>,
    name: &str,
    managed: &[&[u8]],
) -> XlsxResult<BytesStart<'static>> {
    let mut out = BytesStart::new(name.to_string());
    for attr in e.attributes() {
        let attr = attr?;
        if managed.contains(&attr.key.as_ref()) {
            continue;
        }
        out.push_attribute((attr.key.as_ref(), attr.value.as_ref()));
    }
    Ok(out)
}
