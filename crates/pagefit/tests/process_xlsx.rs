//! The full pipeline over XLSX bytes

use std::io::Cursor;

use pagefit::prelude::*;
use pagefit::{process, process_validated, uniform_specs, Error, PageSetup, XlsxError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// A package with two sheets; "Report" already has a print area and breaks
fn fixture() -> Vec<u8> {
    let mut wb = Workbook::new();
    wb.add_worksheet_with_name("Report").unwrap();
    {
        let report = wb.worksheet_by_name_mut("Report").unwrap();
        report.set_print_area(Some("B2:D9".into()));
        report.row_breaks_mut().insert(4);
        report.page_setup_mut().orientation = PageOrientation::Landscape;
    }

    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write_workbook(&wb, &mut buf).unwrap();
    buf.into_inner()
}

fn entries(raw: Value) -> Vec<Value> {
    match raw {
        Value::Array(entries) => entries,
        _ => panic!("expected an array"),
    }
}

#[test]
fn test_apply_and_read_back() {
    let processed = process(
        Some(fixture().as_slice()),
        &entries(json!([
            {"sheet_name": "Sheet1", "print_area": "A1:G66"},
            {"sheet_name": "Report", "print_area": "A1:E36,A37:E53"}
        ])),
        &LayoutOptions::default(),
    )
    .unwrap();

    assert_eq!(
        processed.application.report.to_json(),
        json!({"Sheet1": "A1:G66", "Report": "A1:E36,A37:E53"})
    );

    let doc = XlsxReader::read_bytes(processed.bytes).unwrap();
    let sheet1 = doc.workbook().worksheet_by_name("Sheet1").unwrap();
    assert_eq!(sheet1.print_area(), Some("A1:G66"));
    assert_eq!(sheet1.row_breaks().iter().collect::<Vec<_>>(), vec![66]);
    assert_eq!(
        sheet1.page_setup(),
        &PageSetup {
            orientation: PageOrientation::Portrait,
            paper_size: PaperSize::A4,
            fit_to_width: 1,
            fit_to_height: 0,
            scale: 100,
            fit_to_page: true,
        }
    );

    let report = doc.workbook().worksheet_by_name("Report").unwrap();
    assert_eq!(report.print_area(), Some("A1:E36,A37:E53"));
    assert_eq!(report.row_breaks().iter().collect::<Vec<_>>(), vec![36, 53]);
    assert_eq!(report.page_setup().orientation, PageOrientation::Portrait);
}

#[test]
fn test_skip_only_is_bit_identical() {
    let input = fixture();
    let processed = process(
        Some(input.as_slice()),
        &entries(json!([
            {"sheet_name": "Sheet1", "print_area": "skip"},
            {"sheet_name": "Report", "print_area": "skip"}
        ])),
        &LayoutOptions::default(),
    )
    .unwrap();

    assert!(processed.application.report.is_empty());
    assert_eq!(processed.bytes, input);
}

#[test]
fn test_missing_sheets_only_is_bit_identical() {
    let input = fixture();
    let processed = process(
        Some(input.as_slice()),
        &entries(json!([{"sheet_name": "Nope", "print_area": "A1:B2"}])),
        &LayoutOptions::default(),
    )
    .unwrap();

    assert_eq!(processed.application.warnings.len(), 1);
    assert_eq!(processed.bytes, input);
}

#[test]
fn test_no_input_file() {
    let specs = entries(json!([{"sheet_name": "Sheet1", "print_area": "A1:B2"}]));
    assert!(matches!(
        process(None, &specs, &LayoutOptions::default()),
        Err(Error::NoInputFile)
    ));
    assert!(matches!(
        process(Some(&[][..]), &specs, &LayoutOptions::default()),
        Err(Error::NoInputFile)
    ));
}

#[test]
fn test_validation_runs_before_the_file_is_opened() {
    // Not a spreadsheet, but the spec list is rejected first
    let err = process(
        Some(&b"not a zip"[..]),
        &entries(json!([{"sheet_name": "Sheet1", "print_area": "A1-G66"}])),
        &LayoutOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::InvalidRangeFormat { .. })
    ));

    let err = process(Some(&b"not a zip"[..]), &[], &LayoutOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::EmptySpecList)
    ));
}

#[test]
fn test_unreadable_file() {
    let err = process(
        Some(&b"not a zip"[..]),
        &entries(json!([{"sheet_name": "Sheet1", "print_area": "A1:B2"}])),
        &LayoutOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Xlsx(_)));
}

#[test]
fn test_out_of_bounds_row_fails_at_serialization() {
    let err = process(
        Some(fixture().as_slice()),
        &entries(json!([{"sheet_name": "Sheet1", "print_area": "A1:B1048577"}])),
        &LayoutOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Xlsx(XlsxError::RowOutOfBounds(1_048_577))));
}

#[test]
fn test_uniform_specs_over_a_package() {
    let mut doc = XlsxReader::read_bytes(fixture()).unwrap();
    let specs = uniform_specs(doc.workbook(), 40, 5);
    let processed =
        pagefit::process_document(&mut doc, &specs, &LayoutOptions::default()).unwrap();

    assert_eq!(
        processed.application.report.to_json(),
        json!({"Sheet1": "A1:E40", "Report": "A1:E40"})
    );

    let doc = XlsxReader::read_bytes(processed.bytes).unwrap();
    for sheet in doc.workbook().worksheets() {
        assert_eq!(sheet.print_area(), Some("A1:E40"));
        assert_eq!(sheet.row_breaks().iter().collect::<Vec<_>>(), vec![40]);
    }
}

#[test]
fn test_uniform_print_areas_keep_page_layout() {
    let mut doc = XlsxReader::read_bytes(fixture()).unwrap();
    let before: Vec<PageSetup> =
        doc.workbook().worksheets().map(|s| s.page_setup().clone()).collect();
    let specs = uniform_specs(doc.workbook(), 40, 5);
    let processed = pagefit::process_print_areas(&mut doc, &specs).unwrap();

    assert_eq!(
        processed.application.report.to_json(),
        json!({"Sheet1": "A1:E40", "Report": "A1:E40"})
    );

    let doc = XlsxReader::read_bytes(processed.bytes).unwrap();
    let report = doc.workbook().worksheet_by_name("Report").unwrap();
    assert_eq!(report.print_area(), Some("A1:E40"));
    assert_eq!(report.row_breaks().iter().collect::<Vec<_>>(), vec![4]);
    assert_eq!(report.page_setup().orientation, PageOrientation::Landscape);

    let after: Vec<PageSetup> =
        doc.workbook().worksheets().map(|s| s.page_setup().clone()).collect();
    assert_eq!(after, before);
    assert!(doc.workbook().worksheet(0).unwrap().row_breaks().is_empty());
}

#[test]
fn test_landscape_letter_options() {
    let options = LayoutOptions {
        orientation: PageOrientation::Landscape,
        paper_size: PaperSize::LETTER,
        ..Default::default()
    };
    let specs = vec![PrintAreaSpec::new("Sheet1", "A1:C3").unwrap()];
    let processed = process_validated(fixture(), &specs, &options).unwrap();

    let doc = XlsxReader::read_bytes(processed.bytes).unwrap();
    let setup = doc.workbook().worksheet(0).unwrap().page_setup();
    assert_eq!(setup.orientation, PageOrientation::Landscape);
    assert_eq!(setup.paper_size, PaperSize::LETTER);
}

#[test]
fn test_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    let output = dir.path().join("updated_file.xlsx");
    std::fs::write(&input, fixture()).unwrap();

    let bytes = std::fs::read(&input).unwrap();
    let specs = pagefit::parse_specs(r#"[{"sheet_name": "Report", "print_area": "A1:F20"}]"#)
        .unwrap();
    let processed = process_validated(bytes, &specs, &LayoutOptions::default()).unwrap();
    std::fs::write(&output, &processed.bytes).unwrap();

    let doc = XlsxReader::read_file(&output).unwrap();
    assert_eq!(
        doc.workbook().worksheet_by_name("Report").unwrap().print_area(),
        Some("A1:F20")
    );
}
