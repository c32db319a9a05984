//! Layout application
//!
//! Applying a spec list is a fold over the specs in input order. Each step
//! either changes one sheet and records it in the report, does nothing
//! (`skip`), or records a warning for a sheet that does not exist. [`apply`]
//! sets the whole page layout; [`set_print_areas`] only the print area.

use crate::options::LayoutOptions;
use crate::report::{Application, ApplyWarning};
use crate::spec::{PrintArea, PrintAreaSpec};
use crate::{CellRange, SheetLayout, Workbook};

/// Apply validated specs to `doc` and report what changed
///
/// For every spec naming an existing sheet with a range list, the sheet gets
/// the page setup from `options` with fit-to-page on, its manual row breaks
/// are replaced by one break after the end row of each range, and its print
/// area becomes the range list as given. Nothing is bounds-checked here; a
/// row past the end of the sheet is rejected when the document is written.
///
/// # Example
///
/// ```rust
/// use pagefit::{apply, LayoutOptions, PrintAreaSpec, Workbook};
///
/// let mut workbook = Workbook::new();
/// let specs = vec![
///     PrintAreaSpec::new("Sheet1", "A1:G66").unwrap(),
///     PrintAreaSpec::new("Missing", "A1:B2").unwrap(),
/// ];
///
/// let application = apply(&mut workbook, &specs, &LayoutOptions::default());
/// assert_eq!(application.report.get("Sheet1"), Some("A1:G66"));
/// assert_eq!(application.warnings.len(), 1);
/// ```
pub fn apply(doc: &mut Workbook, specs: &[PrintAreaSpec], options: &LayoutOptions) -> Application {
    fold(doc, specs, |layout, ranges| {
        options.apply_to(&mut layout.page_setup);
        layout.row_breaks.clear();
        for range in ranges {
            layout.row_breaks.insert(range.end.row);
        }
    })
}

/// Set only the print area of each named sheet
///
/// Page setup, fit-to-page and row breaks stay as they are. Skips and
/// missing sheets are handled exactly as in [`apply`].
///
/// ```rust
/// use pagefit::{set_print_areas, PrintAreaSpec, Workbook};
///
/// let mut workbook = Workbook::new();
/// let specs = vec![PrintAreaSpec::new("Sheet1", "A1:G66").unwrap()];
///
/// let application = set_print_areas(&mut workbook, &specs);
/// let sheet = workbook.worksheet(0).unwrap();
/// assert_eq!(sheet.print_area(), Some("A1:G66"));
/// assert!(sheet.row_breaks().is_empty());
/// assert_eq!(application.report.get("Sheet1"), Some("A1:G66"));
/// ```
pub fn set_print_areas(doc: &mut Workbook, specs: &[PrintAreaSpec]) -> Application {
    fold(doc, specs, |_, _| {})
}

fn fold<F>(doc: &mut Workbook, specs: &[PrintAreaSpec], mut update: F) -> Application
where
    F: FnMut(&mut SheetLayout, &[CellRange]),
{
    specs
        .iter()
        .fold(Application::default(), |state, spec| step(doc, state, spec, &mut update))
}

fn step<F>(
    doc: &mut Workbook,
    mut state: Application,
    spec: &PrintAreaSpec,
    update: &mut F,
) -> Application
where
    F: FnMut(&mut SheetLayout, &[CellRange]),
{
    let Some(sheet) = doc.worksheet_by_name_mut(&spec.sheet_name) else {
        log::warn!("Sheet '{}' not found in workbook, skipping", spec.sheet_name);
        state.warnings.push(ApplyWarning::SheetNotFound {
            sheet_name: spec.sheet_name.clone(),
        });
        return state;
    };

    let PrintArea::Ranges { raw, ranges } = &spec.print_area else {
        log::debug!("Leaving sheet '{}' unchanged", spec.sheet_name);
        return state;
    };

    let layout = sheet.layout_mut();
    update(layout, ranges.as_slice());
    layout.print_area = Some(raw.clone());

    log::debug!(
        "Applied print area '{}' to sheet '{}' ({} row breaks)",
        raw,
        spec.sheet_name,
        layout.row_breaks.len()
    );
    state.report.record(spec.sheet_name.as_str(), raw.as_str());
    state
}

/// Extension trait for Workbook to apply print-area specs
pub trait WorkbookLayoutExt {
    /// Apply specs with the default layout policy
    fn apply_print_areas(&mut self, specs: &[PrintAreaSpec]) -> Application;

    /// Apply specs with a custom layout policy
    fn apply_print_areas_with_options(
        &mut self,
        specs: &[PrintAreaSpec],
        options: &LayoutOptions,
    ) -> Application;
}

impl WorkbookLayoutExt for Workbook {
    fn apply_print_areas(&mut self, specs: &[PrintAreaSpec]) -> Application {
        self.apply_print_areas_with_options(specs, &LayoutOptions::default())
    }

    fn apply_print_areas_with_options(
        &mut self,
        specs: &[PrintAreaSpec],
        options: &LayoutOptions,
    ) -> Application {
        apply(self, specs, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PageOrientation, PaperSize};
    use pretty_assertions::assert_eq;

    fn spec(sheet: &str, area: &str) -> PrintAreaSpec {
        PrintAreaSpec::new(sheet, area).unwrap()
    }

    #[test]
    fn test_replaces_existing_breaks() {
        let mut wb = Workbook::new();
        wb.worksheet_mut(0).unwrap().row_breaks_mut().insert(5);

        wb.apply_print_areas(&[spec("Sheet1", "A1:B10,A11:B20")]);

        let breaks: Vec<u32> = wb.worksheet(0).unwrap().row_breaks().iter().collect();
        assert_eq!(breaks, vec![10, 20]);
    }

    #[test]
    fn test_duplicate_end_rows_collapse() {
        let mut wb = Workbook::new();
        wb.apply_print_areas(&[spec("Sheet1", "A1:B10,C1:D10")]);
        assert_eq!(wb.worksheet(0).unwrap().row_breaks().len(), 1);
    }

    #[test]
    fn test_reapplying_is_idempotent() {
        let mut wb = Workbook::new();
        let specs = [spec("Sheet1", "A1:E36,A37:E53")];

        let first = wb.apply_print_areas(&specs);
        let after_first = wb.worksheet(0).unwrap().layout().clone();
        let second = wb.apply_print_areas(&specs);

        assert_eq!(first, second);
        assert_eq!(wb.worksheet(0).unwrap().layout(), &after_first);
    }

    #[test]
    fn test_skip_and_missing_leave_state_alone() {
        let mut wb = Workbook::new();
        let before = wb.worksheet(0).unwrap().layout().clone();

        let application = wb.apply_print_areas(&[
            PrintAreaSpec::skip("Sheet1"),
            spec("Nope", "A1:B2"),
            PrintAreaSpec::skip("Also missing"),
        ]);

        assert_eq!(wb.worksheet(0).unwrap().layout(), &before);
        assert!(application.report.is_empty());
        assert_eq!(
            application.warnings,
            vec![
                ApplyWarning::SheetNotFound {
                    sheet_name: "Nope".into()
                },
                ApplyWarning::SheetNotFound {
                    sheet_name: "Also missing".into()
                },
            ]
        );
    }

    #[test]
    fn test_sheet_names_match_exactly() {
        let mut wb = Workbook::new();
        let application = wb.apply_print_areas(&[spec("sheet1", "A1:B2")]);
        assert_eq!(application.warnings.len(), 1);
        assert_eq!(wb.worksheet(0).unwrap().layout(), &SheetLayout::default());
    }

    #[test]
    fn test_custom_options() {
        let mut wb = Workbook::new();
        let options = LayoutOptions {
            orientation: PageOrientation::Landscape,
            paper_size: PaperSize::LETTER,
            fit_to_height: 3,
            ..Default::default()
        };

        wb.apply_print_areas_with_options(&[spec("Sheet1", "A1:B2")], &options);

        let setup = wb.worksheet(0).unwrap().page_setup();
        assert_eq!(setup.orientation, PageOrientation::Landscape);
        assert_eq!(setup.paper_size, PaperSize::LETTER);
        assert_eq!(setup.fit_to_width, 1);
        assert_eq!(setup.fit_to_height, 3);
        assert!(setup.fit_to_page);
    }

    #[test]
    fn test_print_area_only_keeps_page_layout() {
        let mut wb = Workbook::new();
        {
            let sheet = wb.worksheet_mut(0).unwrap();
            sheet.page_setup_mut().orientation = PageOrientation::Landscape;
            sheet.row_breaks_mut().insert(5);
        }
        let before = wb.worksheet(0).unwrap().layout().clone();

        let application = set_print_areas(
            &mut wb,
            &[spec("Sheet1", "A1:B10,A11:B20"), spec("Nope", "A1:B2")],
        );

        let layout = wb.worksheet(0).unwrap().layout();
        assert_eq!(layout.print_area.as_deref(), Some("A1:B10,A11:B20"));
        assert_eq!(layout.page_setup, before.page_setup);
        assert_eq!(layout.row_breaks, before.row_breaks);
        assert_eq!(application.report.get("Sheet1"), Some("A1:B10,A11:B20"));
        assert_eq!(application.warnings.len(), 1);
    }
}
