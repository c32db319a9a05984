//! The same print area on every sheet

use crate::spec::{PrintArea, PrintAreaSpec};
use crate::{CellAddress, CellRange, Workbook};

/// `A1:<col><row>` specs for every sheet in `doc`, in tab order
///
/// `rows` and `cols` count from 1; zero is treated as 1.
///
/// ```rust
/// use pagefit::{uniform_specs, Workbook};
///
/// let specs = uniform_specs(&Workbook::new(), 66, 7);
/// assert_eq!(specs[0].print_area.as_str(), Some("A1:G66"));
/// ```
pub fn uniform_specs(doc: &Workbook, rows: u32, cols: u32) -> Vec<PrintAreaSpec> {
    let range = CellRange::new(
        CellAddress::new(1, 1),
        CellAddress::new(rows.max(1), cols.max(1)),
    );
    // Always two cells, so a 1x1 area still reads as a range
    let raw = format!("{}:{}", range.start, range.end);

    doc.sheet_names()
        .map(|name| PrintAreaSpec {
            sheet_name: name.to_string(),
            print_area: PrintArea::Ranges {
                raw: raw.clone(),
                ranges: vec![range],
            },
        })
        .collect()
}
