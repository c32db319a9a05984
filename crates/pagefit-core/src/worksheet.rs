//! Worksheet type

use crate::page_setup::{PageSetup, RowBreaks};

/// Everything about a sheet that affects how it prints
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetLayout {
    /// Print area as a comma-separated range list (e.g. "A1:E36,A37:E53")
    pub print_area: Option<String>,
    /// Page setup
    pub page_setup: PageSetup,
    /// Manual row page breaks
    pub row_breaks: RowBreaks,
}

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Print settings
    layout: SheetLayout,
}

impl Worksheet {
    /// Create a new worksheet with the given name and default layout
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_layout(name, SheetLayout::default())
    }

    /// Create a worksheet with an existing layout
    pub fn with_layout<S: Into<String>>(name: S, layout: SheetLayout) -> Self {
        Self {
            name: name.into(),
            layout,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the whole print layout
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Get the whole print layout mutably
    pub fn layout_mut(&mut self) -> &mut SheetLayout {
        &mut self.layout
    }

    /// Get the print area
    pub fn print_area(&self) -> Option<&str> {
        self.layout.print_area.as_deref()
    }

    /// Set or clear the print area
    pub fn set_print_area(&mut self, print_area: Option<String>) {
        self.layout.print_area = print_area;
    }

    /// Get the page setup
    pub fn page_setup(&self) -> &PageSetup {
        &self.layout.page_setup
    }

    /// Get the page setup mutably
    pub fn page_setup_mut(&mut self) -> &mut PageSetup {
        &mut self.layout.page_setup
    }

    /// Get the manual row breaks
    pub fn row_breaks(&self) -> &RowBreaks {
        &self.layout.row_breaks
    }

    /// Get the manual row breaks mutably
    pub fn row_breaks_mut(&mut self) -> &mut RowBreaks {
        &mut self.layout.row_breaks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_setup::PageOrientation;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("Test");
        assert_eq!(ws.name(), "Test");
        assert_eq!(ws.print_area(), None);
        assert!(ws.row_breaks().is_empty());
        assert_eq!(ws.layout(), &SheetLayout::default());
    }

    #[test]
    fn test_layout_changes_are_visible() {
        let mut ws = Worksheet::new("Test");
        let before = ws.layout().clone();

        ws.set_print_area(Some("A1:B2".into()));
        ws.page_setup_mut().orientation = PageOrientation::Landscape;
        ws.row_breaks_mut().insert(2);

        assert_ne!(ws.layout(), &before);
        assert_eq!(ws.print_area(), Some("A1:B2"));
        assert!(ws.row_breaks().contains(2));
    }
}
