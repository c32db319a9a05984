//! Layout policy applied to every non-skipped sheet

use serde::{Deserialize, Serialize};

use crate::{PageOrientation, PageSetup, PaperSize};

/// Page setup written to each sheet that receives a print area
///
/// The default is portrait A4, one page wide with unbounded height, at 100%:
/// columns are never clipped while rows may run over as many pages as needed.
///
/// ```rust
/// use pagefit::{LayoutOptions, PageOrientation};
///
/// let options: LayoutOptions = serde_json::from_str(r#"{"orientation": "landscape"}"#).unwrap();
/// assert_eq!(options.orientation, PageOrientation::Landscape);
/// assert_eq!(options.fit_to_width, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOptions {
    /// Page orientation (default: portrait)
    pub orientation: PageOrientation,
    /// Paper size, by name or `ST_PaperSize` code (default: A4)
    pub paper_size: PaperSize,
    /// Pages wide (default: 1)
    pub fit_to_width: u32,
    /// Pages tall, 0 for unbounded (default: 0)
    pub fit_to_height: u32,
    /// Scale percentage (default: 100)
    pub scale: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            orientation: PageOrientation::Portrait,
            paper_size: PaperSize::A4,
            fit_to_width: 1,
            fit_to_height: 0,
            scale: 100,
        }
    }
}

impl LayoutOptions {
    /// Write this policy onto `setup`, switching fit-to-page on
    pub fn apply_to(&self, setup: &mut PageSetup) {
        setup.orientation = self.orientation;
        setup.paper_size = self.paper_size;
        setup.fit_to_width = self.fit_to_width;
        setup.fit_to_height = self.fit_to_height;
        setup.scale = self.scale;
        setup.fit_to_page = true;
    }
}
