//! Prelude module - common imports for pagefit users
//!
//! ```rust
//! use pagefit::prelude::*;
//! ```

pub use crate::{
    apply,
    parse_specs,
    set_print_areas,
    validate,
    Application,
    ApplicationReport,
    ApplyWarning,
    LayoutOptions,
    PageOrientation,
    PaperSize,
    PrintArea,
    PrintAreaSpec,
    ValidationError,
    // Main types
    Workbook,
    WorkbookLayoutExt,
    Worksheet,
    // I/O types
    XlsxDocument,
    XlsxReader,
    XlsxWriter,
};
