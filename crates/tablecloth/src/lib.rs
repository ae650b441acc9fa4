//! Meta crate that re-exports the Tablecloth layers: the descriptor model,
//! the layout and formula-synthesis engine, and the template writers.
//! Writers are opt-in via the `xlsx` and `gsheets` features.
//!
//! ```no_run
//! use tablecloth::{Package, TemplateOptions};
//!
//! let package = Package::from_path("datapackage.yaml")?;
//! tablecloth::write_excel(&package, &TemplateOptions::default(), "template.xlsx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use tablecloth_common as common;
pub use tablecloth_layout as layout;
pub use tablecloth_spec as spec;
pub use tablecloth_workbook as workbook;

pub use tablecloth_layout::{Diagnostic, Layout, LayoutConfig, LayoutError};
pub use tablecloth_spec::{Package, SpecError};
pub use tablecloth_workbook::{
    Backend, ErrorType, TemplateOptions, TemplatePlan, TemplateWriter, WriteError,
};

#[cfg(feature = "gsheets")]
pub use tablecloth_workbook::{BatchUpdate, SheetsWriter};
#[cfg(feature = "xlsx")]
pub use tablecloth_workbook::XlsxWriter;

/// Write an Excel template for a package.
#[cfg(feature = "xlsx")]
pub fn write_excel(
    package: &Package,
    options: &TemplateOptions,
    path: impl AsRef<std::path::Path>,
) -> Result<(), WriteError> {
    let plan = TemplatePlan::build(package, options, Backend::Excel)?;
    XlsxWriter.save(&plan, path)
}

/// Build the Google Sheets `batchUpdate` requests for a package.
#[cfg(feature = "gsheets")]
pub fn sheets_requests(
    package: &Package,
    options: &TemplateOptions,
) -> Result<BatchUpdate, WriteError> {
    SheetsWriter.write_package(package, options)
}
