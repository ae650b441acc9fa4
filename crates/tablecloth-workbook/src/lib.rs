//! Data-entry template writers.
//!
//! [`TemplatePlan::build`] lays out a package for a [`Backend`] and resolves
//! every column's data validation and conditional format. A
//! [`TemplateWriter`] then renders the plan: [`XlsxWriter`] as an Excel
//! workbook, [`SheetsWriter`] as a Google Sheets `batchUpdate` request.

pub mod backends;
pub mod error;
pub mod options;
pub mod plan;
pub mod writer;

#[cfg(feature = "gsheets")]
pub use backends::{BatchUpdate, SheetsWriter};
#[cfg(feature = "xlsx")]
pub use backends::XlsxWriter;
pub use error::WriteError;
pub use options::{
    Backend, BackendProfile, EXCEL, ErrorType, GOOGLE_SHEETS, HexColor, TemplateOptions,
};
pub use plan::{ColumnPlan, EnumColumn, EnumSheetPlan, SheetPlan, Style, TemplatePlan, Validation};
pub use writer::TemplateWriter;

// Re-export for convenience
pub use tablecloth_spec::Package;
