//! Layout and formula-synthesis engine.
//!
//! A [`Layout`] places each table on its own sheet (header in row 1, data
//! from row 2) and each enum as a column of a shared lists sheet. Per column
//! it then picks a dropdown and gathers boolean checks from a static
//! template catalog, ready to be merged into data validation and
//! conditional formatting formulas.

mod checks;
pub mod diagnostics;
pub mod dropdown;
pub mod error;
pub mod layout;
pub mod templates;

pub use diagnostics::Diagnostic;
pub use dropdown::{Dropdown, DropdownOptions, DropdownSource};
pub use error::LayoutError;
pub use layout::{
    ColumnRules, DEFAULT_ENUM_SHEET, Enum, EnumRegistration, Layout, LayoutConfig, RangeOptions,
    Table,
};
pub use templates::CheckTemplate;

// Re-export for convenience
pub use tablecloth_common::Check;
