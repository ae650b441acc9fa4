use tablecloth_spec::SpecError;
use thiserror::Error;

/// Errors raised by the layout engine.
///
/// Registration errors are raised before any state changes, so a failed
/// call leaves the layout as it was.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("table '{0}' already exists")]
    DuplicateTable(String),

    #[error("sheet '{0}' already exists")]
    DuplicateSheet(String),

    #[error("sheet name '{sheet}' is longer than {max} characters")]
    SheetNameTooLong { sheet: String, max: usize },

    #[error("column '{column}' appears more than once in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("enum with values [{0}] not found")]
    EnumNotFound(String),

    #[error("enum has no values")]
    EmptyEnum,

    #[error(transparent)]
    Spec(#[from] SpecError),
}
