pub mod check;
pub mod coord;
pub mod formula;
pub mod range;
pub mod value;

pub use check::{Check, FIRST_DATA_ROW, build_column_condition, build_column_validation};
pub use coord::{
    CoordError, column_code_to_index, column_index_to_code, row_code_to_index, row_index_to_code,
};
pub use formula::{Operator, merge_conditions, merge_formulas, readable_join, render_template};
pub use range::ColumnRange;
pub use value::{Scalar, ValueError, format_bool};

#[cfg(feature = "json")]
pub use value::format_value;
