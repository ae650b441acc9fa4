#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "xlsx")]
pub use xlsx::XlsxWriter;

#[cfg(feature = "gsheets")]
pub mod gsheets;

#[cfg(feature = "gsheets")]
pub use gsheets::{BatchUpdate, SheetsWriter};
