use std::path::PathBuf;

use tablecloth_layout::LayoutError;
use tablecloth_spec::SpecError;
use thiserror::Error;

use crate::options::{Backend, ErrorType};

/// Errors raised while planning or writing a template.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[cfg(feature = "xlsx")]
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid options: {0}")]
    Options(#[from] serde_yaml::Error),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error type '{error_type}' is not supported by {backend}")]
    UnsupportedErrorType {
        error_type: ErrorType,
        backend: &'static str,
    },

    #[error("plan targets {found}, not {expected}")]
    BackendMismatch { expected: Backend, found: Backend },

    #[error("invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    #[error("table '{table}' has {ncols} columns, more than the {max} allowed by {backend}")]
    TooManyColumns {
        table: String,
        ncols: usize,
        max: usize,
        backend: &'static str,
    },
}
