use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or interpreting a package descriptor.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML descriptor: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),

    /// A foreign key references fewer fields than it declares locally.
    #[error(
        "foreign key on table '{table}' maps {local} field(s) to {foreign} reference field(s); \
         column '{column}' has no counterpart"
    )]
    ForeignKeyArity {
        table: String,
        column: String,
        local: usize,
        foreign: usize,
    },
}
