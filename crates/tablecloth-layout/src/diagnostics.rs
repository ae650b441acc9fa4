use core::fmt;

use serde::Serialize;

/// Non-fatal findings reported alongside successful layout operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Enum values that spreadsheet engines may read as a formula (`+`, `=`)
    /// or an escaped literal (`'`) when written verbatim.
    SuspiciousEnumValue { values: Vec<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SuspiciousEnumValue { values } => write!(
                f,
                "enum values start with +, =, or ' [{}]; expect unexpected behavior",
                values.join(", ")
            ),
        }
    }
}
