//! Foreign keys and their reduction to single-column references.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// One field name or an ordered list of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldList {
    One(String),
    Many(Vec<String>),
}

impl FieldList {
    /// Field names in order. An empty single name means no fields.
    pub fn names(&self) -> Vec<&str> {
        match self {
            FieldList::One(name) if name.is_empty() => Vec::new(),
            FieldList::One(name) => vec![name.as_str()],
            FieldList::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names().iter().position(|n| *n == name)
    }
}

impl Default for FieldList {
    fn default() -> Self {
        FieldList::Many(Vec::new())
    }
}

impl From<&str> for FieldList {
    fn from(name: &str) -> Self {
        FieldList::One(name.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for FieldList {
    fn from(names: [&str; N]) -> Self {
        FieldList::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Target of a foreign key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reference {
    /// Referenced resource. Absent or empty means the owning resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub fields: FieldList,
}

/// Foreign key of a Table Schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    pub fields: FieldList,
    pub reference: Reference,
}

/// Single-column reference obtained from a (possibly composite) foreign key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleForeignKey {
    /// Referenced table, or `None` when the key points back at its own table.
    pub table: Option<String>,
    pub column: String,
}

impl SimpleForeignKey {
    pub fn new(table: Option<&str>, column: &str) -> Self {
        Self {
            table: table.map(str::to_string),
            column: column.to_string(),
        }
    }

    /// Referenced table, resolving self-references to `own_table`.
    pub fn table_or<'a>(&'a self, own_table: &'a str) -> &'a str {
        self.table.as_deref().unwrap_or(own_table)
    }
}

impl ForeignKey {
    pub fn new(fields: impl Into<FieldList>, resource: Option<&str>, reference_fields: impl Into<FieldList>) -> Self {
        Self {
            fields: fields.into(),
            reference: Reference {
                resource: resource.map(str::to_string),
                fields: reference_fields.into(),
            },
        }
    }

    /// The referenced column paired with `column` of `table`, if this key
    /// involves that column.
    pub fn column_pair(&self, table: &str, column: &str) -> Result<Option<SimpleForeignKey>, SpecError> {
        let Some(i) = self.fields.position(column) else {
            return Ok(None);
        };
        let foreign_columns = self.reference.fields.names();
        let foreign_column = foreign_columns.get(i).ok_or_else(|| SpecError::ForeignKeyArity {
            table: table.to_string(),
            column: column.to_string(),
            local: self.fields.names().len(),
            foreign: foreign_columns.len(),
        })?;
        let foreign_table = self
            .reference
            .resource
            .as_deref()
            .filter(|r| !r.is_empty() && *r != table);
        Ok(Some(SimpleForeignKey::new(foreign_table, foreign_column)))
    }
}

/// Reduce foreign keys to the distinct single-column keys of one column.
///
/// Composite keys cannot be enforced by one spreadsheet rule, so each
/// contributes the reference field at the same position as `column`.
/// Order of first appearance is preserved.
pub fn reduce_foreign_keys(
    foreign_keys: &[ForeignKey],
    table: &str,
    column: &str,
) -> Result<Vec<SimpleForeignKey>, SpecError> {
    let mut keys: Vec<SimpleForeignKey> = Vec::new();
    for foreign_key in foreign_keys {
        if let Some(key) = foreign_key.column_pair(table, column)? {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    Ok(keys)
}
