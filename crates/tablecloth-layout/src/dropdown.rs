//! Dropdown selection for a column's data validation.

use serde::Serialize;
use tablecloth_common::format_bool;
use tablecloth_spec::{FieldType, reduce_foreign_keys};

use crate::error::LayoutError;
use crate::layout::{ColumnRules, Layout, RangeOptions};

/// Where a dropdown's values come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropdownSource {
    Boolean,
    ForeignKey,
    Enum,
}

/// Dropdown values: a literal list or a cell range holding them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DropdownOptions {
    List(Vec<String>),
    Range(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    pub source: DropdownSource,
    pub options: DropdownOptions,
}

impl Dropdown {
    pub fn range(&self) -> Option<&str> {
        match &self.options {
            DropdownOptions::Range(range) => Some(range),
            DropdownOptions::List(_) => None,
        }
    }
}

impl Layout {
    /// Pick the dropdown, if any, for a column.
    ///
    /// Boolean columns always get `TRUE`/`FALSE`. Otherwise the first foreign
    /// key involving the column wins, and an `enum` constraint comes last.
    /// Foreign tables and enum lists must already be registered.
    pub fn select_column_dropdown(
        &self,
        table: &str,
        column: &str,
        rules: &ColumnRules<'_>,
        indirect: bool,
    ) -> Result<Option<Dropdown>, LayoutError> {
        if matches!(rules.field_type, Some(FieldType::Boolean)) {
            return Ok(Some(Dropdown {
                source: DropdownSource::Boolean,
                options: DropdownOptions::List(vec![
                    format_bool(true).to_string(),
                    format_bool(false).to_string(),
                ]),
            }));
        }
        let keys = reduce_foreign_keys(rules.foreign_keys, table, column)?;
        if let Some(key) = keys.first() {
            let range = self.column_range(
                key.table_or(table),
                &key.column,
                RangeOptions {
                    absolute: key.table.is_some(),
                    fixed: true,
                    indirect,
                    ..RangeOptions::default()
                },
            )?;
            return Ok(Some(Dropdown {
                source: DropdownSource::ForeignKey,
                options: DropdownOptions::Range(range),
            }));
        }
        if let Some(values) = rules.constraints.and_then(|c| c.enum_values()) {
            return Ok(Some(Dropdown {
                source: DropdownSource::Enum,
                options: DropdownOptions::Range(self.enum_range(values, indirect)?),
            }));
        }
        Ok(None)
    }
}
