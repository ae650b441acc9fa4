//! Backend-agnostic template plan.
//!
//! A [`TemplatePlan`] resolves everything a writer needs (sheet order,
//! header cells, and per column the data validation rule and conditional
//! format formula) so that the writers only translate it to their output
//! format.

use serde::Serialize;
use tablecloth_common::{FIRST_DATA_ROW, Scalar, build_column_condition, build_column_validation};
use tablecloth_layout::{
    ColumnRules, Diagnostic, DropdownOptions, DropdownSource, Layout, RangeOptions,
};
use tablecloth_spec::{Package, Resource};

use crate::error::WriteError;
use crate::options::{Backend, ErrorType, HexColor, TemplateOptions};

/// Title of every data validation error alert.
pub const ERROR_TITLE: &str = "Invalid value";
/// Message shown for values outside a dropdown list.
pub const DROPDOWN_MESSAGE: &str = "Value must be in the dropdown list";

#[derive(Clone, Debug, Serialize)]
pub struct TemplatePlan {
    pub backend: Backend,
    pub style: Style,
    pub sheets: Vec<SheetPlan>,
    /// Hidden sheet of enum lists, when any column refers to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_sheet: Option<EnumSheetPlan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Style {
    pub header_fill: Option<HexColor>,
    pub header_bold: bool,
    pub invalid_fill: Option<HexColor>,
}

/// One table sheet.
#[derive(Clone, Debug, Serialize)]
pub struct SheetPlan {
    pub table: String,
    pub sheet: String,
    pub freeze_header: bool,
    /// Hide every column right of the table.
    pub hide_columns: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_height: Option<f64>,
    pub columns: Vec<ColumnPlan>,
}

/// Header cell and rules of one column.
#[derive(Clone, Debug, Serialize)]
pub struct ColumnPlan {
    /// Column name, written as the header.
    pub column: String,
    /// Zero-based column index.
    pub index: u32,
    pub code: String,
    /// Data cells the rules apply to.
    pub cells: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    /// Formula that is `TRUE` for invalid cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Data validation rule of a column.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validation {
    Dropdown {
        source: DropdownSource,
        options: DropdownOptions,
        error_type: Option<ErrorType>,
        /// Whether invalid input raises an alert.
        show_error: bool,
    },
    Custom {
        formula: String,
        message: String,
        ignore_blank: bool,
        error_type: ErrorType,
    },
}

impl Validation {
    pub fn error_type(&self) -> Option<ErrorType> {
        match self {
            Validation::Dropdown { error_type, .. } => *error_type,
            Validation::Custom { error_type, .. } => Some(*error_type),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumSheetPlan {
    pub sheet: String,
    pub columns: Vec<EnumColumn>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumColumn {
    /// Zero-based column index on the enum sheet.
    pub col: u32,
    pub values: Vec<Scalar>,
}

impl TemplatePlan {
    pub fn build(
        package: &Package,
        options: &TemplateOptions,
        backend: Backend,
    ) -> Result<Self, WriteError> {
        let profile = backend.profile();
        if let Some(error_type) = options.error_type {
            if !profile.error_types.contains(&error_type) {
                return Err(WriteError::UnsupportedErrorType {
                    error_type,
                    backend: profile.name,
                });
            }
        }
        let (layout, diagnostics) =
            Layout::from_package(package, backend.layout_config(&options.enum_sheet))?;

        let mut sheets = Vec::with_capacity(package.resources.len());
        for resource in &package.resources {
            let ncols = resource.schema.fields.len();
            if ncols > profile.max_cols {
                return Err(WriteError::TooManyColumns {
                    table: resource.name.clone(),
                    ncols,
                    max: profile.max_cols,
                    backend: profile.name,
                });
            }
            sheets.push(plan_sheet(&layout, resource, options, backend)?);
        }

        let uses_enums =
            options.dropdowns || options.error_type.is_some() || options.invalid_fill.is_some();
        let enum_sheet = (uses_enums && !layout.enums().is_empty()).then(|| EnumSheetPlan {
            sheet: layout.enum_sheet().to_string(),
            columns: layout
                .enums()
                .iter()
                .map(|e| EnumColumn {
                    col: e.col,
                    values: e.values.clone(),
                })
                .collect(),
        });

        Ok(Self {
            backend,
            style: Style {
                header_fill: options.header_fill,
                header_bold: options.header_bold,
                invalid_fill: options.invalid_fill,
            },
            sheets,
            enum_sheet,
            diagnostics,
        })
    }

    pub fn to_yaml(&self) -> Result<String, WriteError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, WriteError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn header_comments(resource: &Resource, options: &TemplateOptions) -> Vec<Option<String>> {
    let explicit = options.header_comments.get(&resource.name);
    resource
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| match explicit {
            Some(comments) => comments.get(i).cloned().flatten(),
            None if options.describe_headers => field.description.clone(),
            None => None,
        })
        .map(|comment| comment.filter(|c| !c.is_empty()))
        .collect()
}

fn plan_sheet(
    layout: &Layout,
    resource: &Resource,
    options: &TemplateOptions,
    backend: Backend,
) -> Result<SheetPlan, WriteError> {
    let table = resource.name.as_str();
    let sheet = layout.table(table)?.sheet.clone();
    let comments = header_comments(resource, options);
    let widths = options.column_widths.get(table);
    let foreign_keys = &resource.schema.foreign_keys;

    let mut columns = Vec::with_capacity(resource.schema.fields.len());
    for (i, (field, comment)) in resource.schema.fields.iter().zip(comments).enumerate() {
        let column = field.name.as_str();
        let rules = ColumnRules::for_field(field, foreign_keys);
        let check_rules = if options.validate_foreign_keys {
            rules
        } else {
            rules.without_foreign_keys()
        };
        let code = layout.column_code(table, column)?;

        let mut validation = None;
        if options.dropdowns {
            if let Some(dropdown) = layout.select_column_dropdown(table, column, &rules, false)? {
                let show_error = options.error_type.is_some()
                    && (dropdown.source != DropdownSource::ForeignKey
                        || options.validate_foreign_keys);
                validation = Some(Validation::Dropdown {
                    source: dropdown.source,
                    options: dropdown.options,
                    error_type: options.error_type,
                    show_error,
                });
            }
        }
        if let (None, Some(error_type)) = (&validation, options.error_type) {
            let checks = layout.gather_column_checks(table, column, true, &check_rules, false)?;
            validation = build_column_validation(&checks).map(|check| Validation::Custom {
                formula: check.formula,
                message: check.message,
                ignore_blank: check.ignore_blank,
                error_type,
            });
        }

        let mut condition = None;
        if options.invalid_fill.is_some() {
            let indirect = backend.profile().indirect_conditions;
            let checks =
                layout.gather_column_checks(table, column, false, &check_rules, indirect)?;
            condition = build_column_condition(&checks, false, &code, FIRST_DATA_ROW);
        }

        let width = widths
            .and_then(|w| w.get(i).copied().flatten())
            .unwrap_or_else(|| backend.column_width(column));

        columns.push(ColumnPlan {
            column: column.to_string(),
            index: layout.column_index(table, column)?,
            cells: layout.column_range(table, column, RangeOptions::default())?,
            code,
            width,
            comment,
            validation,
            condition,
        });
    }

    // Excel cannot hide columns that a header note overlaps.
    let has_comments = columns.iter().any(|c| c.comment.is_some());
    let hide_columns = options.hide_columns && !(backend == Backend::Excel && has_comments);

    #[cfg(feature = "tracing")]
    tracing::debug!(table, sheet = %sheet, ncols = columns.len(), "planned sheet");

    Ok(SheetPlan {
        table: table.to_string(),
        sheet,
        freeze_header: options.freeze_header,
        hide_columns,
        header_height: options.header_height,
        columns,
    })
}
