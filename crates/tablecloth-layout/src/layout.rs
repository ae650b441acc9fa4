//! Placement of tables and enum lists on a spreadsheet grid.

use serde::Serialize;
use tablecloth_common::{ColumnRange, Scalar, column_index_to_code};
use tablecloth_spec::{Constraints, Field, FieldType, ForeignKey, Package};

use crate::diagnostics::Diagnostic;
use crate::error::LayoutError;

/// Default name of the sheet holding enum lists.
pub const DEFAULT_ENUM_SHEET: &str = "lists";

/// Layout settings, usually taken from a backend profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Sheet that stores enum value lists.
    pub enum_sheet: String,
    /// Maximum rows per sheet. Column ranges are unbounded (`A2:A`) when unset.
    pub max_rows: Option<u32>,
    /// Maximum sheet name length, in characters.
    pub max_name_length: Option<usize>,
    /// Whether the target engine evaluates `REGEXMATCH`, so `pattern`
    /// constraints can be checked.
    pub regex: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            enum_sheet: DEFAULT_ENUM_SHEET.to_string(),
            max_rows: None,
            max_name_length: None,
            regex: true,
        }
    }
}

/// A table placed on its own sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Table {
    pub sheet: String,
    pub table: String,
    /// Column names, left to right.
    pub columns: Vec<String>,
}

/// Enum values stored as one column of the enum sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Enum {
    pub values: Vec<Scalar>,
    /// Zero-based column on the enum sheet.
    pub col: u32,
}

/// Outcome of [`Layout::register_enum`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumRegistration {
    pub col: u32,
    /// `false` when identical values were already registered.
    pub created: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Options for [`Layout::column_range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Rows to include. Defaults to every row up to the configured maximum.
    pub nrows: Option<u32>,
    /// Qualify the range with its sheet name.
    pub absolute: bool,
    /// Anchor the range with `$`.
    pub fixed: bool,
    /// Wrap a sheet-qualified range in `INDIRECT`.
    pub indirect: bool,
}

/// Column metadata that drives dropdowns and checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColumnRules<'a> {
    pub field_type: Option<&'a FieldType>,
    pub constraints: Option<&'a Constraints>,
    /// Foreign keys of the owning table.
    pub foreign_keys: &'a [ForeignKey],
}

impl<'a> ColumnRules<'a> {
    pub fn for_field(field: &'a Field, foreign_keys: &'a [ForeignKey]) -> Self {
        Self {
            field_type: Some(&field.field_type),
            constraints: Some(&field.constraints),
            foreign_keys,
        }
    }

    /// Same rules with the foreign keys dropped.
    pub fn without_foreign_keys(self) -> Self {
        Self {
            foreign_keys: &[],
            ..self
        }
    }
}

/// Tabular spreadsheet layout.
///
/// Populate with [`register_table`](Layout::register_table) and
/// [`register_enum`](Layout::register_enum) (or [`Layout::from_package`]),
/// then query. Registered tables and enums are never removed.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    tables: Vec<Table>,
    enums: Vec<Enum>,
    config: LayoutConfig,
}

impl Layout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            tables: Vec::new(),
            enums: Vec::new(),
            config,
        }
    }

    /// Register every resource of a package as a table and every `enum`
    /// constraint as an enum.
    pub fn from_package(
        package: &Package,
        config: LayoutConfig,
    ) -> Result<(Self, Vec<Diagnostic>), LayoutError> {
        let mut layout = Self::new(config);
        let mut diagnostics = Vec::new();
        for resource in &package.resources {
            layout.register_table(&resource.name, &resource.column_names(), None)?;
            for field in &resource.schema.fields {
                if let Some(values) = field.constraints.enum_values() {
                    diagnostics.extend(layout.register_enum(values)?.diagnostics);
                }
            }
        }
        Ok((layout, diagnostics))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn enum_sheet(&self) -> &str {
        &self.config.enum_sheet
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn enums(&self) -> &[Enum] {
        &self.enums
    }

    /// Add a table on a new sheet (named after the table unless `sheet` is
    /// given).
    pub fn register_table<S: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[S],
        sheet: Option<&str>,
    ) -> Result<&Table, LayoutError> {
        let sheet = sheet.filter(|s| !s.is_empty()).unwrap_or(table);
        if self.tables.iter().any(|t| t.table == table) {
            return Err(LayoutError::DuplicateTable(table.to_string()));
        }
        if sheet == self.config.enum_sheet || self.tables.iter().any(|t| t.sheet == sheet) {
            return Err(LayoutError::DuplicateSheet(sheet.to_string()));
        }
        if let Some(max) = self.config.max_name_length.filter(|m| *m > 0) {
            if sheet.chars().count() > max {
                return Err(LayoutError::SheetNameTooLong {
                    sheet: sheet.to_string(),
                    max,
                });
            }
        }
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        if let Some((_, column)) = columns
            .iter()
            .enumerate()
            .find(|(i, c)| columns[..*i].contains(c))
        {
            return Err(LayoutError::DuplicateColumn {
                table: table.to_string(),
                column: column.clone(),
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(table, sheet, ncols = columns.len(), "registered table");
        self.tables.push(Table {
            sheet: sheet.to_string(),
            table: table.to_string(),
            columns,
        });
        Ok(&self.tables[self.tables.len() - 1])
    }

    pub fn table(&self, table: &str) -> Result<&Table, LayoutError> {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .ok_or_else(|| LayoutError::TableNotFound(table.to_string()))
    }

    /// Add an enum to the enum sheet, unless identical values already are.
    ///
    /// Values that a spreadsheet engine might misread are reported as
    /// diagnostics but do not block registration.
    pub fn register_enum(&mut self, values: &[Scalar]) -> Result<EnumRegistration, LayoutError> {
        if values.is_empty() {
            return Err(LayoutError::EmptyEnum);
        }
        let mut diagnostics = Vec::new();
        let suspicious: Vec<String> = values
            .iter()
            .filter(|v| v.looks_like_formula())
            .map(ToString::to_string)
            .collect();
        if !suspicious.is_empty() {
            let diagnostic = Diagnostic::SuspiciousEnumValue { values: suspicious };
            #[cfg(feature = "tracing")]
            tracing::warn!("{diagnostic}");
            diagnostics.push(diagnostic);
        }
        if let Some(existing) = self.enums.iter().find(|e| e.values == values) {
            return Ok(EnumRegistration {
                col: existing.col,
                created: false,
                diagnostics,
            });
        }
        let col = self.enums.iter().map(|e| e.col + 1).max().unwrap_or(0);
        #[cfg(feature = "tracing")]
        tracing::debug!(col, nvalues = values.len(), "registered enum");
        self.enums.push(Enum {
            values: values.to_vec(),
            col,
        });
        Ok(EnumRegistration {
            col,
            created: true,
            diagnostics,
        })
    }

    /// Enum with exactly these values, in this order.
    pub fn enum_for(&self, values: &[Scalar]) -> Result<&Enum, LayoutError> {
        self.enums.iter().find(|e| e.values == values).ok_or_else(|| {
            let listed: Vec<String> = values.iter().map(Scalar::to_formula).collect();
            LayoutError::EnumNotFound(listed.join(", "))
        })
    }

    /// Fixed, sheet-qualified range of an enum's values.
    pub fn enum_range(&self, values: &[Scalar], indirect: bool) -> Result<String, LayoutError> {
        let e = self.enum_for(values)?;
        let nrows = u32::try_from(e.values.len()).unwrap_or(u32::MAX);
        Ok(ColumnRange::new(e.col, 0)
            .rows(nrows)
            .fixed(true)
            .sheet(&self.config.enum_sheet)
            .indirect(indirect)
            .to_string())
    }

    /// Zero-based index of a column within its table.
    pub fn column_index(&self, table: &str, column: &str) -> Result<u32, LayoutError> {
        let t = self.table(table)?;
        t.columns
            .iter()
            .position(|c| c == column)
            .map(|i| i as u32)
            .ok_or_else(|| LayoutError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    /// Column code (`A`, `B`, ...) of a column.
    pub fn column_code(&self, table: &str, column: &str) -> Result<String, LayoutError> {
        Ok(column_index_to_code(self.column_index(table, column)?))
    }

    /// Range of a column's data cells, below the header.
    pub fn column_range(
        &self,
        table: &str,
        column: &str,
        options: RangeOptions,
    ) -> Result<String, LayoutError> {
        let col = self.column_index(table, column)?;
        let t = self.table(table)?;
        let nrows = options.nrows.filter(|n| *n > 0).or(self.default_nrows());
        let sheet = options.absolute.then_some(t.sheet.as_str());
        Ok(ColumnRange::new(col, 1)
            .rows_opt(nrows)
            .fixed(options.fixed)
            .sheet_opt(sheet)
            .indirect(options.indirect)
            .to_string())
    }

    /// Data rows below the header when the sheet height is bounded.
    fn default_nrows(&self) -> Option<u32> {
        self.config.max_rows.filter(|m| *m > 0).map(|m| m - 1)
    }

    /// `$N` for the last row when bounded, otherwise empty.
    pub(crate) fn max_row_code(&self) -> String {
        match self.config.max_rows.filter(|m| *m > 0) {
            Some(max) => format!("${max}"),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Scalar> {
        values.iter().copied().map(Scalar::Int).collect()
    }

    #[test]
    fn gets_a_column_code() {
        let mut layout = Layout::default();
        layout.register_table("a", &["x", "y"], None).unwrap();
        assert_eq!(layout.column_code("a", "x").unwrap(), "A");
        assert_eq!(layout.column_code("a", "y").unwrap(), "B");
        assert!(matches!(
            layout.column_code("a", "z"),
            Err(LayoutError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn gets_a_column_range() {
        let mut layout = Layout::default();
        layout.register_table("a", &["x", "y"], None).unwrap();
        let range = |opts: RangeOptions| layout.column_range("a", "x", opts).unwrap();
        assert_eq!(range(RangeOptions::default()), "A2:A");
        assert_eq!(
            range(RangeOptions {
                nrows: Some(1),
                ..Default::default()
            }),
            "A2"
        );
        assert_eq!(
            range(RangeOptions {
                nrows: Some(1),
                fixed: true,
                ..Default::default()
            }),
            "$A$2"
        );
        assert_eq!(
            range(RangeOptions {
                fixed: true,
                ..Default::default()
            }),
            "$A$2:$A"
        );
        assert_eq!(
            range(RangeOptions {
                absolute: true,
                ..Default::default()
            }),
            "'a'!A2:A"
        );
        assert_eq!(
            range(RangeOptions {
                absolute: true,
                indirect: true,
                ..Default::default()
            }),
            "INDIRECT(\"'a'!A2:A\")"
        );
        assert_eq!(
            layout
                .column_range("a", "y", RangeOptions::default())
                .unwrap(),
            "B2:B"
        );
    }

    #[test]
    fn column_range_uses_sheet_name_and_max_rows() {
        let mut layout = Layout::new(LayoutConfig {
            max_rows: Some(10),
            ..LayoutConfig::default()
        });
        layout.register_table("a", &["x"], Some("Sheet1")).unwrap();
        assert_eq!(
            layout
                .column_range(
                    "a",
                    "x",
                    RangeOptions {
                        absolute: true,
                        ..Default::default()
                    }
                )
                .unwrap(),
            "'Sheet1'!A2:A10"
        );
        assert_eq!(
            layout
                .column_range(
                    "a",
                    "x",
                    RangeOptions {
                        fixed: true,
                        ..Default::default()
                    }
                )
                .unwrap(),
            "$A$2:$A$10"
        );
        assert_eq!(layout.max_row_code(), "$10");
    }

    #[test]
    fn gets_an_enum_range() {
        let mut layout = Layout::default();
        let first = ints(&[1, 2]);
        assert_eq!(layout.register_enum(&first).unwrap().col, 0);
        assert_eq!(layout.enum_range(&first, false).unwrap(), "'lists'!$A$1:$A$2");
        assert_eq!(
            layout.enum_range(&first, true).unwrap(),
            "INDIRECT(\"'lists'!$A$1:$A$2\")"
        );
        let second = ints(&[1, 2, 3]);
        assert_eq!(layout.register_enum(&second).unwrap().col, 1);
        assert_eq!(layout.enum_range(&second, false).unwrap(), "'lists'!$B$1:$B$3");

        let mut renamed = Layout::new(LayoutConfig {
            enum_sheet: "Sheet1".into(),
            ..LayoutConfig::default()
        });
        renamed.register_enum(&second).unwrap();
        assert_eq!(renamed.enum_range(&second, false).unwrap(), "'Sheet1'!$A$1:$A$3");
    }

    #[test]
    fn fails_if_table_already_exists() {
        let mut layout = Layout::default();
        layout.register_table("a", &["x"], Some("a")).unwrap();
        assert!(matches!(
            layout.register_table("a", &["y"], Some("a")),
            Err(LayoutError::DuplicateTable(_))
        ));
        assert!(matches!(
            layout.register_table("a", &["y"], Some("b")),
            Err(LayoutError::DuplicateTable(_))
        ));
        assert_eq!(layout.tables().len(), 1);
    }

    #[test]
    fn fails_if_sheet_already_exists() {
        let mut layout = Layout::default();
        layout.register_table("a", &["x"], Some("sheet")).unwrap();
        assert!(matches!(
            layout.register_table("b", &["y"], Some("sheet")),
            Err(LayoutError::DuplicateSheet(s)) if s == "sheet"
        ));
        assert!(matches!(
            layout.register_table("lists", &["y"], None),
            Err(LayoutError::DuplicateSheet(s)) if s == "lists"
        ));
        assert_eq!(layout.tables().len(), 1);
    }

    #[test]
    fn fails_if_sheet_name_too_long() {
        let mut layout = Layout::new(LayoutConfig {
            max_name_length: Some(2),
            ..LayoutConfig::default()
        });
        assert!(matches!(
            layout.register_table("a", &["x"], Some("xyz")),
            Err(LayoutError::SheetNameTooLong { max: 2, .. })
        ));
        // length is counted in characters
        layout.register_table("b", &["x"], Some("éé")).unwrap();
    }

    #[test]
    fn fails_if_column_names_are_not_unique() {
        let mut layout = Layout::default();
        let err = layout.register_table("a", &["x", "y", "x"], None).unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateColumn { ref column, .. } if column == "x"));
        assert!(layout.tables().is_empty());
    }

    #[test]
    fn fails_if_table_not_found() {
        let mut layout = Layout::default();
        assert!(matches!(layout.table("a"), Err(LayoutError::TableNotFound(_))));
        layout.register_table("a", &["x"], None).unwrap();
        assert!(layout.table("a").is_ok());
        assert!(matches!(layout.table("b"), Err(LayoutError::TableNotFound(_))));
    }

    #[test]
    fn fails_if_enum_not_found() {
        let mut layout = Layout::default();
        assert!(matches!(
            layout.enum_for(&ints(&[1, 2])),
            Err(LayoutError::EnumNotFound(_))
        ));
        layout.register_enum(&ints(&[1, 2])).unwrap();
        let err = layout.enum_for(&ints(&[2, 1])).unwrap_err();
        assert_eq!(err.to_string(), "enum with values [2, 1] not found");
    }

    #[test]
    fn fails_if_enum_empty() {
        let mut layout = Layout::default();
        assert!(matches!(layout.register_enum(&[]), Err(LayoutError::EmptyEnum)));
        assert!(layout.enums().is_empty());
    }

    #[test]
    fn reports_enum_values_starting_with_special_characters() {
        let mut layout = Layout::default();
        for value in ["+", "=", "'"] {
            let registration = layout.register_enum(&[Scalar::from(value)]).unwrap();
            assert_eq!(
                registration.diagnostics,
                vec![Diagnostic::SuspiciousEnumValue {
                    values: vec![value.to_string()]
                }]
            );
        }
        assert_eq!(layout.enums().len(), 3);
        assert!(layout.enum_for(&[Scalar::from("+")]).is_ok());
        let clean = layout.register_enum(&[Scalar::from("a+")]).unwrap();
        assert!(clean.diagnostics.is_empty());
    }

    #[test]
    fn sets_same_enum_multiple_times() {
        let mut layout = Layout::default();
        layout.register_enum(&ints(&[5])).unwrap();
        let values = ints(&[1, 2]);
        let first = layout.register_enum(&values).unwrap();
        assert!(first.created);
        for _ in 0..2 {
            let again = layout.register_enum(&values).unwrap();
            assert!(!again.created);
            assert_eq!(again.col, first.col);
        }
        assert_eq!(layout.enums().len(), 2);
        assert_eq!(layout.enum_for(&values).unwrap().col, 1);
    }
}
