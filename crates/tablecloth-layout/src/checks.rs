//! Column checks assembled from the template catalog.

use tablecloth_common::{Check, FIRST_DATA_ROW, column_index_to_code};
use tablecloth_spec::{ConstraintKind, reduce_foreign_keys};

use crate::error::LayoutError;
use crate::layout::{ColumnRules, Layout, RangeOptions};
use crate::templates::{CheckTemplate, IN_RANGE, constraint_check, type_check};

impl Layout {
    /// Gather every check for a column.
    ///
    /// With `valid` the formulas return `TRUE` for valid values, otherwise
    /// for invalid ones. Checks come in a fixed order: the type check, then
    /// constraints, then enum membership, then one membership check per
    /// foreign key involving the column.
    ///
    /// Formulas reference the first data row (`A2`), as expected by both
    /// data validation and conditional formatting applied to a whole column.
    pub fn gather_column_checks(
        &self,
        table: &str,
        column: &str,
        valid: bool,
        rules: &ColumnRules<'_>,
        indirect: bool,
    ) -> Result<Vec<Check>, LayoutError> {
        let col = self.column_code(table, column)?;
        let columns = &self.table(table)?.columns;
        let min_col = column_index_to_code(0);
        let max_col = column_index_to_code(columns.len().saturating_sub(1) as u32);
        let row = FIRST_DATA_ROW.to_string();
        let max_row = self.max_row_code();
        let ncols = columns.len().to_string();
        let defaults = [
            ("col", col.as_str()),
            ("row", row.as_str()),
            ("min_col", min_col.as_str()),
            ("max_col", max_col.as_str()),
            ("max_row", max_row.as_str()),
            ("ncols", ncols.as_str()),
        ];
        let mut checks = Vec::new();

        if let Some(template) = rules.field_type.and_then(type_check) {
            checks.push(template.instantiate(valid, &defaults));
        }

        if let Some(constraints) = rules.constraints {
            for (kind, value) in constraints.active() {
                if kind == ConstraintKind::Pattern && !self.config().regex {
                    continue;
                }
                let Some(template) = constraint_check(kind) else {
                    continue;
                };
                checks.push(instantiate_with(template, valid, &defaults, "value", &value.to_string()));
            }
            if let Some(values) = constraints.enum_values() {
                let range = self.enum_range(values, indirect)?;
                checks.push(instantiate_with(&IN_RANGE, valid, &defaults, "range", &range));
            }
        }

        for key in reduce_foreign_keys(rules.foreign_keys, table, column)? {
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
            checks.push(instantiate_with(&IN_RANGE, valid, &defaults, "range", &range));
        }

        Ok(checks)
    }
}

fn instantiate_with(
    template: &CheckTemplate,
    valid: bool,
    defaults: &[(&str, &str)],
    key: &str,
    value: &str,
) -> Check {
    let mut vars: Vec<(&str, &str)> = defaults.to_vec();
    vars.push((key, value));
    template.instantiate(valid, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;
    use tablecloth_common::Scalar;
    use tablecloth_spec::{Constraints, FieldType, ForeignKey};

    fn layout(config: LayoutConfig) -> Layout {
        let mut layout = Layout::new(config);
        layout.register_table("a", &["w", "x", "y"], None).unwrap();
        layout.register_table("b", &["id"], None).unwrap();
        layout
    }

    fn formulas(checks: &[Check]) -> Vec<&str> {
        checks.iter().map(|c| c.formula.as_str()).collect()
    }

    #[test]
    fn type_check_only() {
        let layout = layout(LayoutConfig::default());
        let field_type = FieldType::Number;
        let rules = ColumnRules {
            field_type: Some(&field_type),
            ..ColumnRules::default()
        };
        let checks = layout.gather_column_checks("a", "x", true, &rules, false).unwrap();
        assert_eq!(formulas(&checks), ["ISNUMBER(B2)"]);
        let checks = layout.gather_column_checks("a", "x", false, &rules, false).unwrap();
        assert_eq!(formulas(&checks), ["NOT(ISNUMBER(B2))"]);
        assert_eq!(checks[0].message, "number");
    }

    #[test]
    fn untyped_unconstrained_column_has_no_checks() {
        let layout = layout(LayoutConfig::default());
        let field_type = FieldType::String;
        let rules = ColumnRules {
            field_type: Some(&field_type),
            ..ColumnRules::default()
        };
        assert!(layout
            .gather_column_checks("a", "x", true, &rules, false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn adds_check_for_constraint_equal_to_zero() {
        let layout = layout(LayoutConfig::default());
        let zero = Some(Scalar::Int(0));
        for constraints in [
            Constraints { minimum: zero.clone(), ..Constraints::default() },
            Constraints { maximum: zero.clone(), ..Constraints::default() },
            Constraints { min_length: Some(0), ..Constraints::default() },
            Constraints { max_length: Some(0), ..Constraints::default() },
        ] {
            let rules = ColumnRules {
                constraints: Some(&constraints),
                ..ColumnRules::default()
            };
            let checks = layout.gather_column_checks("a", "x", true, &rules, false).unwrap();
            assert_eq!(checks.len(), 1, "{constraints:?}");
        }
    }

    #[test]
    fn required_and_unique_use_table_context() {
        let layout = layout(LayoutConfig {
            max_rows: Some(100),
            ..LayoutConfig::default()
        });
        let constraints = Constraints {
            required: Some(true),
            unique: Some(true),
            ..Constraints::default()
        };
        let rules = ColumnRules {
            constraints: Some(&constraints),
            ..ColumnRules::default()
        };
        let checks = layout.gather_column_checks("a", "x", false, &rules, false).unwrap();
        assert_eq!(
            formulas(&checks),
            [
                "AND(ISBLANK(B2), COUNTBLANK($A2:$C2) <> 3)",
                "COUNTIF(B$2:B$100, B2) >= 2",
            ]
        );
        assert!(!checks[0].ignore_blank);
        assert!(checks[1].ignore_blank);
    }

    #[test]
    fn unbounded_unique_check_has_open_range() {
        let layout = layout(LayoutConfig::default());
        let constraints = Constraints {
            unique: Some(true),
            ..Constraints::default()
        };
        let rules = ColumnRules {
            constraints: Some(&constraints),
            ..ColumnRules::default()
        };
        let checks = layout.gather_column_checks("a", "w", true, &rules, false).unwrap();
        assert_eq!(formulas(&checks), ["COUNTIF(A$2:A, A2) < 2"]);
    }

    #[test]
    fn pattern_depends_on_regex_support() {
        let constraints = Constraints {
            pattern: Some("[a-z]{2}".into()),
            ..Constraints::default()
        };
        let rules = ColumnRules {
            constraints: Some(&constraints),
            ..ColumnRules::default()
        };
        let with_regex = layout(LayoutConfig::default());
        let checks = with_regex.gather_column_checks("a", "x", true, &rules, false).unwrap();
        assert_eq!(
            formulas(&checks),
            ["REGEXMATCH(TO_TEXT(B2), \"^[a-z]{2}$\")"]
        );
        assert_eq!(checks[0].message, "matching the regular expression [a-z]{2}");

        let without = layout(LayoutConfig {
            regex: false,
            ..LayoutConfig::default()
        });
        assert!(without
            .gather_column_checks("a", "x", true, &rules, false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn order_is_type_constraints_enum_foreign_keys() {
        let mut layout = layout(LayoutConfig::default());
        let values = vec![Scalar::Int(1), Scalar::Int(2)];
        layout.register_enum(&values).unwrap();
        let constraints = Constraints {
            maximum: Some(Scalar::Int(9)),
            required: Some(true),
            enum_values: Some(values),
            ..Constraints::default()
        };
        let fks = [ForeignKey::new("y", Some("b"), "id")];
        let field_type = FieldType::Integer;
        let rules = ColumnRules {
            field_type: Some(&field_type),
            constraints: Some(&constraints),
            foreign_keys: &fks,
        };
        let checks = layout.gather_column_checks("a", "y", true, &rules, true).unwrap();
        let messages: Vec<_> = checks.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "integer",
                "not blank",
                "≤ 9",
                "in the range INDIRECT(\"'lists'!$A$1:$A$2\")",
                "in the range INDIRECT(\"'b'!$A$2:$A\")",
            ]
        );
        assert_eq!(
            checks[4].formula,
            "ISNUMBER(MATCH(C2, INDIRECT(\"'b'!$A$2:$A\"), 0))"
        );
    }

    #[test]
    fn self_referencing_foreign_key_is_not_sheet_qualified() {
        let layout = layout(LayoutConfig::default());
        let fks = [ForeignKey::new("y", None, "w")];
        let rules = ColumnRules {
            foreign_keys: &fks,
            ..ColumnRules::default()
        };
        let checks = layout.gather_column_checks("a", "y", false, &rules, true).unwrap();
        assert_eq!(formulas(&checks), ["ISNA(MATCH(C2, $A$2:$A, 0))"]);
    }

    #[test]
    fn unregistered_enum_is_an_error() {
        let layout = layout(LayoutConfig::default());
        let constraints = Constraints {
            enum_values: Some(vec![Scalar::from("nope")]),
            ..Constraints::default()
        };
        let rules = ColumnRules {
            constraints: Some(&constraints),
            ..ColumnRules::default()
        };
        assert!(matches!(
            layout.gather_column_checks("a", "x", true, &rules, false),
            Err(LayoutError::EnumNotFound(_))
        ));
    }
}
