//! Column checks and the validation/condition formulas built from them.

use crate::formula::{Operator, merge_conditions, merge_formulas, readable_join, render_template};

/// A single boolean rule for one column.
///
/// `formula` may still contain `{col}` and `{row}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Check {
    pub formula: String,
    pub message: String,
    /// Whether blank cells skip the check.
    pub ignore_blank: bool,
}

impl Check {
    pub fn new(formula: impl Into<String>, message: impl Into<String>, ignore_blank: bool) -> Self {
        Self {
            formula: formula.into(),
            message: message.into(),
            ignore_blank,
        }
    }
}

/// First data row code, right below the header.
pub const FIRST_DATA_ROW: u32 = 2;

/// Build a column's conditional formatting formula.
///
/// Spreadsheet engines evaluate conditional formats on blank cells too, so
/// each check's own `ignore_blank` policy is applied here. With `valid` the
/// formula is `TRUE` when every check passes, otherwise it is `TRUE` when any
/// check fails.
///
/// ```
/// use tablecloth_common::{Check, build_column_condition};
/// let checks = [Check::new("ISNUMBER({col}{row})", "number", true)];
/// assert_eq!(
///     build_column_condition(&checks, true, "B", 2).as_deref(),
///     Some("IF(ISBLANK(B2), TRUE, ISNUMBER(B2))")
/// );
/// ```
pub fn build_column_condition(checks: &[Check], valid: bool, col: &str, row: u32) -> Option<String> {
    if checks.is_empty() {
        return None;
    }
    let formulas: Vec<&str> = checks.iter().map(|c| c.formula.as_str()).collect();
    let ignore_blanks: Vec<bool> = checks.iter().map(|c| c.ignore_blank).collect();
    let merged = merge_conditions(&formulas, valid, Some(&ignore_blanks));
    let row = row.to_string();
    Some(render_template(&merged, &[("col", col), ("row", &row)]))
}

/// Build a column's data validation from checks that return `TRUE` when valid.
///
/// Data validation skips blank cells in both Excel and Google Sheets, so the
/// formulas are simply ANDed.
///
/// ```
/// use tablecloth_common::{Check, build_column_validation};
/// let checks = [
///     Check::new("ISNUMBER(A2)", "number", true),
///     Check::new("A2 >= 0", "≥ 0", true),
/// ];
/// let check = build_column_validation(&checks).unwrap();
/// assert_eq!(check.formula, "AND(ISNUMBER(A2), A2 >= 0)");
/// assert_eq!(check.message, "Value must be number and ≥ 0");
/// ```
pub fn build_column_validation(checks: &[Check]) -> Option<Check> {
    if checks.is_empty() {
        return None;
    }
    let formulas: Vec<&str> = checks.iter().map(|c| c.formula.as_str()).collect();
    let messages: Vec<&str> = checks.iter().map(|c| c.message.as_str()).collect();
    Some(Check {
        formula: merge_formulas(&formulas, Operator::And),
        message: format!("Value must be {}", readable_join(&messages)),
        ignore_blank: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checks() -> Vec<Check> {
        vec![
            Check::new("NOT(ISBLANK({col}{row}))", "not blank", false),
            Check::new("ISNUMBER({col}{row})", "number", true),
            Check::new("{col}{row} >= 0", "≥ 0", true),
        ]
    }

    #[test]
    fn condition_is_none_without_checks() {
        assert_eq!(build_column_condition(&[], true, "A", FIRST_DATA_ROW), None);
        assert_eq!(build_column_validation(&[]), None);
    }

    #[test]
    fn condition_substitutes_column_and_row() {
        insta::assert_snapshot!(
            build_column_condition(&checks(), true, "C", FIRST_DATA_ROW).unwrap(),
            @"AND(NOT(ISBLANK(C2)), IF(ISBLANK(C2), TRUE, AND(ISNUMBER(C2), C2 >= 0)))"
        );
        assert_eq!(
            build_column_condition(&checks()[1..], false, "AA", 5).unwrap(),
            "IF(ISBLANK(AA5), FALSE, OR(ISNUMBER(AA5), AA5 >= 0))"
        );
    }

    #[test]
    fn condition_keeps_regex_quantifiers() {
        let checks = [Check::new(
            r#"NOT(REGEXMATCH(TO_TEXT(A2), "^[a-z]{2}$"))"#,
            "matching the regular expression [a-z]{2}",
            true,
        )];
        assert_eq!(
            build_column_condition(&checks, false, "A", 2).unwrap(),
            r#"IF(ISBLANK(A2), FALSE, NOT(REGEXMATCH(TO_TEXT(A2), "^[a-z]{2}$")))"#
        );
    }

    #[test]
    fn validation_ands_everything_and_ignores_blanks() {
        let check = build_column_validation(&checks()).unwrap();
        insta::assert_snapshot!(
            check.formula,
            @"AND(NOT(ISBLANK({col}{row})), ISNUMBER({col}{row}), {col}{row} >= 0)"
        );
        assert_eq!(check.message, "Value must be not blank, number, and ≥ 0");
        assert!(check.ignore_blank);
    }

    #[test]
    fn validation_single_check_is_unwrapped() {
        let check = build_column_validation(&checks()[1..2]).unwrap();
        assert_eq!(check.formula, "ISNUMBER({col}{row})");
        assert_eq!(check.message, "Value must be number");
    }
}
