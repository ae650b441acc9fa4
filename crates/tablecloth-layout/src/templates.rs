//! Static catalog of check formula templates.
//!
//! Placeholders:
//! * `col`: column code.
//! * `row`: first data row code.
//! * `value`: constraint value.
//! * `min_col`, `max_col`: codes of the first and last table columns.
//! * `max_row`: last row code prefixed with `$`, or empty when unbounded.
//! * `ncols`: number of table columns.
//! * `range`: cell range to look values up in.

use tablecloth_common::{Check, render_template};
use tablecloth_spec::{ConstraintKind, FieldType};

/// Formula templates for one check, in both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckTemplate {
    /// `TRUE` if the value is valid.
    pub valid: &'static str,
    /// `TRUE` if the value is invalid.
    pub invalid: &'static str,
    pub message: &'static str,
    /// Whether blank cells skip the check.
    pub ignore_blank: bool,
}

impl CheckTemplate {
    /// Fill in the template for the requested direction.
    pub fn instantiate(&self, valid: bool, vars: &[(&str, &str)]) -> Check {
        let formula = if valid { self.valid } else { self.invalid };
        Check {
            formula: render_template(formula, vars),
            message: render_template(self.message, vars),
            ignore_blank: self.ignore_blank,
        }
    }
}

const INTEGER: CheckTemplate = CheckTemplate {
    valid: "IF(ISNUMBER({col}{row}), INT({col}{row}) = {col}{row}, FALSE)",
    invalid: "IF(ISNUMBER({col}{row}), INT({col}{row}) <> {col}{row}, TRUE)",
    message: "integer",
    ignore_blank: true,
};

/// Type checks, keyed by Table Schema type name.
pub static TYPE_CHECKS: [(&str, CheckTemplate); 4] = [
    (
        "number",
        CheckTemplate {
            valid: "ISNUMBER({col}{row})",
            invalid: "NOT(ISNUMBER({col}{row}))",
            message: "number",
            ignore_blank: true,
        },
    ),
    ("integer", INTEGER),
    (
        "year",
        CheckTemplate {
            message: "year",
            ..INTEGER
        },
    ),
    (
        "boolean",
        CheckTemplate {
            valid: "OR({col}{row} = TRUE, {col}{row} = FALSE)",
            invalid: "AND({col}{row} <> TRUE, {col}{row} <> FALSE)",
            message: "TRUE or FALSE",
            ignore_blank: true,
        },
    ),
];

/// Constraint checks, keyed by snake_case constraint name. `enum` is
/// handled by [`IN_RANGE`].
pub static CONSTRAINT_CHECKS: [(&str, CheckTemplate); 7] = [
    (
        "required",
        CheckTemplate {
            valid: "NOT(ISBLANK({col}{row}))",
            invalid: "AND(ISBLANK({col}{row}), COUNTBLANK(${min_col}{row}:${max_col}{row}) <> {ncols})",
            message: "not blank",
            ignore_blank: false,
        },
    ),
    (
        "unique",
        CheckTemplate {
            valid: "COUNTIF({col}${row}:{col}{max_row}, {col}{row}) < 2",
            invalid: "COUNTIF({col}${row}:{col}{max_row}, {col}{row}) >= 2",
            message: "unique",
            ignore_blank: true,
        },
    ),
    (
        "min_length",
        CheckTemplate {
            valid: "LEN({col}{row}) >= {value}",
            invalid: "LEN({col}{row}) < {value}",
            message: "length ≥ {value}",
            ignore_blank: true,
        },
    ),
    (
        "max_length",
        CheckTemplate {
            valid: "LEN({col}{row}) <= {value}",
            invalid: "LEN({col}{row}) > {value}",
            message: "length ≤ {value}",
            ignore_blank: true,
        },
    ),
    (
        "minimum",
        CheckTemplate {
            valid: "{col}{row} >= {value}",
            invalid: "{col}{row} < {value}",
            message: "≥ {value}",
            ignore_blank: true,
        },
    ),
    (
        "maximum",
        CheckTemplate {
            valid: "{col}{row} <= {value}",
            invalid: "{col}{row} > {value}",
            message: "≤ {value}",
            ignore_blank: true,
        },
    ),
    (
        "pattern",
        CheckTemplate {
            valid: "REGEXMATCH(TO_TEXT({col}{row}), \"^{value}$\")",
            invalid: "NOT(REGEXMATCH(TO_TEXT({col}{row}), \"^{value}$\"))",
            message: "matching the regular expression {value}",
            ignore_blank: true,
        },
    ),
];

/// Membership of a value in a cell range (enum lists and foreign keys).
pub static IN_RANGE: CheckTemplate = CheckTemplate {
    valid: "ISNUMBER(MATCH({col}{row}, {range}, 0))",
    invalid: "ISNA(MATCH({col}{row}, {range}, 0))",
    message: "in the range {range}",
    ignore_blank: true,
};

fn lookup(catalog: &'static [(&'static str, CheckTemplate)], key: &str) -> Option<&'static CheckTemplate> {
    catalog.iter().find(|(k, _)| *k == key).map(|(_, t)| t)
}

/// Type check for a field type, if the type has one.
pub fn type_check(field_type: &FieldType) -> Option<&'static CheckTemplate> {
    lookup(&TYPE_CHECKS, field_type.as_str())
}

/// Template for a constraint.
pub fn constraint_check(kind: ConstraintKind) -> Option<&'static CheckTemplate> {
    lookup(&CONSTRAINT_CHECKS, kind.key())
}
