//! Composition of boolean spreadsheet formulas.
//!
//! Formulas handled here are strings that evaluate to `TRUE` or `FALSE` and
//! may still contain `{col}` and `{row}` placeholders. Placeholders are filled
//! in by [`render_template`] once a concrete column is known.

use core::fmt;

use crate::value::format_bool;

/// Logical operator used to combine formulas.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge formulas with a logical operator.
///
/// ```
/// use tablecloth_common::{merge_formulas, Operator};
/// assert_eq!(merge_formulas::<&str>(&[], Operator::And), "");
/// assert_eq!(merge_formulas(&["A2 > 0"], Operator::And), "A2 > 0");
/// assert_eq!(merge_formulas(&["A2 > 0", "A2 < 3"], Operator::Or), "OR(A2 > 0, A2 < 3)");
/// ```
pub fn merge_formulas<S: AsRef<str>>(formulas: &[S], op: Operator) -> String {
    match formulas {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        many => {
            let args: Vec<&str> = many.iter().map(AsRef::as_ref).collect();
            format!("{op}({})", args.join(", "))
        }
    }
}

/// Merge formulas for conditional formatting, short-circuiting blank cells.
///
/// With `valid` the merged formula is `TRUE` for valid values (operator
/// `AND`), otherwise it is `TRUE` for invalid values (operator `OR`).
///
/// Formulas whose `ignore_blanks` entry is `false` are merged as-is. All
/// others (the default when `ignore_blanks` is `None`) are grouped and
/// wrapped once in `IF(ISBLANK({col}{row}), <valid>, ...)`, which is
/// appended after the non-ignoring formulas.
///
/// ```
/// use tablecloth_common::merge_conditions;
/// let formulas = ["A2 > 0", "A2 < 3"];
/// assert_eq!(
///     merge_conditions(&formulas, true, None),
///     "IF(ISBLANK({col}{row}), TRUE, AND(A2 > 0, A2 < 3))"
/// );
/// assert_eq!(
///     merge_conditions(&formulas, false, Some(&[false, true])),
///     "OR(A2 > 0, IF(ISBLANK({col}{row}), FALSE, A2 < 3))"
/// );
/// ```
pub fn merge_conditions<S: AsRef<str>>(
    formulas: &[S],
    valid: bool,
    ignore_blanks: Option<&[bool]>,
) -> String {
    let op = if valid { Operator::And } else { Operator::Or };
    let mut direct: Vec<&str> = Vec::new();
    let mut ignoring: Vec<&str> = Vec::new();
    for (i, formula) in formulas.iter().enumerate() {
        let ignores_blank = ignore_blanks
            .and_then(|flags| flags.get(i).copied())
            .unwrap_or(true);
        if ignores_blank {
            ignoring.push(formula.as_ref());
        } else {
            direct.push(formula.as_ref());
        }
    }
    if ignoring.is_empty() {
        return merge_formulas(&direct, op);
    }
    let merged = merge_formulas(&ignoring, op);
    let wrapped = format!("IF(ISBLANK({{col}}{{row}}), {}, {merged})", format_bool(valid));
    let mut all: Vec<&str> = direct;
    all.push(&wrapped);
    merge_formulas(&all, op)
}

/// Join phrases as an English list with an Oxford comma.
///
/// ```
/// use tablecloth_common::readable_join;
/// assert_eq!(readable_join(&["a"]), "a");
/// assert_eq!(readable_join(&["a", "b"]), "a and b");
/// assert_eq!(readable_join(&["a", "b", "c"]), "a, b, and c");
/// ```
pub fn readable_join<S: AsRef<str>>(values: &[S]) -> String {
    let parts: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    match parts.as_slice() {
        [] => String::new(),
        [a] => a.to_string(),
        [a, b] => format!("{a} and {b}"),
        [head @ .., last] => format!("{}, and {last}", head.join(", ")),
    }
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Only the names listed in `vars` are replaced. Any other brace group,
/// such as the `{2}` quantifier of an embedded regular expression, is copied
/// through untouched, and substituted values are never rescanned.
///
/// ```
/// use tablecloth_common::render_template;
/// assert_eq!(
///     render_template("COUNTIF({col}${row}:{col}{max_row}, {col}{row})", &[("col", "B"), ("row", "2"), ("max_row", "")]),
///     "COUNTIF(B$2:B, B2)"
/// );
/// assert_eq!(render_template("\"^[a-z]{2}$\"", &[("col", "A")]), "\"^[a-z]{2}$\"");
/// ```
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMULAS: [&str; 2] = ["A2 > 0", "A2 < 3"];

    #[test]
    fn merge_formulas_shapes() {
        assert_eq!(merge_formulas::<String>(&[], Operator::Or), "");
        assert_eq!(merge_formulas(&["x"], Operator::And), "x");
        assert_eq!(merge_formulas(&["x", "y"], Operator::Or), "OR(x, y)");
        assert_eq!(
            merge_formulas(&["x", "y", "z"], Operator::And),
            "AND(x, y, z)"
        );
    }

    #[test]
    fn merge_conditions_wraps_blank_ignoring_group() {
        assert_eq!(
            merge_conditions(&FORMULAS, true, None),
            "IF(ISBLANK({col}{row}), TRUE, AND(A2 > 0, A2 < 3))"
        );
        assert_eq!(
            merge_conditions(&FORMULAS, false, None),
            "IF(ISBLANK({col}{row}), FALSE, OR(A2 > 0, A2 < 3))"
        );
        assert_eq!(
            merge_conditions(&FORMULAS, true, Some(&[true, true])),
            "IF(ISBLANK({col}{row}), TRUE, AND(A2 > 0, A2 < 3))"
        );
    }

    #[test]
    fn merge_conditions_without_blank_handling() {
        assert_eq!(
            merge_conditions(&FORMULAS, true, Some(&[false, false])),
            "AND(A2 > 0, A2 < 3)"
        );
        assert_eq!(
            merge_conditions(&FORMULAS, false, Some(&[false, false])),
            "OR(A2 > 0, A2 < 3)"
        );
    }

    #[test]
    fn merge_conditions_mixed_groups_put_wrapped_last() {
        assert_eq!(
            merge_conditions(&FORMULAS, true, Some(&[false, true])),
            "AND(A2 > 0, IF(ISBLANK({col}{row}), TRUE, A2 < 3))"
        );
        assert_eq!(
            merge_conditions(&FORMULAS, false, Some(&[true, false])),
            "OR(A2 < 3, IF(ISBLANK({col}{row}), FALSE, A2 > 0))"
        );
    }

    #[test]
    fn merge_conditions_empty() {
        assert_eq!(merge_conditions::<&str>(&[], true, None), "");
    }

    #[test]
    fn readable_join_lists() {
        assert_eq!(readable_join::<&str>(&[]), "");
        assert_eq!(readable_join(&["a"]), "a");
        assert_eq!(readable_join(&["a", "b"]), "a and b");
        assert_eq!(readable_join(&["a", "b", "c"]), "a, b, and c");
        assert_eq!(readable_join(&["a", "b", "c", "d"]), "a, b, c, and d");
    }

    #[test]
    fn render_template_placeholders() {
        let vars = [("col", "C"), ("row", "2"), ("min_col", "A"), ("max_col", "D"), ("ncols", "4")];
        assert_eq!(
            render_template(
                "AND(ISBLANK({col}{row}), COUNTBLANK(${min_col}{row}:${max_col}{row}) <> {ncols})",
                &vars
            ),
            "AND(ISBLANK(C2), COUNTBLANK($A2:$D2) <> 4)"
        );
    }

    #[test]
    fn render_template_keeps_unknown_braces() {
        assert_eq!(render_template("{", &[]), "{");
        assert_eq!(render_template("}{", &[]), "}{");
        assert_eq!(render_template("{col", &[("col", "A")]), "{col");
        assert_eq!(
            render_template("a{b}{col}", &[("col", "A")]),
            "a{b}A"
        );
        // nested: the inner group is a known name
        assert_eq!(render_template("{{col}}", &[("col", "A")]), "{A}");
    }

    #[test]
    fn render_template_does_not_rescan_values() {
        assert_eq!(
            render_template("{value}", &[("value", "{col}"), ("col", "A")]),
            "{col}"
        );
    }
}
