//! Single-column cell ranges in A1 notation.

use std::fmt;

use crate::coord::{column_index_to_code, row_index_to_code};

/// Builder for the A1 range covering (part of) one column.
///
/// Without a row count the range is open-ended (`A2:A`), which both Excel and
/// Google Sheets read as "to the bottom of the sheet".
///
/// ```
/// use tablecloth_common::ColumnRange;
/// assert_eq!(ColumnRange::new(0, 1).to_string(), "A2:A");
/// assert_eq!(ColumnRange::new(0, 1).rows(2).fixed(true).to_string(), "$A$2:$A$3");
/// assert_eq!(
///     ColumnRange::new(0, 1).sheet("Sheet1").indirect(true).to_string(),
///     r#"INDIRECT("'Sheet1'!A2:A")"#
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRange<'a> {
    col: u32,
    row: u32,
    nrows: Option<u32>,
    fixed: bool,
    sheet: Option<&'a str>,
    indirect: bool,
}

impl<'a> ColumnRange<'a> {
    /// Range starting at zero-based column `col` and zero-based row `row`.
    pub fn new(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            nrows: None,
            fixed: false,
            sheet: None,
            indirect: false,
        }
    }

    /// Number of rows to include.
    pub fn rows(mut self, nrows: u32) -> Self {
        self.nrows = Some(nrows);
        self
    }

    /// Optional row count; `None` keeps the range unbounded.
    pub fn rows_opt(mut self, nrows: Option<u32>) -> Self {
        self.nrows = nrows;
        self
    }

    /// Anchor every coordinate with `$`.
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Qualify the range with a sheet name. Empty names are ignored.
    pub fn sheet(mut self, sheet: &'a str) -> Self {
        self.sheet = Some(sheet);
        self
    }

    pub fn sheet_opt(mut self, sheet: Option<&'a str>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Wrap a sheet-qualified range in `INDIRECT("...")`.
    ///
    /// Ignored unless a sheet is set.
    pub fn indirect(mut self, indirect: bool) -> Self {
        self.indirect = indirect;
        self
    }

    fn write_cells(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let prefix = if self.fixed { "$" } else { "" };
        let col = column_index_to_code(self.col);
        write!(f, "{prefix}{col}{prefix}{}", row_index_to_code(self.row))?;
        if self.nrows == Some(1) {
            return Ok(());
        }
        write!(f, ":{prefix}{col}")?;
        if let Some(nrows) = self.nrows {
            // 1-based code of the last included row
            let last = u64::from(self.row) + u64::from(nrows);
            write!(f, "{prefix}{last}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ColumnRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sheet.filter(|s| !s.is_empty()) {
            None => self.write_cells(f),
            Some(sheet) => {
                let mut cells = String::new();
                self.write_cells(&mut cells)?;
                if self.indirect {
                    write!(f, "INDIRECT(\"'{sheet}'!{cells}\")")
                } else {
                    write!(f, "'{sheet}'!{cells}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cells() {
        assert_eq!(ColumnRange::new(0, 1).rows(1).to_string(), "A2");
        assert_eq!(ColumnRange::new(0, 1).rows(1).fixed(true).to_string(), "$A$2");
        assert_eq!(
            ColumnRange::new(1, 0).rows(1).fixed(true).sheet("lists").to_string(),
            "'lists'!$B$1"
        );
    }

    #[test]
    fn open_ranges() {
        assert_eq!(ColumnRange::new(0, 1).to_string(), "A2:A");
        assert_eq!(ColumnRange::new(0, 1).fixed(true).to_string(), "$A$2:$A");
        assert_eq!(ColumnRange::new(27, 1).to_string(), "AB2:AB");
    }

    #[test]
    fn closed_ranges_end_at_row_plus_nrows() {
        assert_eq!(ColumnRange::new(0, 1).rows(2).to_string(), "A2:A3");
        assert_eq!(
            ColumnRange::new(0, 1).rows(2).fixed(true).to_string(),
            "$A$2:$A$3"
        );
        assert_eq!(
            ColumnRange::new(0, 1).rows(1_048_575).to_string(),
            "A2:A1048576"
        );
    }

    #[test]
    fn sheet_qualified_ranges() {
        assert_eq!(
            ColumnRange::new(0, 1)
                .rows(2)
                .fixed(true)
                .sheet("Sheet1")
                .to_string(),
            "'Sheet1'!$A$2:$A$3"
        );
        assert_eq!(
            ColumnRange::new(0, 1)
                .rows(2)
                .fixed(true)
                .sheet("Sheet1")
                .indirect(true)
                .to_string(),
            "INDIRECT(\"'Sheet1'!$A$2:$A$3\")"
        );
        assert_eq!(
            ColumnRange::new(0, 1).sheet("Sheet1").indirect(true).to_string(),
            "INDIRECT(\"'Sheet1'!A2:A\")"
        );
    }

    #[test]
    fn indirect_needs_a_sheet() {
        assert_eq!(ColumnRange::new(0, 1).indirect(true).to_string(), "A2:A");
        assert_eq!(
            ColumnRange::new(0, 1).sheet("").indirect(true).to_string(),
            "A2:A"
        );
    }
}
