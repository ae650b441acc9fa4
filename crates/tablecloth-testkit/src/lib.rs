//! Fixtures and read-back helpers shared by the Tablecloth test suites.

use std::path::{Path, PathBuf};

use tablecloth_spec::Package;
use tempfile::TempDir;
use umya_spreadsheet::{Spreadsheet, reader::xlsx};

/// A two-table package: `tree` (with required, unique, length and enum
/// constraints) and `branch`, whose `tree_id` references `tree.id`.
pub const TREES_YAML: &str = include_str!("../../tablecloth-spec/tests/fixtures/trees.yaml");

pub fn trees_package() -> Package {
    Package::from_yaml_str(TREES_YAML).expect("trees fixture parses")
}

/// A package with one table of the given `(name, type)` columns.
pub fn single_table_package(table: &str, columns: &[(&str, &str)]) -> Package {
    let mut yaml = format!("resources:\n  - name: {table}\n    schema:\n      fields:\n");
    for (name, field_type) in columns {
        yaml.push_str(&format!("        - name: {name}\n          type: {field_type}\n"));
    }
    Package::from_yaml_str(&yaml).expect("generated package parses")
}

/// Scratch directory removed on drop, plus a file name inside it.
pub struct TempOutput {
    dir: TempDir,
    name: String,
}

impl TempOutput {
    pub fn new(name: &str) -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            name: name.to_string(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.name)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

pub fn open_xlsx(path: &Path) -> Spreadsheet {
    xlsx::read(path).expect("read generated xlsx")
}

pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    let count = book.get_sheet_count();
    let mut names = Vec::with_capacity(count);
    for i in 0..count {
        if let Some(sheet) = book.get_sheet(&i) {
            names.push(sheet.get_name().to_string());
        }
    }
    names
}

/// Cell text, or `None` when the sheet or cell is missing.
pub fn cell_value(book: &Spreadsheet, sheet: &str, coord: &str) -> Option<String> {
    book.get_sheet_by_name(sheet)?
        .get_cell(coord)
        .map(|cell| cell.get_value().to_string())
}

/// Header row values, left to right, up to the first empty cell.
pub fn header_row(book: &Spreadsheet, sheet: &str) -> Vec<String> {
    let mut headers = Vec::new();
    for col in 1u32.. {
        match book
            .get_sheet_by_name(sheet)
            .and_then(|ws| ws.get_cell((col, 1)))
            .map(|cell| cell.get_value().to_string())
        {
            Some(value) if !value.is_empty() => headers.push(value),
            _ => break,
        }
    }
    headers
}

/// Data validations of a sheet as `(sqref, formula1)` pairs, in file order.
pub fn data_validations(book: &Spreadsheet, sheet: &str) -> Vec<(String, String)> {
    book.get_sheet_by_name(sheet)
        .and_then(|ws| ws.get_data_validations())
        .map(|validations| {
            validations
                .get_data_validation_list()
                .iter()
                .map(|dv| {
                    (
                        dv.get_sequence_of_references().get_sqref(),
                        dv.get_formula1().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Conditional formats of a sheet as `(sqref, formula)` pairs, in file order.
pub fn conditional_formats(book: &Spreadsheet, sheet: &str) -> Vec<(String, String)> {
    let Some(ws) = book.get_sheet_by_name(sheet) else {
        return Vec::new();
    };
    let mut rules = Vec::new();
    for formatting in ws.get_conditional_formatting_collection() {
        let sqref = formatting.get_sequence_of_references().get_sqref();
        for rule in formatting.get_conditional_collection() {
            let formula = rule
                .get_formula()
                .map(|f| f.get_address_str())
                .unwrap_or_default();
            rules.push((sqref.clone(), formula));
        }
    }
    rules
}
