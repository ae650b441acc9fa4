//! Excel (`.xlsx`) writer built on `rust_xlsxwriter`.

use std::path::Path;

use rust_xlsxwriter::{
    Color, ConditionalFormatFormula, DataValidation, DataValidationErrorStyle, Format, Formula,
    Note, Workbook, Worksheet,
};
use tablecloth_common::Scalar;
use tablecloth_layout::DropdownOptions;

use crate::error::WriteError;
use crate::options::{Backend, ErrorType, EXCEL};
use crate::plan::{
    ColumnPlan, DROPDOWN_MESSAGE, ERROR_TITLE, EnumSheetPlan, SheetPlan, Style, TemplatePlan,
    Validation,
};
use crate::writer::{TemplateWriter, expect_backend};

/// Header notes are drawn at twice the default note size.
const NOTE_WIDTH: u32 = 256;
const NOTE_HEIGHT: u32 = 148;

/// Writes templates as Excel workbooks.
#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxWriter;

impl TemplateWriter for XlsxWriter {
    type Output = Workbook;

    const BACKEND: Backend = Backend::Excel;

    fn write_plan(&self, plan: &TemplatePlan) -> Result<Workbook, WriteError> {
        expect_backend(plan, Self::BACKEND)?;
        let formats = Formats::new(&plan.style);
        let mut workbook = Workbook::new();
        for sheet in &plan.sheets {
            workbook.push_worksheet(table_sheet(sheet, &formats)?);
        }
        if let Some(enums) = &plan.enum_sheet {
            workbook.push_worksheet(enum_sheet(enums)?);
        }
        #[cfg(feature = "tracing")]
        tracing::info!(
            sheets = plan.sheets.len(),
            enums = plan.enum_sheet.as_ref().map_or(0, |e| e.columns.len()),
            "built xlsx template"
        );
        Ok(workbook)
    }
}

impl XlsxWriter {
    pub fn save(&self, plan: &TemplatePlan, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let mut workbook = self.write_plan(plan)?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    pub fn to_bytes(&self, plan: &TemplatePlan) -> Result<Vec<u8>, WriteError> {
        let mut workbook = self.write_plan(plan)?;
        Ok(workbook.save_to_buffer()?)
    }
}

struct Formats {
    header: Format,
    invalid: Option<Format>,
}

impl Formats {
    fn new(style: &Style) -> Self {
        let mut header = Format::new();
        if style.header_bold {
            header = header.set_bold();
        }
        if let Some(fill) = style.header_fill {
            header = header.set_background_color(Color::RGB(fill.rgb()));
        }
        let invalid = style
            .invalid_fill
            .map(|fill| Format::new().set_background_color(Color::RGB(fill.rgb())));
        Self { header, invalid }
    }
}

fn column_number(sheet: &str, index: u32) -> Result<u16, WriteError> {
    u16::try_from(index)
        .ok()
        .filter(|col| usize::from(*col) < EXCEL.max_cols)
        .ok_or_else(|| WriteError::TooManyColumns {
            table: sheet.to_string(),
            ncols: index as usize + 1,
            max: EXCEL.max_cols,
            backend: EXCEL.name,
        })
}

fn table_sheet(plan: &SheetPlan, formats: &Formats) -> Result<Worksheet, WriteError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(&plan.sheet)?;

    for column in &plan.columns {
        let col = column_number(&plan.sheet, column.index)?;
        sheet.write_string_with_format(0, col, &column.column, &formats.header)?;
        sheet.set_column_width(col, column.width)?;
        if let Some(comment) = &column.comment {
            let note = Note::new(comment)
                .set_width(NOTE_WIDTH)
                .set_height(NOTE_HEIGHT);
            sheet.insert_note(0, col, &note)?;
        }
    }
    if plan.hide_columns {
        let first = plan.columns.len();
        if first < EXCEL.max_cols {
            let first = column_number(&plan.sheet, first as u32)?;
            let last = column_number(&plan.sheet, (EXCEL.max_cols - 1) as u32)?;
            sheet.set_column_range_hidden(first, last)?;
        }
    }
    if plan.freeze_header {
        sheet.set_freeze_panes(1, 0)?;
    }
    if let Some(height) = plan.header_height {
        sheet.set_row_height(0, height)?;
    }

    for column in &plan.columns {
        apply_rules(&mut sheet, &plan.sheet, column, formats)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(sheet = %plan.sheet, ncols = plan.columns.len(), "wrote table sheet");
    Ok(sheet)
}

fn error_style(error_type: ErrorType) -> DataValidationErrorStyle {
    match error_type {
        ErrorType::Information => DataValidationErrorStyle::Information,
        ErrorType::Warning => DataValidationErrorStyle::Warning,
        ErrorType::Stop => DataValidationErrorStyle::Stop,
    }
}

fn data_validation(validation: &Validation) -> Result<DataValidation, WriteError> {
    let rule = match validation {
        Validation::Dropdown {
            options,
            error_type,
            show_error,
            ..
        } => {
            let rule = match options {
                DropdownOptions::List(values) => {
                    DataValidation::new().allow_list_strings(values.as_slice())?
                }
                DropdownOptions::Range(range) => {
                    DataValidation::new().allow_list_formula(Formula::new(range))
                }
            };
            rule.set_error_title(ERROR_TITLE)?
                .set_error_message(DROPDOWN_MESSAGE)?
                .set_error_style(error_style(error_type.unwrap_or(ErrorType::Information)))
                .show_error_message(*show_error)
                .ignore_blank(true)
        }
        Validation::Custom {
            formula,
            message,
            ignore_blank,
            error_type,
        } => DataValidation::new()
            .allow_custom(Formula::new(formula))
            .set_error_title(ERROR_TITLE)?
            .set_error_message(message)?
            .set_error_style(error_style(*error_type))
            .show_error_message(true)
            .ignore_blank(*ignore_blank),
    };
    Ok(rule)
}

fn apply_rules(
    sheet: &mut Worksheet,
    name: &str,
    column: &ColumnPlan,
    formats: &Formats,
) -> Result<(), WriteError> {
    let col = column_number(name, column.index)?;
    let last_row = EXCEL.max_rows.map_or(u32::MAX, |rows| rows - 1);
    if let Some(validation) = &column.validation {
        sheet.add_data_validation(1, col, last_row, col, &data_validation(validation)?)?;
    }
    if let (Some(condition), Some(format)) = (&column.condition, &formats.invalid) {
        let rule = ConditionalFormatFormula::new()
            .set_rule(condition.as_str())
            .set_format(format);
        sheet.add_conditional_format(1, col, last_row, col, &rule)?;
    }
    Ok(())
}

fn enum_sheet(plan: &EnumSheetPlan) -> Result<Worksheet, WriteError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(&plan.sheet)?;
    sheet.set_hidden(true);
    for column in &plan.columns {
        let col = column_number(&plan.sheet, column.col)?;
        for (row, value) in column.values.iter().enumerate() {
            let row = u32::try_from(row).unwrap_or(u32::MAX);
            match value {
                Scalar::Boolean(b) => sheet.write_boolean(row, col, *b)?,
                Scalar::Int(i) => sheet.write_number(row, col, *i as f64)?,
                Scalar::Number(n) => sheet.write_number(row, col, *n)?,
                Scalar::Text(s) => sheet.write_string(row, col, s)?,
                Scalar::Null => continue,
            };
        }
    }
    Ok(sheet)
}
