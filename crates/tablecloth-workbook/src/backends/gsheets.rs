//! Google Sheets writer.
//!
//! Produces the body of a Sheets API v4 `spreadsheets.batchUpdate` call
//! that builds the template in an existing spreadsheet. Sending it is left
//! to the caller.

use serde::Serialize;
use serde_json::{Value, json};
use tablecloth_common::Scalar;
use tablecloth_layout::DropdownOptions;

use crate::error::WriteError;
use crate::options::{Backend, ErrorType, HexColor};
use crate::plan::{
    ColumnPlan, DROPDOWN_MESSAGE, EnumSheetPlan, SheetPlan, Style, TemplatePlan, Validation,
};
use crate::writer::{TemplateWriter, expect_backend};

/// Sheet ids are assigned from here, in sheet order. Id 0 is left to the
/// spreadsheet's default sheet.
pub const FIRST_SHEET_ID: u32 = 1;

/// A `batchUpdate` request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchUpdate {
    pub requests: Vec<Value>,
}

impl BatchUpdate {
    pub fn to_json(&self) -> Result<String, WriteError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Requests of one kind (`addSheet`, `setDataValidation`, ...).
    pub fn requests_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.requests.iter().filter_map(move |r| r.get(kind))
    }
}

/// Writes templates as Google Sheets `batchUpdate` requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SheetsWriter;

impl TemplateWriter for SheetsWriter {
    type Output = BatchUpdate;

    const BACKEND: Backend = Backend::GoogleSheets;

    fn write_plan(&self, plan: &TemplatePlan) -> Result<BatchUpdate, WriteError> {
        expect_backend(plan, Self::BACKEND)?;
        let mut requests = Vec::new();
        let mut sheet_id = FIRST_SHEET_ID;
        let mut ids = Vec::with_capacity(plan.sheets.len());
        for (index, sheet) in plan.sheets.iter().enumerate() {
            table_sheet(&mut requests, sheet, sheet_id, index, &plan.style);
            ids.push(sheet_id);
            sheet_id += 1;
        }
        if let Some(enums) = &plan.enum_sheet {
            enum_sheet(&mut requests, enums, sheet_id, plan.sheets.len());
        }
        for (sheet, id) in plan.sheets.iter().zip(ids) {
            for column in &sheet.columns {
                column_rules(&mut requests, column, id, &plan.style);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::info!(requests = requests.len(), "built sheets batch update");
        Ok(BatchUpdate { requests })
    }
}

fn rgb(color: HexColor) -> Value {
    let [red, green, blue] = color.fractions();
    json!({ "red": red, "green": green, "blue": blue })
}

fn header_format(style: &Style) -> Option<Value> {
    if !style.header_bold && style.header_fill.is_none() {
        return None;
    }
    let mut format = json!({ "verticalAlignment": "TOP" });
    if style.header_bold {
        format["textFormat"] = json!({ "bold": true });
    }
    if let Some(fill) = style.header_fill {
        format["backgroundColorStyle"] = json!({ "rgbColor": rgb(fill) });
    }
    Some(format)
}

fn string_value(text: &str) -> Value {
    json!({ "stringValue": text })
}

fn scalar_value(value: &Scalar) -> Value {
    match value {
        Scalar::Boolean(b) => json!({ "boolValue": b }),
        Scalar::Int(i) => json!({ "numberValue": i }),
        Scalar::Number(n) => json!({ "numberValue": n }),
        Scalar::Text(s) => string_value(s),
        Scalar::Null => json!({}),
    }
}

fn dimension_size(sheet_id: u32, dimension: &str, start: u32, pixels: f64) -> Value {
    json!({
        "updateDimensionProperties": {
            "range": {
                "sheetId": sheet_id,
                "dimension": dimension,
                "startIndex": start,
                "endIndex": start + 1,
            },
            "properties": { "pixelSize": pixels.round() as i64 },
            "fields": "pixelSize",
        }
    })
}

fn table_sheet(
    requests: &mut Vec<Value>,
    plan: &SheetPlan,
    sheet_id: u32,
    index: usize,
    style: &Style,
) {
    let mut grid = json!({});
    if plan.freeze_header {
        grid["frozenRowCount"] = json!(1);
    }
    if plan.hide_columns {
        grid["columnCount"] = json!(plan.columns.len());
    }
    requests.push(json!({
        "addSheet": {
            "properties": {
                "sheetId": sheet_id,
                "title": plan.sheet,
                "index": index,
                "gridProperties": grid,
            }
        }
    }));

    let format = header_format(style);
    let mut fields = vec!["userEnteredValue"];
    if format.is_some() {
        fields.push("userEnteredFormat");
    }
    if plan.columns.iter().any(|c| c.comment.is_some()) {
        fields.push("note");
    }
    let cells: Vec<Value> = plan
        .columns
        .iter()
        .map(|column| {
            let mut cell = json!({ "userEnteredValue": string_value(&column.column) });
            if let Some(format) = &format {
                cell["userEnteredFormat"] = format.clone();
            }
            if let Some(note) = &column.comment {
                cell["note"] = json!(note);
            }
            cell
        })
        .collect();
    requests.push(json!({
        "updateCells": {
            "start": { "sheetId": sheet_id, "rowIndex": 0, "columnIndex": 0 },
            "rows": [{ "values": cells }],
            "fields": fields.join(","),
        }
    }));

    if let Some(height) = plan.header_height {
        requests.push(dimension_size(sheet_id, "ROWS", 0, height));
    }
    for column in &plan.columns {
        requests.push(dimension_size(sheet_id, "COLUMNS", column.index, column.width));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(sheet = %plan.sheet, sheet_id, ncols = plan.columns.len(), "wrote table sheet");
}

fn enum_sheet(requests: &mut Vec<Value>, plan: &EnumSheetPlan, sheet_id: u32, index: usize) {
    requests.push(json!({
        "addSheet": {
            "properties": {
                "sheetId": sheet_id,
                "title": plan.sheet,
                "index": index,
                "hidden": true,
            }
        }
    }));
    for column in &plan.columns {
        let rows: Vec<Value> = column
            .values
            .iter()
            .map(|value| json!({ "values": [{ "userEnteredValue": scalar_value(value) }] }))
            .collect();
        requests.push(json!({
            "updateCells": {
                "start": { "sheetId": sheet_id, "rowIndex": 0, "columnIndex": column.col },
                "rows": rows,
                "fields": "userEnteredValue",
            }
        }));
    }
}

/// Every data row of one column, open-ended downwards.
fn column_grid_range(sheet_id: u32, index: u32) -> Value {
    json!({
        "sheetId": sheet_id,
        "startRowIndex": 1,
        "startColumnIndex": index,
        "endColumnIndex": index + 1,
    })
}

fn condition_value(formula: &str) -> Value {
    json!({ "userEnteredValue": format!("={formula}") })
}

fn validation_rule(validation: &Validation) -> Value {
    let strict = validation.error_type() == Some(ErrorType::Stop);
    match validation {
        Validation::Dropdown { options, .. } => {
            let condition = match options {
                DropdownOptions::Range(range) => {
                    json!({ "type": "ONE_OF_RANGE", "values": [condition_value(range)] })
                }
                DropdownOptions::List(values) => {
                    let values: Vec<Value> = values
                        .iter()
                        .map(|v| json!({ "userEnteredValue": v }))
                        .collect();
                    json!({ "type": "ONE_OF_LIST", "values": values })
                }
            };
            json!({
                "condition": condition,
                "inputMessage": DROPDOWN_MESSAGE,
                "strict": strict,
                "showCustomUi": true,
            })
        }
        Validation::Custom {
            formula, message, ..
        } => json!({
            "condition": { "type": "CUSTOM_FORMULA", "values": [condition_value(formula)] },
            "inputMessage": message,
            "strict": strict,
            "showCustomUi": false,
        }),
    }
}

fn column_rules(requests: &mut Vec<Value>, column: &ColumnPlan, sheet_id: u32, style: &Style) {
    let range = column_grid_range(sheet_id, column.index);
    if let Some(validation) = &column.validation {
        requests.push(json!({
            "setDataValidation": { "range": range, "rule": validation_rule(validation) }
        }));
    }
    if let (Some(condition), Some(fill)) = (&column.condition, style.invalid_fill) {
        requests.push(json!({
            "addConditionalFormatRule": {
                "rule": {
                    "ranges": [range],
                    "booleanRule": {
                        "condition": {
                            "type": "CUSTOM_FORMULA",
                            "values": [condition_value(condition)],
                        },
                        "format": { "backgroundColorStyle": { "rgbColor": rgb(fill) } },
                    },
                },
                "index": 0,
            }
        }));
    }
}
