//! Writer options and backend profiles.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tablecloth_layout::{DEFAULT_ENUM_SHEET, LayoutConfig};

use crate::error::WriteError;

/// How a spreadsheet reacts to a value that fails data validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// Show a message with a button to accept the value.
    Information,
    /// Show a message with buttons to accept the value or retry.
    Warning,
    /// Reject the value.
    Stop,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::Information => "information",
            ErrorType::Warning => "warning",
            ErrorType::Stop => "stop",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "information" => Ok(ErrorType::Information),
            "warning" => Ok(ErrorType::Warning),
            "stop" => Ok(ErrorType::Stop),
            other => Err(format!(
                "unknown error type '{other}' (expected information, warning or stop)"
            )),
        }
    }
}

/// An opaque RGB color written as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(u32);

impl HexColor {
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    pub const fn rgb(self) -> u32 {
        self.0
    }

    /// Red, green and blue channels in `0.0..=1.0`.
    pub fn fractions(self) -> [f64; 3] {
        [16, 8, 0].map(|shift| f64::from((self.0 >> shift) & 0xff) / 255.0)
    }
}

impl FromStr for HexColor {
    type Err = WriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WriteError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(HexColor)
            .map_err(|_| WriteError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for HexColor {
    type Error = WriteError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Template options shared by every backend.
///
/// Every field has a default, so an options file only lists what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateOptions {
    /// Sheet holding enum lists.
    pub enum_sheet: String,
    /// Per table, a note for each header cell (`null` to skip one).
    pub header_comments: BTreeMap<String, Vec<Option<String>>>,
    /// Use field descriptions as header notes for tables without
    /// `header_comments`.
    pub describe_headers: bool,
    /// Add a dropdown to boolean, foreign key and enum columns. A dropdown
    /// replaces the column's other validation rules, which are then only
    /// enforced by `invalid_fill`.
    pub dropdowns: bool,
    /// Reject or flag invalid input with data validation. Unset disables
    /// custom validation rules and dropdown error alerts.
    pub error_type: Option<ErrorType>,
    /// Check foreign keys, or only use them for dropdowns.
    pub validate_foreign_keys: bool,
    /// Background of cells with invalid input. Unset disables conditional
    /// formatting.
    pub invalid_fill: Option<HexColor>,
    pub header_fill: Option<HexColor>,
    pub header_bold: bool,
    pub freeze_header: bool,
    /// Hide the columns right of each table.
    pub hide_columns: bool,
    /// Per table, a width for each column (`null` for the default), in
    /// backend units.
    pub column_widths: BTreeMap<String, Vec<Option<f64>>>,
    /// Header row height, in backend units. Unset fits the content.
    pub header_height: Option<f64>,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            enum_sheet: DEFAULT_ENUM_SHEET.to_string(),
            header_comments: BTreeMap::new(),
            describe_headers: false,
            dropdowns: true,
            error_type: None,
            validate_foreign_keys: true,
            invalid_fill: Some(HexColor::new(0xffc7ce)),
            header_fill: Some(HexColor::new(0xd3d3d3)),
            header_bold: true,
            freeze_header: true,
            hide_columns: false,
            column_widths: BTreeMap::new(),
            header_height: None,
        }
    }
}

impl TemplateOptions {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, WriteError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

/// Target spreadsheet application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    #[serde(rename = "excel")]
    Excel,
    #[serde(rename = "gsheets")]
    GoogleSheets,
}

/// Limits and capabilities of a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendProfile {
    pub name: &'static str,
    /// Rows per sheet, or `None` when sheets grow on demand.
    pub max_rows: Option<u32>,
    pub max_cols: usize,
    pub max_name_length: usize,
    /// Whether `REGEXMATCH` is available for `pattern` constraints.
    pub regex: bool,
    /// Whether conditional formats must reach other sheets through `INDIRECT`.
    pub indirect_conditions: bool,
    pub error_types: &'static [ErrorType],
}

pub const EXCEL: BackendProfile = BackendProfile {
    name: "Excel",
    max_rows: Some(1_048_576),
    max_cols: 16_384,
    max_name_length: 31,
    regex: false,
    indirect_conditions: false,
    error_types: &[ErrorType::Information, ErrorType::Warning, ErrorType::Stop],
};

pub const GOOGLE_SHEETS: BackendProfile = BackendProfile {
    name: "Google Sheets",
    max_rows: None,
    max_cols: 18_278,
    max_name_length: 100,
    regex: true,
    indirect_conditions: true,
    error_types: &[ErrorType::Warning, ErrorType::Stop],
};

impl Backend {
    pub const fn profile(self) -> &'static BackendProfile {
        match self {
            Backend::Excel => &EXCEL,
            Backend::GoogleSheets => &GOOGLE_SHEETS,
        }
    }

    pub fn layout_config(self, enum_sheet: &str) -> LayoutConfig {
        let profile = self.profile();
        LayoutConfig {
            enum_sheet: enum_sheet.to_string(),
            max_rows: profile.max_rows,
            max_name_length: Some(profile.max_name_length),
            regex: profile.regex,
        }
    }

    /// Default width of a column from its header: characters for Excel,
    /// pixels (sized on the longest header line) for Google Sheets.
    pub fn column_width(self, header: &str) -> f64 {
        match self {
            Backend::Excel => f64::max(10.0, header.chars().count() as f64 * 1.2),
            Backend::GoogleSheets => {
                let longest = header.split('\n').map(|line| line.chars().count()).max();
                let chars = longest.unwrap_or(0) as f64;
                (f64::max(10.0, chars * 1.2) * 7.7).round()
            }
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().name)
    }
}
