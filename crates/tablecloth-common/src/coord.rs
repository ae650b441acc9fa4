//! Conversions between zero-based grid indices and spreadsheet codes.
//!
//! Columns use bijective base-26 numeration (`A`..`Z`, `AA`..`ZZ`, `AAA`..),
//! so there is no zero digit: index 0 is `A`, 25 is `Z`, 26 is `AA` and the
//! last Excel column, 16 383, is `XFD`. Rows are simply shifted by one.

use core::fmt;

/// Number of letters in the column alphabet.
const RADIX: u32 = 26;

/// Errors returned when parsing spreadsheet codes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CoordError {
    /// Column code is empty or contains characters outside `A-Z`.
    InvalidColumnCode(String),
    /// Column code does not fit in a `u32` index.
    ColumnOverflow(String),
    /// Row codes are 1-based, so 0 has no index.
    ZeroRowCode,
    /// Row code does not fit in a `u32` index.
    RowOverflow(u64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidColumnCode(code) => {
                write!(f, "invalid column code `{code}` (expected letters A-Z)")
            }
            CoordError::ColumnOverflow(code) => write!(f, "column code `{code}` is too large"),
            CoordError::ZeroRowCode => write!(f, "row codes are 1-based"),
            CoordError::RowOverflow(code) => write!(f, "row code {code} is too large"),
        }
    }
}

impl std::error::Error for CoordError {}

/// Convert a zero-based column index to a spreadsheet column code.
///
/// ```
/// use tablecloth_common::column_index_to_code;
/// assert_eq!(column_index_to_code(0), "A");
/// assert_eq!(column_index_to_code(26), "AA");
/// assert_eq!(column_index_to_code(16_383), "XFD");
/// ```
pub fn column_index_to_code(index: u32) -> String {
    let mut letters = Vec::new();
    let mut i = u64::from(index) + 1;
    while i > 0 {
        let remainder = (i - 1) % u64::from(RADIX);
        i = (i - 1) / u64::from(RADIX);
        letters.push(b'A' + remainder as u8);
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

/// Convert a spreadsheet column code to a zero-based column index.
///
/// ```
/// use tablecloth_common::column_code_to_index;
/// assert_eq!(column_code_to_index("A"), Ok(0));
/// assert_eq!(column_code_to_index("XFD"), Ok(16_383));
/// assert!(column_code_to_index("a1").is_err());
/// ```
pub fn column_code_to_index(code: &str) -> Result<u32, CoordError> {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(CoordError::InvalidColumnCode(code.to_string()));
    }
    let overflow = || CoordError::ColumnOverflow(code.to_string());
    let mut acc: u64 = 0;
    for b in code.bytes() {
        let digit = u64::from(b - b'A') + 1;
        acc = acc
            .checked_mul(u64::from(RADIX))
            .and_then(|x| x.checked_add(digit))
            .ok_or_else(overflow)?;
    }
    u32::try_from(acc - 1).map_err(|_| overflow())
}

/// Convert a zero-based row index to a spreadsheet row code (1-based).
///
/// Widened to `u64` so the last `u32` index still has a code.
#[inline]
pub fn row_index_to_code(index: u32) -> u64 {
    u64::from(index) + 1
}

/// Convert a spreadsheet row code (1-based) to a zero-based row index.
#[inline]
pub fn row_code_to_index(code: u64) -> Result<u32, CoordError> {
    let index = code.checked_sub(1).ok_or(CoordError::ZeroRowCode)?;
    u32::try_from(index).map_err(|_| CoordError::RowOverflow(code))
}
