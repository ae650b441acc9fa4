//! Scalar literal values and their spreadsheet formatting.

use core::fmt;

/// A literal value that can live in a single spreadsheet cell.
///
/// Descriptor values (enum members, constraint bounds) are restricted to
/// these variants. Arrays and objects have no single-cell rendering and are
/// rejected with [`ValueError::UnsupportedValueType`].
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Int(i64),
    Number(f64),
    Text(String),
    Null,
}

/// Errors produced while converting arbitrary values to [`Scalar`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueError {
    /// Value is neither a boolean, number, string nor null.
    UnsupportedValueType { value: String, kind: &'static str },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::UnsupportedValueType { value, kind } => {
                write!(f, "unexpected value {value} of type {kind}")
            }
        }
    }
}

impl std::error::Error for ValueError {}

impl Scalar {
    /// Render as a formula literal.
    ///
    /// Booleans become `TRUE`/`FALSE`, text is double-quoted (with embedded
    /// quotes doubled) and null renders as an empty string.
    ///
    /// ```
    /// use tablecloth_common::Scalar;
    /// assert_eq!(Scalar::Boolean(true).to_formula(), "TRUE");
    /// assert_eq!(Scalar::Int(1).to_formula(), "1");
    /// assert_eq!(Scalar::Text("a".into()).to_formula(), "\"a\"");
    /// assert_eq!(Scalar::Null.to_formula(), "");
    /// ```
    pub fn to_formula(&self) -> String {
        match self {
            Scalar::Boolean(b) => format_bool(*b).to_string(),
            Scalar::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            other => other.to_string(),
        }
    }

    /// Text content, if this is a string value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value carries no information (`null`, `false` or `""`).
    ///
    /// Zero is informative: a `minimum: 0` constraint is still a constraint.
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Null | Scalar::Boolean(false))
            || matches!(self, Scalar::Text(s) if s.is_empty())
    }

    /// Whether a spreadsheet engine might read the value as a formula or an
    /// escape sequence when typed verbatim into a cell.
    pub fn looks_like_formula(&self) -> bool {
        self.as_text()
            .is_some_and(|s| s.starts_with(['+', '=', '\'']))
    }
}

/// Uppercase spreadsheet boolean literal.
#[inline]
pub fn format_bool(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

/// Shortest round-trip float text: `2.0`, `0.0001`, `1e+16`, `1.5e-05`.
///
/// Debug keeps the trailing `.0` on integral floats and switches to an
/// exponent below `1e-4` and from `1e16`; the exponent is then signed and
/// padded to two digits.
fn write_number(f: &mut impl fmt::Write, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("nan");
    }
    let text = format!("{n:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{mantissa}e{sign}{digits:0>2}")
        }
        None => f.write_str(&text),
    }
}

/// Raw rendering, used where a value is spliced into a formula template
/// (`LEN(A2) >= 3`) or a message.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => f.write_str(format_bool(*b)),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Number(n) => write_number(f, *n),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Null => Ok(()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Scalar;
    use core::fmt;
    use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
    use serde::ser::{Serialize, Serializer};

    impl Serialize for Scalar {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Scalar::Boolean(b) => serializer.serialize_bool(*b),
                Scalar::Int(i) => serializer.serialize_i64(*i),
                Scalar::Number(n) => serializer.serialize_f64(*n),
                Scalar::Text(s) => serializer.serialize_str(s),
                Scalar::Null => serializer.serialize_unit(),
            }
        }
    }

    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Scalar;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean, number, string or null")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
            Ok(Scalar::Boolean(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
            Ok(Scalar::Int(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
            Ok(i64::try_from(v).map_or(Scalar::Number(v as f64), Scalar::Int))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
            Ok(Scalar::Number(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
            Ok(Scalar::Text(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
            Ok(Scalar::Text(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
            Ok(Scalar::Null)
        }

        fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
            Ok(Scalar::Null)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Scalar, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Scalar, A::Error> {
            Err(de::Error::custom(super::ValueError::UnsupportedValueType {
                value: "[...]".to_string(),
                kind: "array",
            }))
        }

        fn visit_map<A: MapAccess<'de>>(self, _map: A) -> Result<Scalar, A::Error> {
            Err(de::Error::custom(super::ValueError::UnsupportedValueType {
                value: "{...}".to_string(),
                kind: "object",
            }))
        }
    }

    impl<'de> Deserialize<'de> for Scalar {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(ScalarVisitor)
        }
    }
}

#[cfg(feature = "json")]
mod json_impl {
    use super::{Scalar, ValueError};
    use serde_json::Value as JsonValue;

    impl TryFrom<&JsonValue> for Scalar {
        type Error = ValueError;

        fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
            match value {
                JsonValue::Null => Ok(Scalar::Null),
                JsonValue::Bool(b) => Ok(Scalar::Boolean(*b)),
                JsonValue::Number(n) => Ok(match n.as_i64() {
                    Some(i) => Scalar::Int(i),
                    None => Scalar::Number(n.as_f64().unwrap_or(f64::NAN)),
                }),
                JsonValue::String(s) => Ok(Scalar::Text(s.clone())),
                JsonValue::Array(_) => Err(ValueError::UnsupportedValueType {
                    value: value.to_string(),
                    kind: "array",
                }),
                JsonValue::Object(_) => Err(ValueError::UnsupportedValueType {
                    value: value.to_string(),
                    kind: "object",
                }),
            }
        }
    }

    /// Format an arbitrary JSON value as a formula literal.
    ///
    /// ```
    /// use serde_json::json;
    /// use tablecloth_common::format_value;
    /// assert_eq!(format_value(&json!(false)).unwrap(), "FALSE");
    /// assert_eq!(format_value(&json!("a")).unwrap(), "\"a\"");
    /// assert!(format_value(&json!([])).is_err());
    /// ```
    pub fn format_value(value: &JsonValue) -> Result<String, ValueError> {
        Scalar::try_from(value).map(|s| s.to_formula())
    }
}

#[cfg(feature = "json")]
pub use json_impl::format_value;
