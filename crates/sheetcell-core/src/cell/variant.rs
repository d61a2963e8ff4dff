//! The tagged union of cell value kinds and its persisted encoding

use std::borrow::Cow;
use std::fmt;

use super::{CellError, CellNode, TypeCode, ValueKind};
use crate::error::{Error, Result};

/// A numeric cell value; both subtypes share the default encoding
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// `Integer` or `Float`
    pub fn kind(&self) -> ValueKind {
        match self {
            Number::Integer(_) => ValueKind::Integer,
            Number::Float(_) => ValueKind::Float,
        }
    }

    /// Truncate toward zero. Fails with [`Error::OutOfRange`] if the float
    /// is not finite or its integral part does not fit in an `i64`.
    pub fn to_i64(&self) -> Result<i64> {
        match *self {
            Number::Integer(n) => Ok(n),
            Number::Float(f) => {
                let t = f.trunc();
                // i64::MAX is not exactly representable; 2^63 is the first float past it
                if !t.is_finite()
                    || t < -9_223_372_036_854_775_808.0
                    || t >= 9_223_372_036_854_775_808.0
                {
                    return Err(Error::OutOfRange {
                        value: f.to_string(),
                        target: "i64",
                    });
                }
                Ok(t as i64)
            }
        }
    }

    /// Widen to `f64`
    pub fn to_f64(&self) -> f64 {
        match *self {
            Number::Integer(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(Number::Integer(n));
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Number::Float(f)),
            _ => Err(Error::malformed(ValueKind::Float, text)),
        }
    }
}

/// Floats at or beyond these magnitudes are written in exponent form
const EXPONENT_ABOVE: f64 = 1e15;
const EXPONENT_BELOW: f64 = 1e-5;

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Float(n) => {
                let magnitude = n.abs();
                if magnitude != 0.0 && (magnitude >= EXPONENT_ABOVE || magnitude < EXPONENT_BELOW)
                {
                    write!(f, "{:E}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

/// The value held by a cell, exactly one kind at a time
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// No value
    #[default]
    Empty,
    /// TRUE/FALSE, persisted as `1`/`0` with `t="b"`
    Boolean(bool),
    /// Integer or float, persisted as decimal text without a type attribute
    Number(Number),
    /// Text, persisted verbatim with `t="inlineStr"`
    String(String),
    /// Error token, persisted with `t="e"`
    Error(CellError),
}

impl Value {
    /// Load the value encoded by `node`.
    ///
    /// No value node means Empty. A value node without a type attribute is
    /// the default numeric kind. Otherwise the type code selects the kind
    /// and the text must parse as that kind.
    pub fn read_from<N: CellNode + ?Sized>(node: &N) -> Result<Self> {
        if !node.has_value_node() {
            return Ok(Value::Empty);
        }
        let text = node
            .value_text()
            .expect("cell reported a value node but returned no text");

        let kind = match node.type_code() {
            None => return Ok(Value::Number(Number::parse(text)?)),
            Some(code) => TypeCode::parse(code)?.kind()?,
        };

        match kind {
            ValueKind::Boolean => parse_bool(text).map(Value::Boolean),
            ValueKind::Integer | ValueKind::Float => Number::parse(text).map(Value::Number),
            ValueKind::String => Ok(Value::String(text.to_string())),
            ValueKind::Error => text.parse().map(Value::Error),
            ValueKind::Empty => Ok(Value::Empty),
        }
    }

    /// Write this value's encoding to `node`, creating or deleting the value
    /// node and type attribute as the kind requires.
    pub fn write_to<N: CellNode + ?Sized>(&self, node: &mut N) {
        let Some(text) = self.persisted_text() else {
            node.delete_value_node();
            node.delete_type_attribute();
            return;
        };

        node.create_value_node();
        node.set_value_text(&text);
        match self.type_code() {
            Some(code) => {
                node.create_type_attribute();
                node.set_type_code(code);
            }
            None => node.delete_type_attribute(),
        }
    }

    /// Text stored in the value node, `None` for Empty
    pub fn persisted_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Empty => None,
            Value::Boolean(b) => Some(Cow::Borrowed(if *b { "1" } else { "0" })),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Error(e) => Some(Cow::Borrowed(e.as_str())),
        }
    }

    /// The semantic kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(n) => n.kind(),
            Value::String(_) => ValueKind::String,
            Value::Error(_) => ValueKind::Error,
        }
    }

    /// Code for the type attribute; `None` means the attribute is omitted
    pub fn type_code(&self) -> Option<&'static str> {
        self.kind().type_code()
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(Error::mismatch("boolean", other.kind())),
        }
    }

    pub fn as_integer(&self) -> Result<i64> {
        match self {
            Value::Number(n) => n.to_i64(),
            Value::Boolean(b) => Ok(i64::from(*b)),
            other => Err(Error::mismatch("integer", other.kind())),
        }
    }

    pub fn as_float(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(n.to_f64()),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(Error::mismatch("float", other.kind())),
        }
    }

    /// Borrow the text of a String value
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s.as_str()),
            other => Err(Error::mismatch("string", other.kind())),
        }
    }

    /// Values that cannot be persisted and read back are rejected up front
    pub(crate) fn check_storable(&self) -> Result<()> {
        match self {
            Value::Number(Number::Float(f)) if !f.is_finite() => Err(Error::OutOfRange {
                value: f.to_string(),
                target: "finite float",
            }),
            _ => Ok(()),
        }
    }
}

fn parse_bool(text: &str) -> Result<bool> {
    match text.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        t if t.eq_ignore_ascii_case("true") => Ok(true),
        t if t.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(Error::malformed(ValueKind::Boolean, text)),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::Integer(i64::from(n)))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(Number::Float(f64::from(n)))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::Float(n))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<CellError> for Value {
    fn from(e: CellError) -> Self {
        Value::Error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::MemoryCell;

    #[test]
    fn test_read_empty_and_default_numeric() {
        assert_eq!(Value::read_from(&MemoryCell::new()).unwrap(), Value::Empty);
        assert_eq!(
            Value::read_from(&MemoryCell::with_value("42")).unwrap(),
            Value::Number(Number::Integer(42))
        );
        assert_eq!(
            Value::read_from(&MemoryCell::with_value("2.5")).unwrap(),
            Value::Number(Number::Float(2.5))
        );
        assert_eq!(
            Value::read_from(&MemoryCell::with_type("n", "-7")).unwrap(),
            Value::Number(Number::Integer(-7))
        );
    }

    #[test]
    fn test_read_typed() {
        assert_eq!(
            Value::read_from(&MemoryCell::with_type("b", "1")).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            Value::read_from(&MemoryCell::with_type("inlineStr", " padded ")).unwrap(),
            Value::String(" padded ".into())
        );
        assert_eq!(
            Value::read_from(&MemoryCell::with_type("str", "formula result")).unwrap(),
            Value::String("formula result".into())
        );
        assert_eq!(
            Value::read_from(&MemoryCell::with_type("e", "#DIV/0!")).unwrap(),
            Value::Error(CellError::Div0)
        );
    }

    #[test]
    fn test_read_malformed() {
        assert_eq!(
            Value::read_from(&MemoryCell::with_value("abc")),
            Err(Error::MalformedValue {
                kind: ValueKind::Float,
                text: "abc".into()
            })
        );
        assert!(matches!(
            Value::read_from(&MemoryCell::with_type("b", "yes")),
            Err(Error::MalformedValue {
                kind: ValueKind::Boolean,
                ..
            })
        ));
        assert!(matches!(
            Value::read_from(&MemoryCell::with_value("inf")),
            Err(Error::MalformedValue { .. })
        ));
        assert_eq!(
            Value::read_from(&MemoryCell::with_type("s", "0")),
            Err(Error::UnsupportedTypeCode("s".into()))
        );
    }

    #[test]
    fn test_type_without_value_node_is_empty() {
        let mut cell = MemoryCell::new();
        cell.create_type_attribute();
        cell.set_type_code("str");
        assert_eq!(Value::read_from(&cell).unwrap(), Value::Empty);
    }

    #[test]
    fn test_write_to_switches_encoding() {
        let mut cell = MemoryCell::new();
        Value::Boolean(false).write_to(&mut cell);
        assert_eq!(cell.value_text(), Some("0"));
        assert_eq!(cell.type_code(), Some("b"));

        Value::from(3.25).write_to(&mut cell);
        assert_eq!(cell.value_text(), Some("3.25"));
        assert_eq!(cell.type_code(), None);

        Value::Empty.write_to(&mut cell);
        assert_eq!(cell, MemoryCell::new());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(true).as_integer(), Ok(1));
        assert_eq!(Value::from(false).as_float(), Ok(0.0));
        assert_eq!(Value::from(-2.9).as_integer(), Ok(-2));
        assert_eq!(Value::from(7).as_float(), Ok(7.0));
        assert_eq!(
            Value::from(7).as_boolean(),
            Err(Error::TypeMismatch {
                requested: "boolean",
                actual: ValueKind::Integer
            })
        );
        assert_eq!(
            Value::from("x").as_integer(),
            Err(Error::TypeMismatch {
                requested: "integer",
                actual: ValueKind::String
            })
        );
        assert!(Value::from(CellError::Ref).as_float().is_err());
        assert!(Value::Empty.as_boolean().is_err());
        assert!(Value::Empty.as_str().is_err());
    }

    #[test]
    fn test_float_to_integer_range() {
        assert!(matches!(
            Number::Float(1e19).to_i64(),
            Err(Error::OutOfRange { target: "i64", .. })
        ));
        assert_eq!(Number::Float(-9.223372036854775808e18).to_i64(), Ok(i64::MIN));
        assert!(Number::Float(f64::NAN).to_i64().is_err());
    }

    #[test]
    fn test_float_text_uses_exponent_at_extremes() {
        assert_eq!(Number::Float(1e300).to_string(), "1E300");
        assert_eq!(Number::Float(-1e-300).to_string(), "-1E-300");
        assert_eq!(Number::Float(1.5e-7).to_string(), "1.5E-7");
        assert_eq!(Number::Float(123456.5).to_string(), "123456.5");
        assert_eq!(Number::Float(0.001).to_string(), "0.001");
        assert_eq!(Number::Float(0.0).to_string(), "0");

        for f in [1e300, -1e-300, 1.5e-7, 2.5e20] {
            let mut cell = MemoryCell::new();
            Value::from(f).write_to(&mut cell);
            assert_eq!(
                Value::read_from(&cell).unwrap(),
                Value::Number(Number::Float(f))
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "TRUE");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(3.14).to_string(), "3.14");
        assert_eq!(Value::from(CellError::Na).to_string(), "#N/A");
    }
}
