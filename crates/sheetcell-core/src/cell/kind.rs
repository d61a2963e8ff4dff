//! Value kinds and the type-code table of the `t` attribute

use std::fmt;

use crate::error::{Error, Result};

/// The closed set of value categories a cell can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// No value; neither value node nor type attribute is persisted
    Empty,
    /// TRUE/FALSE
    Boolean,
    /// Whole number
    Integer,
    /// Floating-point number
    Float,
    /// Text
    String,
    /// Error token such as `#DIV/0!`
    Error,
}

impl ValueKind {
    /// Lower-case name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Empty => "empty",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Error => "error",
        }
    }

    /// Integer and Float share the default numeric encoding
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Float)
    }

    /// The code written to the type attribute, or `None` when the attribute
    /// must be absent (Empty and the default numeric kinds).
    pub fn type_code(&self) -> Option<&'static str> {
        match self {
            ValueKind::Empty | ValueKind::Integer | ValueKind::Float => None,
            ValueKind::Boolean => Some(TypeCode::Boolean.as_str()),
            ValueKind::String => Some(TypeCode::InlineString.as_str()),
            ValueKind::Error => Some(TypeCode::Error.as_str()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codes that can appear in a cell's `t` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// `b`
    Boolean,
    /// `n`, the default; normally omitted
    Number,
    /// `e`
    Error,
    /// `inlineStr`, written for every string value
    InlineString,
    /// `str`, a formula's string result; read as a string
    FormulaString,
    /// `s`, an index into the shared-string table
    SharedString,
    /// `d`, an ISO 8601 date
    Date,
}

impl TypeCode {
    /// Attribute text for this code
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCode::Boolean => "b",
            TypeCode::Number => "n",
            TypeCode::Error => "e",
            TypeCode::InlineString => "inlineStr",
            TypeCode::FormulaString => "str",
            TypeCode::SharedString => "s",
            TypeCode::Date => "d",
        }
    }

    /// Parse attribute text. Codes are case-sensitive.
    pub fn parse(code: &str) -> Result<Self> {
        match code {
            "b" => Ok(TypeCode::Boolean),
            "n" => Ok(TypeCode::Number),
            "e" => Ok(TypeCode::Error),
            "inlineStr" => Ok(TypeCode::InlineString),
            "str" => Ok(TypeCode::FormulaString),
            "s" => Ok(TypeCode::SharedString),
            "d" => Ok(TypeCode::Date),
            other => Err(Error::UnsupportedTypeCode(other.to_string())),
        }
    }

    /// Map a code to the kind it loads as.
    ///
    /// Numbers resolve to [`ValueKind::Float`] here; whether the text is
    /// integral is only known once it has been parsed.
    pub fn kind(&self) -> Result<ValueKind> {
        match self {
            TypeCode::Boolean => Ok(ValueKind::Boolean),
            TypeCode::Number => Ok(ValueKind::Float),
            TypeCode::Error => Ok(ValueKind::Error),
            TypeCode::InlineString | TypeCode::FormulaString => Ok(ValueKind::String),
            TypeCode::SharedString | TypeCode::Date => {
                Err(Error::UnsupportedTypeCode(self.as_str().to_string()))
            }
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
