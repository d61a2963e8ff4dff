//! Error tokens stored in `t="e"` cells

use std::fmt;
use std::str::FromStr;

use crate::cell::ValueKind;
use crate::error::Error;

/// An error marker held by a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized formula name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #GETTING_DATA - External data is loading
    GettingData,
    /// #SPILL! - Dynamic array cannot spill
    Spill,
    /// #CALC! - Calculation error
    Calc,
}

impl CellError {
    /// Every token, in the order they are listed above
    pub const ALL: [CellError; 10] = [
        CellError::Null,
        CellError::Div0,
        CellError::Value,
        CellError::Ref,
        CellError::Name,
        CellError::Num,
        CellError::Na,
        CellError::GettingData,
        CellError::Spill,
        CellError::Calc,
    ];

    /// The token text as persisted in the value node
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
            CellError::Spill => "#SPILL!",
            CellError::Calc => "#CALC!",
        }
    }
}

impl FromStr for CellError {
    type Err = Error;

    /// Tokens are matched case-insensitively, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        CellError::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| Error::malformed(ValueKind::Error, s))
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_error_display() {
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
        assert_eq!(CellError::Ref.to_string(), "#REF!");
        assert_eq!(CellError::Na.to_string(), "#N/A");
    }

    #[test]
    fn test_cell_error_parse() {
        assert_eq!("#DIV/0!".parse::<CellError>(), Ok(CellError::Div0));
        assert_eq!("#n/a".parse::<CellError>(), Ok(CellError::Na)); // Case insensitive
        assert_eq!(" #REF! ".parse::<CellError>(), Ok(CellError::Ref));
        assert!(matches!(
            "oops".parse::<CellError>(),
            Err(Error::MalformedValue {
                kind: ValueKind::Error,
                ..
            })
        ));
    }
}
